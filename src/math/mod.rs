mod aabb;
mod color;
mod ray;

pub use aabb::AABB;
pub use color::Color3;
pub use ray::Ray;
