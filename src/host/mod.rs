mod headless;
mod viewport;
mod window_app;

pub use headless::{run_headless, HeadlessPlan, HeadlessReport};
pub use viewport::Viewport;
pub use window_app::run_windowed;
