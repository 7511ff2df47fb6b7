use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Color3;

/// Index of a material inside its [`Scene`](super::Scene). Many objects may
/// hold the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub(crate) usize);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinatesMode {
    #[default]
    Explicit,
    Skybox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureKind {
    Image,
    /// Six images sharing a URL prefix
    Cube,
}

/// Reference to a texture asset. Loading is up to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub url: String,
    pub kind: TextureKind,
    pub coordinates_mode: CoordinatesMode,
}

impl Texture {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: TextureKind::Image,
            coordinates_mode: CoordinatesMode::Explicit,
        }
    }

    pub fn cube(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: TextureKind::Cube,
            coordinates_mode: CoordinatesMode::Explicit,
        }
    }

    pub fn with_coordinates_mode(mut self, mode: CoordinatesMode) -> Self {
        self.coordinates_mode = mode;
        self
    }
}

/// Standard material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse_texture: Option<Texture>,
    pub emissive_texture: Option<Texture>,
    pub reflection_texture: Option<Texture>,
    pub diffuse_color: Color3,
    pub specular_color: Color3,
    pub alpha: f32,
    pub back_face_culling: bool,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse_texture: None,
            emissive_texture: None,
            reflection_texture: None,
            diffuse_color: Color3::WHITE,
            specular_color: Color3::WHITE,
            alpha: 1.0,
            back_face_culling: true,
        }
    }

    /// Material with a diffuse image texture
    pub fn textured(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            diffuse_texture: Some(Texture::image(url)),
            ..Self::new(name)
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Black diffuse and specular, so only emissive/reflection contribute
    pub fn unlit(mut self) -> Self {
        self.diffuse_color = Color3::BLACK;
        self.specular_color = Color3::BLACK;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textured_material() {
        let mat = Material::textured("mat", "floor.png").with_alpha(0.1);
        assert_eq!(mat.diffuse_texture, Some(Texture::image("floor.png")));
        assert_eq!(mat.alpha, 0.1);
        assert!(mat.back_face_culling);
    }

    #[test]
    fn test_unlit_material() {
        let mat = Material::new("boxmaterial").unlit();
        assert_eq!(mat.diffuse_color, Color3::BLACK);
        assert_eq!(mat.specular_color, Color3::BLACK);
    }

    #[test]
    fn test_cube_texture_skybox_mode() {
        let tex = Texture::cube("textures/skybox").with_coordinates_mode(CoordinatesMode::Skybox);
        assert_eq!(tex.kind, TextureKind::Cube);
        assert_eq!(tex.coordinates_mode, CoordinatesMode::Skybox);
    }
}
