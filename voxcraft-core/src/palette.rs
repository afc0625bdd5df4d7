/// Fixed name tables shared by every scene: textures, models, lights and
/// box shapes.

use serde::{Deserialize, Serialize};

/// Index sent for boxes that carry no texture
pub const NO_TEXTURE: i32 = -1;

/// Block textures, in the order the renderer indexes them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    Grass,
    Stone,
    Dirt,
    Planks,
    Bricks,
}

impl Texture {
    pub const ALL: [Texture; 5] = [
        Texture::Grass,
        Texture::Stone,
        Texture::Dirt,
        Texture::Planks,
        Texture::Bricks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Texture::Grass => "grass",
            Texture::Stone => "stone",
            Texture::Dirt => "dirt",
            Texture::Planks => "planks",
            Texture::Bricks => "bricks",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Palette index for a texture name, or [`NO_TEXTURE`] when unknown
    pub fn resolve(name: &str) -> i32 {
        Self::from_name(name).map_or(NO_TEXTURE, Texture::index)
    }
}

/// Named assets the renderer can instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Sun,
    Moon,
    ToyBiplane,
    ToyCar,
    Drummer,
    Robot,
    ToyRocket,
    RocketToy1,
    RocketToy2,
    Skull,
}

impl Model {
    pub const ALL: [Model; 19] = [
        Model::Mercury,
        Model::Venus,
        Model::Earth,
        Model::Mars,
        Model::Jupiter,
        Model::Saturn,
        Model::Uranus,
        Model::Neptune,
        Model::Pluto,
        Model::Sun,
        Model::Moon,
        Model::ToyBiplane,
        Model::ToyCar,
        Model::Drummer,
        Model::Robot,
        Model::ToyRocket,
        Model::RocketToy1,
        Model::RocketToy2,
        Model::Skull,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Model::Mercury => "Mercury",
            Model::Venus => "Venus",
            Model::Earth => "Earth",
            Model::Mars => "Mars",
            Model::Jupiter => "Jupiter",
            Model::Saturn => "Saturn",
            Model::Uranus => "Uranus",
            Model::Neptune => "Neptune",
            Model::Pluto => "Pluto",
            Model::Sun => "Sun",
            Model::Moon => "Moon",
            Model::ToyBiplane => "ToyBiplane",
            Model::ToyCar => "ToyCar",
            Model::Drummer => "Drummer",
            Model::Robot => "Robot",
            Model::ToyRocket => "ToyRocket",
            Model::RocketToy1 => "RocketToy1",
            Model::RocketToy2 => "RocketToy2",
            Model::Skull => "Skull",
        }
    }

    /// Case-sensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    #[default]
    Point,
    Spot,
    Directional,
}

impl LightType {
    /// Unrecognized names fall back to a point light
    pub fn from_name(name: &str) -> Self {
        match name {
            "spot" => LightType::Spot,
            "directional" => LightType::Directional,
            _ => LightType::Point,
        }
    }

    /// Wire code: point=1, spot=2, directional=3
    pub fn code(self) -> u8 {
        match self {
            LightType::Point => 1,
            LightType::Spot => 2,
            LightType::Directional => 3,
        }
    }
}

/// Shape used to draw every box of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Box,
    Sphere,
    Plane,
}
