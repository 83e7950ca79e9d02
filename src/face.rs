use serde::{Deserialize, Serialize};
use std::fmt;

/// The block face a texture is painted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceId {
    #[default]
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl FaceId {
    pub const ALL: [FaceId; 6] = [
        FaceId::North,
        FaceId::South,
        FaceId::East,
        FaceId::West,
        FaceId::Up,
        FaceId::Down,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FaceId::North => "north",
            FaceId::South => "south",
            FaceId::East => "east",
            FaceId::West => "west",
            FaceId::Up => "up",
            FaceId::Down => "down",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|face| face.name() == name)
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
