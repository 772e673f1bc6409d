use std::fmt;
use serde::{Deserialize, Serialize};

use crate::utils::{
    Color, Vec3,
    hash::{self, StringHash},
};

#[cfg(test)]
pub mod test_world;

// ----------------------------------------------
// DimensionTag
// ----------------------------------------------

// Opaque world dimension identifier, e.g. "minecraft:overworld".
// Only ever compared for equality. The empty tag marks a malformed entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DimensionTag {
    name: String,
    hash: StringHash,
}

impl DimensionTag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            hash: hash::fnv1a_from_str(name),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.hash != hash::NULL_HASH
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn hash(&self) -> StringHash {
        self.hash
    }
}

impl PartialEq for DimensionTag {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.name == other.name
    }
}

impl Eq for DimensionTag {}

impl From<String> for DimensionTag {
    fn from(name: String) -> Self {
        let hash = hash::fnv1a_from_str(&name);
        Self { name, hash }
    }
}

impl From<DimensionTag> for String {
    fn from(tag: DimensionTag) -> Self {
        tag.name
    }
}

impl fmt::Display for DimensionTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "<none>")
        }
    }
}

// ----------------------------------------------
// Observer
// ----------------------------------------------

pub const DEFAULT_EYE_HEIGHT: f64 = 1.62;

// The camera/player whose pose drives every panel. Rebuilt by the host each frame.
#[derive(Clone, Debug)]
pub struct Observer {
    pub position: Vec3,
    pub yaw: f32,   // Degrees in [-180, 180). 0 faces +Z, 90 faces -X.
    pub pitch: f32, // Degrees in [-90, 90]. Positive looks down.
    pub eye_height: f64,
    pub dimension: DimensionTag,
    pub is_dead: bool,
}

impl Observer {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, dimension: DimensionTag) -> Self {
        Self {
            position,
            yaw: crate::utils::wrap_degrees(yaw),
            pitch: pitch.clamp(-90.0, 90.0),
            eye_height: DEFAULT_EYE_HEIGHT,
            dimension,
            is_dead: false,
        }
    }

    #[inline]
    pub fn with_eye_height(mut self, eye_height: f64) -> Self {
        self.eye_height = eye_height;
        self
    }

    #[inline]
    pub fn with_dead(mut self, is_dead: bool) -> Self {
        self.is_dead = is_dead;
        self
    }

    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.eye_height, 0.0)
    }

    #[inline]
    pub fn block_position(&self) -> [i32; 3] {
        self.position.floor_to_block()
    }
}

// ----------------------------------------------
// EntitySnapshot
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Other,
}

#[derive(Copy, Clone, Debug)]
pub struct EntitySnapshot {
    pub position: Vec3,
    pub kind: EntityKind,
    pub is_observer: bool,
}

impl EntitySnapshot {
    #[inline]
    pub fn new(position: Vec3, kind: EntityKind) -> Self {
        Self { position, kind, is_observer: false }
    }
}

// ----------------------------------------------
// WorldView
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SurfaceSample {
    // Surface height: Y of the first free space above the surface block.
    pub y: i32,
    // Material color, None when the world has no mapping for it.
    pub color: Option<Color>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorldQueryError {
    ChunkNotLoaded,
    OutOfBounds,
    Unavailable,
}

impl fmt::Display for WorldQueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ChunkNotLoaded => write!(f, "chunk not loaded"),
            Self::OutOfBounds => write!(f, "out of world bounds"),
            Self::Unavailable => write!(f, "world unavailable"),
        }
    }
}

impl std::error::Error for WorldQueryError {}

// Read-only query surface over the host's world.
pub trait WorldView {
    // First non-empty surface in column (x, z), scanning down from `from_y`
    // (inclusive) to `to_y` (inclusive). Ok(None) when the column is empty there.
    fn surface_at(&self, x: i32, z: i32, from_y: i32, to_y: i32) -> Result<Option<SurfaceSample>, WorldQueryError>;

    // Hosts with translucent materials (glass, leaves) reject them here so the
    // sampler keeps scanning beneath.
    fn is_opaque(&self, _sample: &SurfaceSample) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_tag_equality() {
        let a = DimensionTag::new("minecraft:overworld");
        let b = DimensionTag::from("minecraft:overworld".to_string());
        let c = DimensionTag::new("minecraft:the_nether");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_valid());
        assert!(!DimensionTag::new("").is_valid());
        assert!(!DimensionTag::default().is_valid());
    }

    #[test]
    fn test_dimension_tag_serializes_as_string() {
        let tag = DimensionTag::new("minecraft:the_end");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"minecraft:the_end\"");

        let parsed: DimensionTag = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tag);
    }

    #[test]
    fn test_observer_normalizes_angles() {
        let dim = DimensionTag::new("minecraft:overworld");
        let observer = Observer::new(Vec3::new(0.5, 64.0, -0.5), 270.0, 120.0, dim);

        assert_eq!(observer.yaw, -90.0);
        assert_eq!(observer.pitch, 90.0);
        assert_eq!(observer.block_position(), [0, 64, -1]);
        assert_eq!(observer.eye_position().y, 64.0 + DEFAULT_EYE_HEIGHT);
    }
}
