// elassets-parsers/src/caf/animation.rs
//! Keyframe animation structures

use elassets_core::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A decoded animation file
///
/// Tracks and keyframes keep file order; keyframe times are not guaranteed
/// to be sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// File version following the magic
    pub version: u32,
    /// Length in seconds
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl Animation {
    /// First track driving the given bone
    pub fn track_for_bone(&self, bone_id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.bone_id == bone_id)
    }

    /// Total keyframes across all tracks
    pub fn keyframe_count(&self) -> usize {
        self.tracks.iter().map(|t| t.keyframes.len()).sum()
    }

    /// Bone ids in track order
    pub fn bone_ids(&self) -> Vec<u32> {
        self.tracks.iter().map(|t| t.bone_id).collect()
    }
}

/// Keyframes for one bone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub bone_id: u32,
    pub keyframes: Vec<Keyframe>,
}

impl Track {
    /// Earliest and latest keyframe time
    pub fn time_range(&self) -> Option<(f32, f32)> {
        self.keyframes.iter().fold(None, |range, k| match range {
            None => Some((k.time, k.time)),
            Some((lo, hi)) => Some((lo.min(k.time), hi.max(k.time))),
        })
    }

    /// Check if keyframe times never decrease
    pub fn is_time_sorted(&self) -> bool {
        self.keyframes.windows(2).all(|w| w[0].time <= w[1].time)
    }
}

/// Bone pose at one point in time (Y-up, relative to the parent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub translation: Vec3,
    pub rotation: Quat,
}
