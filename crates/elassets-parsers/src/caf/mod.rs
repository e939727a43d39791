// elassets-parsers/src/caf/mod.rs
//! CAF (Cal3D binary animation) decoder
//!
//! # Format Structure
//! ```text
//! magic "CAF\0" | version u32 | duration f32 | track count u32
//! per track:
//!   bone id u32 | keyframe count u32
//!   per keyframe: time f32 | translation 3×f32 | rotation 4×f32
//! ```

mod animation;

pub use animation::{Animation, Keyframe, Track};

use tracing::debug;

use crate::cursor::BinaryCursor;
use crate::traits::{Decoder, DecodeOptions, DecodeResult};

/// CAF file magic
pub const CAF_MAGIC: &[u8; 4] = b"CAF\0";

const TRACK_HEADER_SIZE: usize = 8;
const KEYFRAME_SIZE: usize = 32;

/// Animation decoder
pub struct CafDecoder;

impl CafDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_track(&self, cursor: &mut BinaryCursor<'_>, options: &DecodeOptions) -> DecodeResult<Track> {
        let bone_id = cursor.read_u32()?;
        let keyframe_count = cursor.read_count("keyframes", options)?;

        let mut keyframes = Vec::with_capacity(cursor.capacity_for(keyframe_count, KEYFRAME_SIZE));
        for _ in 0..keyframe_count {
            keyframes.push(Keyframe {
                time: cursor.read_f32()?,
                translation: cursor.read_vec3_y_up()?,
                rotation: cursor.read_quat_y_up()?,
            });
        }

        Ok(Track { bone_id, keyframes })
    }
}

impl Default for CafDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for CafDecoder {
    type Output = Animation;

    fn extensions(&self) -> &[&str] {
        &["caf"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(CAF_MAGIC)
    }

    fn name(&self) -> &str {
        "Cal3D Animation Decoder"
    }

    fn decode_with_options(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<Self::Output> {
        let mut cursor = BinaryCursor::new(data);
        cursor.expect_magic(CAF_MAGIC)?;
        let version = cursor.read_u32()?;
        let duration = cursor.read_f32()?;
        let track_count = cursor.read_count("tracks", options)?;

        let mut tracks = Vec::with_capacity(cursor.capacity_for(track_count, TRACK_HEADER_SIZE));
        for index in 0..track_count {
            let track = self
                .decode_track(&mut cursor, options)
                .map_err(|e| e.with_context(format!("track {index}")))?;
            tracks.push(track);
        }

        let animation = Animation {
            version,
            duration,
            tracks,
        };
        debug!(
            version,
            duration,
            tracks = animation.tracks.len(),
            keyframes = animation.keyframe_count(),
            "Decoded animation"
        );
        Ok(animation)
    }
}
