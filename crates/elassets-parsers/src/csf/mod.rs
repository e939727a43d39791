// elassets-parsers/src/csf/mod.rs
//! CSF (Cal3D binary skeleton) decoder
//!
//! # Format Structure
//! ```text
//! magic "CSF\0" | version u32 | bone count u32
//! per bone:
//!   name length u32 | name bytes
//!   translation 3×f32 | rotation 4×f32
//!   local translation 3×f32 | local rotation 4×f32
//!   parent id i32 | child count u32 | child count × u32
//! ```

mod skeleton;

pub use skeleton::{Bone, ChildIds, Skeleton};

use tracing::debug;

use crate::cursor::BinaryCursor;
use crate::traits::{Decoder, DecodeOptions, DecodeResult, HierarchicalDecoder};

/// CSF file magic
pub const CSF_MAGIC: &[u8; 4] = b"CSF\0";

/// Smallest possible bone record (empty name, no children)
const MIN_BONE_SIZE: usize = 68;

/// Skeleton decoder
pub struct CsfDecoder;

impl CsfDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_bone(
        &self,
        cursor: &mut BinaryCursor<'_>,
        options: &DecodeOptions,
        id: u32,
    ) -> DecodeResult<Bone> {
        let name = cursor.read_prefixed_str()?;
        let translation = cursor.read_vec3_y_up()?;
        let rotation = cursor.read_quat_y_up()?;
        let local_translation = cursor.read_vec3_y_up()?;
        let local_rotation = cursor.read_quat_y_up()?;
        let parent_id = cursor.read_i32()?;

        let child_count = cursor.read_count("child bones", options)?;
        cursor.ensure(child_count.saturating_mul(4))?;
        let mut child_ids = ChildIds::with_capacity(child_count);
        for _ in 0..child_count {
            child_ids.push(cursor.read_u32()?);
        }

        Ok(Bone {
            id,
            name,
            translation,
            rotation,
            local_translation,
            local_rotation,
            parent_id,
            child_ids,
        })
    }
}

impl Default for CsfDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for CsfDecoder {
    type Output = Skeleton;

    fn extensions(&self) -> &[&str] {
        &["csf"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(CSF_MAGIC)
    }

    fn name(&self) -> &str {
        "Cal3D Skeleton Decoder"
    }

    fn decode_with_options(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<Self::Output> {
        let mut cursor = BinaryCursor::new(data);
        cursor.expect_magic(CSF_MAGIC)?;
        let version = cursor.read_u32()?;
        let bone_count = cursor.read_count("bones", options)?;

        let mut bones = Vec::with_capacity(cursor.capacity_for(bone_count, MIN_BONE_SIZE));
        for id in 0..bone_count as u32 {
            let bone = self
                .decode_bone(&mut cursor, options, id)
                .map_err(|e| e.with_context(format!("bone {id}")))?;
            bones.push(bone);
        }

        let skeleton = Skeleton { version, bones };
        debug!(
            version,
            bones = skeleton.bone_count(),
            roots = skeleton.root_ids().len(),
            "Decoded skeleton"
        );
        Ok(skeleton)
    }
}

impl HierarchicalDecoder for CsfDecoder {
    type Node = Bone;

    fn roots<'a>(&self, decoded: &'a Skeleton) -> Vec<&'a Bone> {
        decoded.bones.iter().filter(|b| b.is_root()).collect()
    }

    fn children<'a>(&self, decoded: &'a Skeleton, node: &Bone) -> Vec<&'a Bone> {
        decoded
            .bones
            .iter()
            .filter(|b| b.parent() == Some(node.id))
            .collect()
    }
}
