// elassets-parsers/src/e3d/material.rs
//! E3D material records

use elassets_core::BoundingBox;
use serde::{Deserialize, Serialize};

use super::plan::VertexPlan;
use crate::cursor::BinaryCursor;
use crate::traits::DecodeResult;

/// Width of the texture name field
pub const TEXTURE_NAME_SIZE: usize = 128;

/// Material of a static object, covering one range of the index list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Set when the option word is non-zero
    pub is_transparent: bool,
    pub texture_path: String,
    /// Bounds of the covered geometry (Y-up, `min <= max` per axis)
    pub bounds: BoundingBox,
    /// Smallest and largest vertex index referenced
    pub vertex_range: [u32; 2],
    /// First index of the range
    pub index_start: u32,
    /// Number of indices in the range
    pub index_count: u32,
}

impl Material {
    pub(crate) fn parse(cursor: &mut BinaryCursor<'_>, plan: &VertexPlan) -> DecodeResult<Self> {
        let options = cursor.read_u32()?;
        let texture_path = cursor.read_fixed_str(TEXTURE_NAME_SIZE)?;
        let min = cursor.read_vec3()?;
        let max = cursor.read_vec3()?;
        let vertex_range = [cursor.read_u32()?, cursor.read_u32()?];
        let index_start = cursor.read_u32()?;
        let index_count = cursor.read_u32()?;

        if plan.has_secondary_uv {
            // secondary texture name, unused
            cursor.skip(TEXTURE_NAME_SIZE)?;
        }

        Ok(Self {
            is_transparent: options != 0,
            texture_path,
            bounds: BoundingBox::from_z_up_corners(min, max),
            vertex_range,
            index_start,
            index_count,
        })
    }

    /// Index range into the owning object's index list
    pub fn index_range(&self) -> std::ops::Range<usize> {
        let start = self.index_start as usize;
        start..start + self.index_count as usize
    }
}
