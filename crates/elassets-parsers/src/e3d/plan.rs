// elassets-parsers/src/e3d/plan.rs
//! Vertex layout compiled from the E3D option and format bytes

use serde::{Deserialize, Serialize};

use super::header::{format, options, E3dVersion};

const MATERIAL_BASE_SIZE: u32 = 172;
const MATERIAL_EXTRA_TEXTURE_SIZE: u32 = 128;

/// Explicit decode plan for one E3D file.
///
/// Per-vertex field order is UV, secondary UV, normal, tangent, position,
/// color. Secondary UVs and tangents are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexPlan {
    pub has_normal: bool,
    pub has_tangent: bool,
    pub has_secondary_uv: bool,
    pub has_color: bool,
    pub half_position: bool,
    pub half_uv: bool,
    pub half_secondary_uv: bool,
    pub compressed_normal: bool,
    pub short_index: bool,
}

impl VertexPlan {
    /// Compile the raw flag bytes for a version.
    ///
    /// Version 1.0 files always have normals and ignore the format byte.
    pub fn compile(version: E3dVersion, vertex_options: u8, vertex_format: u8) -> Self {
        let (opts, fmt) = match version {
            E3dVersion::V1_0 => (vertex_options | options::HAS_NORMAL, 0),
            E3dVersion::V1_1 => (vertex_options & options::MASK, vertex_format & format::MASK),
        };

        Self {
            has_normal: opts & options::HAS_NORMAL != 0,
            has_tangent: opts & options::HAS_TANGENT != 0,
            has_secondary_uv: opts & options::HAS_SECONDARY_TEXTURE_COORDINATE != 0,
            has_color: opts & options::HAS_COLOR != 0,
            half_position: fmt & format::HALF_POSITION != 0,
            half_uv: fmt & format::HALF_UV != 0,
            half_secondary_uv: fmt & format::HALF_EXTRA_UV != 0,
            compressed_normal: fmt & format::COMPRESSED_NORMAL != 0,
            short_index: fmt & format::SHORT_INDEX != 0,
        }
    }

    /// Option byte this plan was compiled from (after masking)
    pub fn options_byte(&self) -> u8 {
        let mut opts = 0;
        if self.has_normal {
            opts |= options::HAS_NORMAL;
        }
        if self.has_tangent {
            opts |= options::HAS_TANGENT;
        }
        if self.has_secondary_uv {
            opts |= options::HAS_SECONDARY_TEXTURE_COORDINATE;
        }
        if self.has_color {
            opts |= options::HAS_COLOR;
        }
        opts
    }

    /// Format byte this plan was compiled from (after masking)
    pub fn format_byte(&self) -> u8 {
        let mut fmt = 0;
        if self.half_position {
            fmt |= format::HALF_POSITION;
        }
        if self.half_uv {
            fmt |= format::HALF_UV;
        }
        if self.half_secondary_uv {
            fmt |= format::HALF_EXTRA_UV;
        }
        if self.compressed_normal {
            fmt |= format::COMPRESSED_NORMAL;
        }
        if self.short_index {
            fmt |= format::SHORT_INDEX;
        }
        fmt
    }

    pub fn position_size(&self) -> u32 {
        if self.half_position { 6 } else { 12 }
    }

    pub fn uv_size(&self) -> u32 {
        if self.half_uv { 4 } else { 8 }
    }

    pub fn secondary_uv_size(&self) -> u32 {
        match (self.has_secondary_uv, self.half_secondary_uv) {
            (false, _) => 0,
            (true, true) => 4,
            (true, false) => 8,
        }
    }

    pub fn normal_size(&self) -> u32 {
        match (self.has_normal, self.compressed_normal) {
            (false, _) => 0,
            (true, true) => 2,
            (true, false) => 12,
        }
    }

    pub fn tangent_size(&self) -> u32 {
        match (self.has_tangent, self.compressed_normal) {
            (false, _) => 0,
            (true, true) => 2,
            (true, false) => 12,
        }
    }

    pub fn color_size(&self) -> u32 {
        if self.has_color { 4 } else { 0 }
    }

    /// Bytes per vertex record
    pub fn vertex_size(&self) -> u32 {
        self.uv_size()
            + self.secondary_uv_size()
            + self.normal_size()
            + self.tangent_size()
            + self.position_size()
            + self.color_size()
    }

    /// Bytes per index
    pub fn index_size(&self) -> u32 {
        if self.short_index { 2 } else { 4 }
    }

    /// Bytes per material record
    pub fn material_size(&self) -> u32 {
        if self.has_secondary_uv {
            MATERIAL_BASE_SIZE + MATERIAL_EXTRA_TEXTURE_SIZE
        } else {
            MATERIAL_BASE_SIZE
        }
    }
}
