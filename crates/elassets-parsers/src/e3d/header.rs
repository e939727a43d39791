// elassets-parsers/src/e3d/header.rs
//! E3D header structures

use serde::{Deserialize, Serialize};

use crate::cursor::BinaryCursor;
use crate::traits::{DecodeError, DecodeResult};

/// E3D file magic
pub const E3D_MAGIC: &[u8; 4] = b"e3dx";

/// Vertex option flags (which attributes are present)
pub mod options {
    pub const HAS_NORMAL: u8 = 0x01;
    pub const HAS_TANGENT: u8 = 0x02;
    pub const HAS_SECONDARY_TEXTURE_COORDINATE: u8 = 0x04;
    pub const HAS_COLOR: u8 = 0x08;
    pub const MASK: u8 = 0x0F;
}

/// Vertex format flags (how attributes are packed)
pub mod format {
    pub const HALF_POSITION: u8 = 0x01;
    pub const HALF_UV: u8 = 0x02;
    pub const HALF_EXTRA_UV: u8 = 0x04;
    pub const COMPRESSED_NORMAL: u8 = 0x08;
    pub const SHORT_INDEX: u8 = 0x10;
    pub const MASK: u8 = 0x1F;
}

/// Supported E3D versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum E3dVersion {
    /// Full-precision layout, normals always present
    V1_0,
    /// Flag-driven packed layout
    V1_1,
}

impl E3dVersion {
    pub fn from_bytes(bytes: [u8; 4]) -> DecodeResult<Self> {
        match bytes {
            [1, 0, 0, 0] => Ok(Self::V1_0),
            [1, 1, 0, 0] => Ok(Self::V1_1),
            [a, b, c, d] => Err(DecodeError::UnsupportedVersion {
                version: format!("{a}.{b}.{c}.{d}"),
            }),
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            Self::V1_0 => [1, 0, 0, 0],
            Self::V1_1 => [1, 1, 0, 0],
        }
    }
}

/// Section table found at the header offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E3dHeader {
    pub version: E3dVersion,
    /// MD5 of the content, carried but not verified
    pub content_hash: [u8; 16],
    pub vertex_count: u32,
    pub vertex_size: u32,
    pub vertex_offset: u32,
    pub index_count: u32,
    pub index_size: u32,
    pub index_offset: u32,
    pub material_count: u32,
    pub material_size: u32,
    pub material_offset: u32,
    /// Raw option byte, before version handling
    pub vertex_options: u8,
    /// Raw format byte, before version handling
    pub vertex_format: u8,
}

impl E3dHeader {
    /// Read the file header and the section table it points to
    pub fn parse(cursor: &mut BinaryCursor<'_>) -> DecodeResult<Self> {
        cursor.expect_magic(E3D_MAGIC)?;

        let mut version = [0u8; 4];
        version.copy_from_slice(cursor.read_bytes(4)?);
        let version = E3dVersion::from_bytes(version)?;

        let mut content_hash = [0u8; 16];
        content_hash.copy_from_slice(cursor.read_bytes(16)?);

        let header_offset = cursor.read_u32()? as usize;
        cursor.seek(header_offset)?;

        let header = Self {
            version,
            content_hash,
            vertex_count: cursor.read_u32()?,
            vertex_size: cursor.read_u32()?,
            vertex_offset: cursor.read_u32()?,
            index_count: cursor.read_u32()?,
            index_size: cursor.read_u32()?,
            index_offset: cursor.read_u32()?,
            material_count: cursor.read_u32()?,
            material_size: cursor.read_u32()?,
            material_offset: cursor.read_u32()?,
            vertex_options: cursor.read_u8()?,
            vertex_format: cursor.read_u8()?,
        };
        // reserved
        cursor.skip(2)?;

        Ok(header)
    }
}
