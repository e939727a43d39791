// elassets-parsers/src/elm/header.rs
//! ELM header (124 bytes)

use crate::cursor::BinaryCursor;
use crate::traits::DecodeResult;

/// ELM file magic
pub const ELM_MAGIC: &[u8; 4] = b"elmf";

/// Size of the fixed header
pub const ELM_HEADER_SIZE: usize = 124;

/// Elevation blocks per tile along each axis
pub const BLOCKS_PER_TILE: u32 = 6;

/// Declared layout of one record section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionInfo {
    /// Declared bytes per record
    pub record_size: u32,
    pub count: u32,
    pub offset: u32,
}

impl SectionInfo {
    fn parse(cursor: &mut BinaryCursor<'_>) -> DecodeResult<Self> {
        Ok(Self {
            record_size: cursor.read_u32()?,
            count: cursor.read_u32()?,
            offset: cursor.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElmHeader {
    /// Tiles along x
    pub tile_width: u32,
    /// Tiles along y
    pub tile_height: u32,
    pub tile_offset: u32,
    pub elevation_offset: u32,
    pub objects_3d: SectionInfo,
    pub objects_2d: SectionInfo,
    pub lights: SectionInfo,
    pub dungeon: bool,
    /// Ambient light color, RGB
    pub ambient: [f32; 3],
    pub particles: SectionInfo,
    /// Offset of the cluster table, not decoded
    pub clusters_offset: u32,
}

impl ElmHeader {
    pub fn parse(cursor: &mut BinaryCursor<'_>) -> DecodeResult<Self> {
        cursor.ensure(ELM_HEADER_SIZE)?;
        cursor.expect_magic(ELM_MAGIC)?;

        let tile_width = cursor.read_u32()?;
        let tile_height = cursor.read_u32()?;
        let tile_offset = cursor.read_u32()?;
        let elevation_offset = cursor.read_u32()?;
        let objects_3d = SectionInfo::parse(cursor)?;
        let objects_2d = SectionInfo::parse(cursor)?;
        let lights = SectionInfo::parse(cursor)?;
        let dungeon = cursor.read_u8()? != 0;
        cursor.skip(3)?;
        let ambient = [cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?];
        let particles = SectionInfo::parse(cursor)?;
        let clusters_offset = cursor.read_u32()?;
        // reserved
        cursor.skip(36)?;

        Ok(Self {
            tile_width,
            tile_height,
            tile_offset,
            elevation_offset,
            objects_3d,
            objects_2d,
            lights,
            dungeon,
            ambient,
            particles,
            clusters_offset,
        })
    }

    pub fn elevation_width(&self) -> u64 {
        u64::from(self.tile_width) * u64::from(BLOCKS_PER_TILE)
    }

    pub fn elevation_height(&self) -> u64 {
        u64::from(self.tile_height) * u64::from(BLOCKS_PER_TILE)
    }
}
