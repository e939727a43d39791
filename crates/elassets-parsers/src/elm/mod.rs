// elassets-parsers/src/elm/mod.rs
//! ELM (map) decoder
//!
//! # Format Structure
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ header (124 bytes): magic "elmf", grid sizes, offsets, │
//! │ size/count/offset for each record section, dungeon,    │
//! │ ambient color                                          │
//! ├────────────────────────────────────────────────────────┤
//! │ tile grid       tile_width × tile_height u8            │
//! │ elevation grid  (tile_width·6) × (tile_height·6) u8    │
//! │ 3D objects      144-byte records                       │
//! │ 2D objects      128-byte records                       │
//! │ lights           40-byte records                       │
//! │ particles       104-byte records                       │
//! └────────────────────────────────────────────────────────┘
//! ```

mod header;
mod records;

pub use header::{ElmHeader, SectionInfo, BLOCKS_PER_TILE, ELM_HEADER_SIZE, ELM_MAGIC};
pub use records::{
    Light, ParticleSystem, PlacedObject2d, PlacedObject3d, BLENDED_EXCLUDED, LIGHT_SIZE,
    OBJECT_2D_SIZE, OBJECT_3D_SIZE, PARTICLE_SIZE, PATH_SIZE,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cursor::BinaryCursor;
use crate::traits::{DecodeError, DecodeOptions, DecodeResult, Decoder};

/// Row-major grid of byte cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<u8>,
}

impl Grid {
    /// Cell at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.cells.get(index).copied()
    }
}

/// A decoded map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDef {
    pub dungeon: bool,
    /// Ambient light color, RGB
    pub ambient: [f32; 3],
    /// Terrain tile ids
    pub tile_grid: Grid,
    /// Walkable height per block, six blocks per tile and axis
    pub elevation_grid: Grid,
    /// 3D objects, without records marked as removed
    pub objects_3d: Vec<PlacedObject3d>,
    pub objects_2d: Vec<PlacedObject2d>,
    pub lights: Vec<Light>,
    pub particles: Vec<ParticleSystem>,
}

impl MapDef {
    pub fn tile_at(&self, x: u32, y: u32) -> Option<u8> {
        self.tile_grid.get(x, y)
    }

    pub fn height_at(&self, x: u32, y: u32) -> Option<u8> {
        self.elevation_grid.get(x, y)
    }

    /// Total placed entities of every kind
    pub fn entity_count(&self) -> usize {
        self.objects_3d.len() + self.objects_2d.len() + self.lights.len() + self.particles.len()
    }
}

/// Map decoder
pub struct ElmDecoder;

impl ElmDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_grid(
        &self,
        cursor: &mut BinaryCursor<'_>,
        options: &DecodeOptions,
        what: &'static str,
        offset: u32,
        width: u64,
        height: u64,
    ) -> DecodeResult<Grid> {
        let count = width.saturating_mul(height);
        options.check_count(what, width.max(height))?;
        options.check_count(what, count)?;
        trace!(offset, width, height, "{} grid", what);

        // both limits are u32, so the dimensions fit
        cursor.seek(offset as usize)?;
        let cells = cursor.read_bytes(count as usize)?.to_vec();
        Ok(Grid {
            width: width as u32,
            height: height as u32,
            cells,
        })
    }

    /// Read `info.count` records with `parse`, enforcing the declared size
    fn decode_section<T>(
        &self,
        cursor: &mut BinaryCursor<'_>,
        options: &DecodeOptions,
        section: &'static str,
        info: SectionInfo,
        record_size: u32,
        mut parse: impl FnMut(&mut BinaryCursor<'_>, u32) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        let declared = u64::from(info.count) * u64::from(info.record_size);
        let expected = u64::from(info.count) * u64::from(record_size);
        if declared != expected {
            return Err(DecodeError::SizeMismatch {
                section,
                declared,
                expected,
            });
        }
        options.check_count(section, u64::from(info.count))?;
        if info.count == 0 {
            return Ok(Vec::new());
        }
        trace!(offset = info.offset, count = info.count, "{} section", section);

        cursor.seek(info.offset as usize)?;
        cursor.ensure(expected as usize)?;
        let start = cursor.position();

        let mut records = Vec::with_capacity(info.count as usize);
        for index in 0..info.count {
            records.push(parse(cursor, index)?);
        }

        let consumed = (cursor.position() - start) as u64;
        if consumed != declared {
            return Err(DecodeError::SizeMismatch {
                section,
                declared,
                expected: consumed,
            });
        }
        Ok(records)
    }
}

impl Default for ElmDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ElmDecoder {
    type Output = MapDef;

    fn extensions(&self) -> &[&str] {
        &["elm"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(ELM_MAGIC)
    }

    fn name(&self) -> &str {
        "ELM Map Decoder"
    }

    fn decode_with_options(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<Self::Output> {
        let mut cursor = BinaryCursor::new(data);
        let header = ElmHeader::parse(&mut cursor)?;

        let tile_grid = self.decode_grid(
            &mut cursor,
            options,
            "tile",
            header.tile_offset,
            u64::from(header.tile_width),
            u64::from(header.tile_height),
        )?;
        let elevation_grid = self.decode_grid(
            &mut cursor,
            options,
            "elevation",
            header.elevation_offset,
            header.elevation_width(),
            header.elevation_height(),
        )?;

        let mut objects_3d = self.decode_section(
            &mut cursor,
            options,
            "3d objects",
            header.objects_3d,
            OBJECT_3D_SIZE,
            PlacedObject3d::parse,
        )?;
        let total_3d = objects_3d.len();
        objects_3d.retain(|o| !o.is_excluded());

        let objects_2d = self.decode_section(
            &mut cursor,
            options,
            "2d objects",
            header.objects_2d,
            OBJECT_2D_SIZE,
            |c, _| PlacedObject2d::parse(c),
        )?;
        let lights = self.decode_section(
            &mut cursor,
            options,
            "lights",
            header.lights,
            LIGHT_SIZE,
            |c, _| Light::parse(c),
        )?;
        let particles = self.decode_section(
            &mut cursor,
            options,
            "particles",
            header.particles,
            PARTICLE_SIZE,
            |c, _| ParticleSystem::parse(c),
        )?;

        let map = MapDef {
            dungeon: header.dungeon,
            ambient: header.ambient,
            tile_grid,
            elevation_grid,
            objects_3d,
            objects_2d,
            lights,
            particles,
        };
        debug!(
            tiles = ?(map.tile_grid.width, map.tile_grid.height),
            objects_3d = map.objects_3d.len(),
            excluded_3d = total_3d - map.objects_3d.len(),
            objects_2d = map.objects_2d.len(),
            lights = map.lights.len(),
            particles = map.particles.len(),
            "Decoded map"
        );
        Ok(map)
    }
}
