// elassets-parsers/src/e3d/mod.rs
//! E3D (static 3D object) decoder
//!
//! # Format Structure
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ magic "e3dx" | version 4×u8 | md5 16×u8 | header offset  │
//! ├──────────────────────────────────────────────────────────┤
//! │ at header offset:                                        │
//! │   vertex count/size/offset | index count/size/offset     │
//! │   material count/size/offset | options u8 | format u8    │
//! ├──────────────────────────────────────────────────────────┤
//! │ vertex records, layout given by VertexPlan               │
//! │ index list, u16 or u32                                   │
//! │ material records, 172 bytes (+128 with secondary UVs)    │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod header;
mod material;
mod plan;

pub use header::{format, options, E3dHeader, E3dVersion, E3D_MAGIC};
pub use material::{Material, TEXTURE_NAME_SIZE};
pub use plan::VertexPlan;

use elassets_core::{decode_compressed_normal, half_to_f32, BoundingBox, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cursor::BinaryCursor;
use crate::traits::{DecodeError, DecodeOptions, DecodeResult, Decoder};

/// A decoded static object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticObject {
    pub version: E3dVersion,
    /// MD5 from the file header, not verified
    pub content_hash: [u8; 16],
    /// Layout the vertices were decoded with
    pub plan: VertexPlan,
    /// Vertex positions (Y-up)
    pub positions: Vec<Vec3>,
    /// Unit normals (Y-up), when the layout has them
    pub normals: Option<Vec<Vec3>>,
    pub uvs: Vec<[f32; 2]>,
    /// RGBA vertex colors, when the layout has them
    pub colors: Option<Vec<[u8; 4]>>,
    pub indices: Vec<u32>,
    pub materials: Vec<Material>,
}

impl StaticObject {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Union of all material bounds
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut iter = self.materials.iter().map(|m| m.bounds);
        let first = iter.next()?;
        Some(iter.fold(first, |mut acc, b| {
            acc.expand(b.min);
            acc.expand(b.max);
            acc
        }))
    }

    /// Indices covered by one material, clamped to the index list
    pub fn material_indices(&self, material: usize) -> &[u32] {
        match self.materials.get(material) {
            Some(m) => {
                let range = m.index_range();
                let end = range.end.min(self.indices.len());
                &self.indices[range.start.min(end)..end]
            }
            None => &[],
        }
    }

    /// Check if any material needs alpha blending
    pub fn has_transparency(&self) -> bool {
        self.materials.iter().any(|m| m.is_transparent)
    }
}

/// Static object decoder
pub struct E3dDecoder;

impl E3dDecoder {
    pub fn new() -> Self {
        Self
    }

    fn check_sizes(&self, header: &E3dHeader, plan: &VertexPlan) -> DecodeResult<()> {
        let sections = [
            ("vertex", header.vertex_size, plan.vertex_size()),
            ("index", header.index_size, plan.index_size()),
            ("material", header.material_size, plan.material_size()),
        ];
        for (section, declared, expected) in sections {
            if declared != expected {
                return Err(DecodeError::SizeMismatch {
                    section,
                    declared: u64::from(declared),
                    expected: u64::from(expected),
                });
            }
        }
        Ok(())
    }

    /// Position `offset` at the start of `count` records of `size` bytes
    fn seek_section(
        &self,
        cursor: &mut BinaryCursor<'_>,
        offset: u32,
        count: usize,
        size: u32,
    ) -> DecodeResult<()> {
        cursor.seek(offset as usize)?;
        cursor.ensure(count.saturating_mul(size as usize))
    }

    fn read_uv(&self, cursor: &mut BinaryCursor<'_>, half: bool) -> DecodeResult<[f32; 2]> {
        if half {
            Ok([half_to_f32(cursor.read_u16()?), half_to_f32(cursor.read_u16()?)])
        } else {
            Ok([cursor.read_f32()?, cursor.read_f32()?])
        }
    }

    fn read_normal(&self, cursor: &mut BinaryCursor<'_>, compressed: bool) -> DecodeResult<Vec3> {
        let normal = if compressed {
            decode_compressed_normal(cursor.read_u16()?)
        } else {
            cursor.read_vec3()?
        };
        Ok(normal.to_y_up())
    }

    fn read_position(&self, cursor: &mut BinaryCursor<'_>, half: bool) -> DecodeResult<Vec3> {
        let position = if half {
            Vec3::new(
                half_to_f32(cursor.read_u16()?),
                half_to_f32(cursor.read_u16()?),
                half_to_f32(cursor.read_u16()?),
            )
        } else {
            cursor.read_vec3()?
        };
        Ok(position.to_y_up())
    }

    fn decode_vertices(
        &self,
        cursor: &mut BinaryCursor<'_>,
        header: &E3dHeader,
        plan: &VertexPlan,
        object: &mut StaticObject,
    ) -> DecodeResult<()> {
        let count = header.vertex_count as usize;
        self.seek_section(cursor, header.vertex_offset, count, plan.vertex_size())?;
        trace!(offset = header.vertex_offset, count, size = plan.vertex_size(), "Vertex section");

        object.positions.reserve(count);
        object.uvs.reserve(count);
        if let Some(normals) = object.normals.as_mut() {
            normals.reserve(count);
        }
        if let Some(colors) = object.colors.as_mut() {
            colors.reserve(count);
        }

        for _ in 0..count {
            object.uvs.push(self.read_uv(cursor, plan.half_uv)?);
            cursor.skip(plan.secondary_uv_size() as usize)?;

            if let Some(normals) = object.normals.as_mut() {
                normals.push(self.read_normal(cursor, plan.compressed_normal)?);
            }
            cursor.skip(plan.tangent_size() as usize)?;

            object.positions.push(self.read_position(cursor, plan.half_position)?);

            if let Some(colors) = object.colors.as_mut() {
                let rgba = cursor.read_bytes(4)?;
                colors.push([rgba[0], rgba[1], rgba[2], rgba[3]]);
            }
        }

        Ok(())
    }

    fn decode_indices(
        &self,
        cursor: &mut BinaryCursor<'_>,
        header: &E3dHeader,
        plan: &VertexPlan,
    ) -> DecodeResult<Vec<u32>> {
        let count = header.index_count as usize;
        self.seek_section(cursor, header.index_offset, count, plan.index_size())?;
        trace!(offset = header.index_offset, count, short = plan.short_index, "Index section");

        let mut indices = Vec::with_capacity(count);
        for _ in 0..count {
            let index = if plan.short_index {
                u32::from(cursor.read_u16()?)
            } else {
                cursor.read_u32()?
            };
            indices.push(index);
        }
        Ok(indices)
    }

    fn decode_materials(
        &self,
        cursor: &mut BinaryCursor<'_>,
        header: &E3dHeader,
        plan: &VertexPlan,
    ) -> DecodeResult<Vec<Material>> {
        let count = header.material_count as usize;
        self.seek_section(cursor, header.material_offset, count, plan.material_size())?;
        trace!(offset = header.material_offset, count, "Material section");

        let mut materials = Vec::with_capacity(count);
        for index in 0..count {
            let material = Material::parse(cursor, plan)
                .map_err(|e| e.with_context(format!("material {index}")))?;
            materials.push(material);
        }
        Ok(materials)
    }
}

impl Default for E3dDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for E3dDecoder {
    type Output = StaticObject;

    fn extensions(&self) -> &[&str] {
        &["e3d"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(E3D_MAGIC)
    }

    fn name(&self) -> &str {
        "E3D Static Object Decoder"
    }

    /// Versions as `major << 8 | minor`
    fn supported_versions(&self) -> &[u32] {
        &[0x0100, 0x0101]
    }

    fn decode_with_options(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<Self::Output> {
        let mut cursor = BinaryCursor::new(data);
        let header = E3dHeader::parse(&mut cursor)?;
        let plan = VertexPlan::compile(header.version, header.vertex_options, header.vertex_format);

        self.check_sizes(&header, &plan)?;
        options.check_count("vertices", u64::from(header.vertex_count))?;
        options.check_count("indices", u64::from(header.index_count))?;
        options.check_count("materials", u64::from(header.material_count))?;

        let mut object = StaticObject {
            version: header.version,
            content_hash: header.content_hash,
            plan,
            positions: Vec::new(),
            normals: plan.has_normal.then(Vec::new),
            uvs: Vec::new(),
            colors: plan.has_color.then(Vec::new),
            indices: Vec::new(),
            materials: Vec::new(),
        };

        self.decode_vertices(&mut cursor, &header, &plan, &mut object)?;
        object.indices = self.decode_indices(&mut cursor, &header, &plan)?;
        object.materials = self.decode_materials(&mut cursor, &header, &plan)?;

        debug!(
            version = ?object.version,
            vertices = object.vertex_count(),
            indices = object.indices.len(),
            materials = object.materials.len(),
            "Decoded static object"
        );
        Ok(object)
    }
}
