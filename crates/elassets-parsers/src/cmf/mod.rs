// elassets-parsers/src/cmf/mod.rs
//! CMF (Cal3D binary mesh) decoder
//!
//! # Format Structure
//! ```text
//! magic "CMF\0" | version u32 | submesh count u32
//! per submesh:
//!   material id i32 | vertex, face, lod step, spring, map counts (u32)
//!   per vertex:
//!     position 3×f32 | normal 3×f32 | collapse id i32 | face collapses u32
//!     map count × (u, v) f32
//!     influence count u32 | influence count × (bone u32, weight f32)
//!     spring weight f32 (only when spring count > 0)
//!   spring count × (vertex u32, vertex u32, coefficient f32, idle length f32)
//!   face count × 3×u32
//! ```

mod mesh;

pub use mesh::{SkinnedMesh, Spring, SubMesh, INFLUENCES_PER_VERTEX};

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::cursor::BinaryCursor;
use crate::traits::{Decoder, DecodeOptions, DecodeResult};

/// CMF file magic
pub const CMF_MAGIC: &[u8; 4] = b"CMF\0";

/// Smallest possible vertex record (no maps, no influences, no springs)
const MIN_VERTEX_SIZE: usize = 36;
const FACE_SIZE: usize = 12;
const SPRING_SIZE: usize = 16;
const SUBMESH_HEADER_SIZE: usize = 24;
const UV_SIZE: usize = 8;

type Influences = SmallVec<[(u32, f32); INFLUENCES_PER_VERTEX]>;

/// Skeletal mesh decoder
pub struct CmfDecoder;

impl CmfDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_submesh(
        &self,
        cursor: &mut BinaryCursor<'_>,
        options: &DecodeOptions,
    ) -> DecodeResult<SubMesh> {
        let material_id = cursor.read_i32()?;
        let vertex_count = cursor.read_count("vertices", options)?;
        let face_count = cursor.read_count("faces", options)?;
        let lod_steps = cursor.read_u32()?;
        let spring_count = cursor.read_count("springs", options)?;
        let map_count = cursor.read_count("texture maps", options)?;

        trace!(
            offset = cursor.position(),
            vertex_count,
            face_count,
            spring_count,
            map_count,
            "Submesh header"
        );

        // maps only carry data through vertices
        let map_count = if vertex_count > 0 {
            cursor.ensure(map_count.saturating_mul(UV_SIZE))?;
            map_count
        } else {
            0
        };

        let capacity = vertex_capacity(cursor, vertex_count, map_count);
        let mut submesh = SubMesh {
            material_id,
            lod_steps,
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            uvs: (0..map_count).map(|_| Vec::with_capacity(capacity)).collect(),
            indices: Vec::new(),
            skin_bone_indices: Vec::with_capacity(capacity * INFLUENCES_PER_VERTEX),
            skin_weights: Vec::with_capacity(capacity * INFLUENCES_PER_VERTEX),
            collapse_ids: Vec::with_capacity(capacity),
            face_collapse_counts: Vec::with_capacity(capacity),
            spring_weights: (spring_count > 0).then(|| Vec::with_capacity(capacity)),
            springs: Vec::new(),
        };

        for vertex in 0..vertex_count {
            submesh.positions.push(cursor.read_vec3_y_up()?);
            submesh.normals.push(cursor.read_vec3_y_up()?);
            submesh.collapse_ids.push(cursor.read_i32()?);
            submesh.face_collapse_counts.push(cursor.read_u32()?);

            for map in submesh.uvs.iter_mut() {
                map.push([cursor.read_f32()?, cursor.read_f32()?]);
            }

            let influences = read_influences(cursor, options, vertex)?;
            for slot in 0..INFLUENCES_PER_VERTEX {
                let (bone, weight) = influences.get(slot).copied().unwrap_or((0, 0.0));
                submesh.skin_bone_indices.push(bone);
                submesh.skin_weights.push(weight);
            }

            if let Some(weights) = submesh.spring_weights.as_mut() {
                weights.push(cursor.read_f32()?);
            }
        }

        submesh.springs = Vec::with_capacity(cursor.capacity_for(spring_count, SPRING_SIZE));
        for _ in 0..spring_count {
            submesh.springs.push(Spring {
                vertex_ids: [cursor.read_u32()?, cursor.read_u32()?],
                coefficient: cursor.read_f32()?,
                idle_length: cursor.read_f32()?,
            });
        }

        submesh.indices = Vec::with_capacity(cursor.capacity_for(face_count, FACE_SIZE) * 3);
        for _ in 0..face_count {
            submesh.indices.push(cursor.read_u32()?);
            submesh.indices.push(cursor.read_u32()?);
            submesh.indices.push(cursor.read_u32()?);
        }

        Ok(submesh)
    }
}

/// Read one vertex's influence list, keeping the four heaviest
fn read_influences(
    cursor: &mut BinaryCursor<'_>,
    options: &DecodeOptions,
    vertex: usize,
) -> DecodeResult<Influences> {
    let count = cursor.read_count("bone influences", options)?;
    let mut influences = Influences::new();
    for _ in 0..count {
        influences.push((cursor.read_u32()?, cursor.read_f32()?));
    }

    if influences.len() > INFLUENCES_PER_VERTEX {
        warn!(
            vertex,
            count,
            "Vertex has more than {} bone influences, keeping the heaviest",
            INFLUENCES_PER_VERTEX
        );
        // stable sort keeps file order among equal weights
        influences.sort_by(|a, b| b.1.total_cmp(&a.1));
        influences.truncate(INFLUENCES_PER_VERTEX);
    }

    Ok(influences)
}

impl Default for CmfDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for CmfDecoder {
    type Output = SkinnedMesh;

    fn extensions(&self) -> &[&str] {
        &["cmf"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(CMF_MAGIC)
    }

    fn name(&self) -> &str {
        "Cal3D Mesh Decoder"
    }

    fn decode_with_options(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<Self::Output> {
        let mut cursor = BinaryCursor::new(data);
        cursor.expect_magic(CMF_MAGIC)?;
        let version = cursor.read_u32()?;
        let submesh_count = cursor.read_count("submeshes", options)?;

        let mut submeshes = Vec::with_capacity(cursor.capacity_for(submesh_count, SUBMESH_HEADER_SIZE));
        for index in 0..submesh_count {
            let submesh = self
                .decode_submesh(&mut cursor, options)
                .map_err(|e| e.with_context(format!("submesh {index}")))?;
            submeshes.push(submesh);
        }

        let mesh = SkinnedMesh { version, submeshes };
        debug!(
            version,
            submeshes = mesh.submeshes.len(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Decoded skinned mesh"
        );
        Ok(mesh)
    }
}

/// Vertices worth preallocating: no more than the remaining bytes could hold
/// once every vertex carries its uv pairs.
fn vertex_capacity(cursor: &BinaryCursor<'_>, vertex_count: usize, map_count: usize) -> usize {
    let vertex_size = MIN_VERTEX_SIZE.saturating_add(map_count.saturating_mul(UV_SIZE));
    cursor.capacity_for(vertex_count, vertex_size)
}
