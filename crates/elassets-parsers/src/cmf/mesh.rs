// elassets-parsers/src/cmf/mesh.rs
//! Skinned mesh structures

use elassets_core::Vec3;
use serde::{Deserialize, Serialize};

/// Bone influence slots stored per vertex
pub const INFLUENCES_PER_VERTEX: usize = 4;

/// A decoded skeletal mesh file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinnedMesh {
    /// File version following the magic
    pub version: u32,
    /// Submeshes in file order
    pub submeshes: Vec<SubMesh>,
}

impl SkinnedMesh {
    /// Total vertex count across all submeshes
    pub fn vertex_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::vertex_count).sum()
    }

    /// Total triangle count across all submeshes
    pub fn face_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::face_count).sum()
    }

    /// Check if any submesh carries spring (cloth) data
    pub fn has_springs(&self) -> bool {
        self.submeshes.iter().any(|s| !s.springs.is_empty())
    }

    /// Highest bone index referenced by a non-zero weight
    pub fn max_bone_index(&self) -> Option<u32> {
        self.submeshes
            .iter()
            .flat_map(|s| s.skin_bone_indices.iter().zip(&s.skin_weights))
            .filter(|&(_, &w)| w != 0.0)
            .map(|(&b, _)| b)
            .max()
    }
}

/// One material-homogeneous part of a skinned mesh
///
/// Per-vertex arrays share one index space. Skinning data is flattened
/// into four slots per vertex; unused slots hold bone 0 with weight 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubMesh {
    /// Material index, negative when unassigned
    pub material_id: i32,
    /// Level-of-detail collapse steps
    pub lod_steps: u32,
    /// Vertex positions (Y-up)
    pub positions: Vec<Vec3>,
    /// Vertex normals (Y-up)
    pub normals: Vec<Vec3>,
    /// Texture coordinates, one list per map (none without vertices)
    pub uvs: Vec<Vec<[f32; 2]>>,
    /// Triangle list, three indices per face
    pub indices: Vec<u32>,
    /// `4 × vertex_count` bone indices
    pub skin_bone_indices: Vec<u32>,
    /// `4 × vertex_count` weights
    pub skin_weights: Vec<f32>,
    /// LOD collapse target per vertex
    pub collapse_ids: Vec<i32>,
    /// LOD face collapse count per vertex
    pub face_collapse_counts: Vec<u32>,
    /// Spring weight per vertex, present when the submesh has springs
    pub spring_weights: Option<Vec<f32>>,
    pub springs: Vec<Spring>,
}

impl SubMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn map_count(&self) -> usize {
        self.uvs.len()
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Non-zero `(bone, weight)` influences of one vertex
    pub fn influences(&self, vertex: usize) -> impl Iterator<Item = (u32, f32)> + '_ {
        let start = (vertex * INFLUENCES_PER_VERTEX).min(self.skin_weights.len());
        let end = (start + INFLUENCES_PER_VERTEX).min(self.skin_weights.len());
        self.skin_bone_indices[start..end]
            .iter()
            .copied()
            .zip(self.skin_weights[start..end].iter().copied())
            .filter(|&(_, w)| w != 0.0)
    }
}

/// Spring constraint between two vertices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub vertex_ids: [u32; 2],
    pub coefficient: f32,
    pub idle_length: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SubMesh {
        SubMesh {
            positions: vec![Vec3::ZERO; 4],
            normals: vec![Vec3::UP; 4],
            indices: vec![0, 1, 2, 2, 3, 0],
            skin_bone_indices: vec![0; 16],
            skin_weights: vec![0.0; 16],
            ..Default::default()
        }
    }

    #[test]
    fn test_triangles() {
        let submesh = quad();
        let triangles: Vec<_> = submesh.triangles().collect();

        assert_eq!(submesh.face_count(), 2);
        assert_eq!(triangles, vec![[0, 1, 2], [2, 3, 0]]);
    }

    #[test]
    fn test_influences_skip_padding() {
        let mut submesh = quad();
        submesh.skin_bone_indices[4] = 7;
        submesh.skin_weights[4] = 0.75;
        submesh.skin_bone_indices[5] = 2;
        submesh.skin_weights[5] = 0.25;

        let influences: Vec<_> = submesh.influences(1).collect();
        assert_eq!(influences, vec![(7, 0.75), (2, 0.25)]);
        assert_eq!(submesh.influences(0).count(), 0);
        assert_eq!(submesh.influences(10).count(), 0);
    }

    #[test]
    fn test_mesh_totals() {
        let mut second = quad();
        second.skin_bone_indices[0] = 9;
        second.skin_weights[0] = 1.0;

        let mesh = SkinnedMesh {
            version: 1200,
            submeshes: vec![quad(), second],
        };

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 4);
        assert!(!mesh.has_springs());
        assert_eq!(mesh.max_bone_index(), Some(9));
    }
}
