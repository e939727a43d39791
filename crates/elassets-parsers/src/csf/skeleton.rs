// elassets-parsers/src/csf/skeleton.rs
//! Skeleton and bone structures

use elassets_core::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Child bone ids as stored in the file
pub type ChildIds = SmallVec<[u32; 4]>;

/// Bone hierarchy, an arena indexed by bone id
///
/// Bone ids are assigned in file order. A well-formed skeleton has exactly
/// one root; this is not checked while decoding, see [`Skeleton::single_root`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    /// File version following the magic
    pub version: u32,
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Get bone by id
    pub fn get_bone(&self, id: u32) -> Option<&Bone> {
        self.bones.get(id as usize)
    }

    /// Find bone by name
    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    /// Ids of all bones without a parent
    pub fn root_ids(&self) -> Vec<u32> {
        self.bones.iter().filter(|b| b.is_root()).map(|b| b.id).collect()
    }

    /// The root id when exactly one bone is a root
    pub fn single_root(&self) -> Option<u32> {
        match self.root_ids().as_slice() {
            [root] => Some(*root),
            _ => None,
        }
    }

    /// Child lists rebuilt from parent ids in one forward scan.
    ///
    /// Parents outside the arena are ignored.
    pub fn derived_child_ids(&self) -> Vec<Vec<u32>> {
        let mut children = vec![Vec::new(); self.bones.len()];
        for bone in &self.bones {
            if let Some(parent) = bone.parent() {
                if let Some(list) = children.get_mut(parent as usize) {
                    list.push(bone.id);
                }
            }
        }
        children
    }

    /// Children of a bone, derived from parent ids
    pub fn children(&self, id: u32) -> Vec<u32> {
        self.bones
            .iter()
            .filter(|b| b.parent() == Some(id))
            .map(|b| b.id)
            .collect()
    }

    /// Bone ids from `id` up to its root.
    ///
    /// Stops early on a missing parent or a parent cycle.
    pub fn chain_to_root(&self, id: u32) -> Vec<u32> {
        let mut chain = Vec::new();
        let mut current = self.get_bone(id);

        while let Some(bone) = current {
            if chain.contains(&bone.id) || chain.len() > self.bones.len() {
                break;
            }
            chain.push(bone.id);
            current = bone.parent().and_then(|p| self.get_bone(p));
        }

        chain
    }

    /// Get all bone names in id order
    pub fn bone_names(&self) -> Vec<&str> {
        self.bones.iter().map(|b| b.name.as_str()).collect()
    }
}

/// A single bone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Position in file order
    pub id: u32,
    pub name: String,
    /// Model-space translation (Y-up)
    pub translation: Vec3,
    /// Model-space rotation (Y-up)
    pub rotation: Quat,
    /// Translation relative to the parent (Y-up)
    pub local_translation: Vec3,
    /// Rotation relative to the parent (Y-up)
    pub local_rotation: Quat,
    /// Parent bone id, negative for a root
    pub parent_id: i32,
    /// Child ids as stored; [`Skeleton::derived_child_ids`] is authoritative
    pub child_ids: ChildIds,
}

impl Bone {
    pub fn is_root(&self) -> bool {
        self.parent_id < 0
    }

    /// Parent id, `None` for a root
    pub fn parent(&self) -> Option<u32> {
        u32::try_from(self.parent_id).ok()
    }
}
