//! Shared fixtures and encoders for the integration tests
//!
//! Every encoder writes the exact byte layout its decoder reads, converting
//! decoded Y-up values back to the Z-up source space.

#![allow(dead_code)]

use elassets_core::{encode_compressed_normal, f32_to_half, BoundingBox, Quat, Vec3};
use elassets_parsers::cmf::{CMF_MAGIC, INFLUENCES_PER_VERTEX as INFLUENCES};
use elassets_parsers::csf::CSF_MAGIC;
use elassets_parsers::caf::CAF_MAGIC;
use elassets_parsers::e3d::{E3dVersion, VertexPlan, E3D_MAGIC, TEXTURE_NAME_SIZE};
use elassets_parsers::elm::{
    BLOCKS_PER_TILE, ELM_HEADER_SIZE, ELM_MAGIC, LIGHT_SIZE, OBJECT_2D_SIZE, OBJECT_3D_SIZE,
    PARTICLE_SIZE, PATH_SIZE,
};
use elassets_parsers::{
    Animation, Bone, FlatObjectDef, FlatObjectType, Grid, Keyframe, Light, MapDef, Material,
    ParticleSystem, PlacedObject2d, PlacedObject3d, Skeleton, SkinnedMesh, Spring, StaticObject,
    SubMesh, Track,
};

/// Little-endian byte sink
#[derive(Default)]
pub struct Writer {
    pub bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(data);
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.bytes.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.raw(&v.to_le_bytes())
    }

    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.bytes.resize(self.bytes.len() + n, 0);
        self
    }

    /// Y-up vector written in source (Z-up) order
    pub fn vec3(&mut self, v: Vec3) -> &mut Self {
        let v = v.to_z_up();
        self.f32(v.x).f32(v.y).f32(v.z)
    }

    pub fn quat(&mut self, q: Quat) -> &mut Self {
        let q = q.to_z_up();
        self.f32(q.x).f32(q.y).f32(q.z).f32(q.w)
    }

    /// NUL-padded text field of `len` bytes
    pub fn fixed_str(&mut self, text: &str, len: usize) -> &mut Self {
        let mut field = text.as_bytes().to_vec();
        field.resize(len, 0);
        self.raw(&field)
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

// ---- CMF ----

pub fn encode_cmf(mesh: &SkinnedMesh) -> Vec<u8> {
    let mut w = Writer::new();
    w.raw(CMF_MAGIC).u32(mesh.version).u32(mesh.submeshes.len() as u32);

    for sub in &mesh.submeshes {
        w.i32(sub.material_id)
            .u32(sub.vertex_count() as u32)
            .u32(sub.face_count() as u32)
            .u32(sub.lod_steps)
            .u32(sub.springs.len() as u32)
            .u32(sub.uvs.len() as u32);

        for v in 0..sub.vertex_count() {
            w.vec3(sub.positions[v])
                .vec3(sub.normals[v])
                .i32(sub.collapse_ids[v])
                .u32(sub.face_collapse_counts[v]);
            for map in &sub.uvs {
                w.f32(map[v][0]).f32(map[v][1]);
            }
            w.u32(INFLUENCES as u32);
            for slot in 0..INFLUENCES {
                let at = v * INFLUENCES + slot;
                w.u32(sub.skin_bone_indices[at]).f32(sub.skin_weights[at]);
            }
            if let Some(weights) = &sub.spring_weights {
                w.f32(weights[v]);
            }
        }

        for spring in &sub.springs {
            w.u32(spring.vertex_ids[0])
                .u32(spring.vertex_ids[1])
                .f32(spring.coefficient)
                .f32(spring.idle_length);
        }
        for index in &sub.indices {
            w.u32(*index);
        }
    }

    w.finish()
}

/// Submesh with `vertices` vertices in a fan, `maps` texture maps and
/// optional springs
pub fn sample_submesh(material_id: i32, vertices: usize, maps: usize, springs: bool) -> SubMesh {
    let positions: Vec<Vec3> = (0..vertices)
        .map(|i| Vec3::new(i as f32, (i * 2) as f32, 0.5))
        .collect();
    let faces = vertices.saturating_sub(2);

    let mut skin_bone_indices = Vec::new();
    let mut skin_weights = Vec::new();
    for i in 0..vertices {
        skin_bone_indices.extend_from_slice(&[i as u32 % 3, 0, 0, 0]);
        skin_weights.extend_from_slice(&[1.0, 0.0, 0.0, 0.0]);
    }

    SubMesh {
        material_id,
        lod_steps: 0,
        normals: vec![Vec3::UP; vertices],
        uvs: if vertices == 0 {
            Vec::new()
        } else {
            (0..maps)
                .map(|m| (0..vertices).map(|i| [i as f32 * 0.1, m as f32]).collect())
                .collect()
        },
        indices: (0..faces)
            .flat_map(|f| [0, f as u32 + 1, f as u32 + 2])
            .collect(),
        skin_bone_indices,
        skin_weights,
        collapse_ids: vec![-1; vertices],
        face_collapse_counts: vec![0; vertices],
        spring_weights: springs.then(|| vec![0.25; vertices]),
        springs: if springs {
            vec![Spring {
                vertex_ids: [0, 1],
                coefficient: 0.5,
                idle_length: 1.0,
            }]
        } else {
            Vec::new()
        },
        positions,
    }
}

pub fn sample_mesh() -> SkinnedMesh {
    SkinnedMesh {
        version: 700,
        submeshes: vec![sample_submesh(0, 4, 1, false), sample_submesh(1, 3, 2, true)],
    }
}

// ---- CSF ----

pub fn encode_csf(skeleton: &Skeleton) -> Vec<u8> {
    let mut w = Writer::new();
    w.raw(CSF_MAGIC).u32(skeleton.version).u32(skeleton.bones.len() as u32);

    for bone in &skeleton.bones {
        w.u32(bone.name.len() as u32 + 1)
            .raw(bone.name.as_bytes())
            .u8(0)
            .vec3(bone.translation)
            .quat(bone.rotation)
            .vec3(bone.local_translation)
            .quat(bone.local_rotation)
            .i32(bone.parent_id)
            .u32(bone.child_ids.len() as u32);
        for child in &bone.child_ids {
            w.u32(*child);
        }
    }

    w.finish()
}

pub fn bone(id: u32, name: &str, parent_id: i32, children: &[u32]) -> Bone {
    Bone {
        id,
        name: name.to_string(),
        translation: Vec3::new(0.0, id as f32, 0.0),
        rotation: Quat::IDENTITY,
        local_translation: Vec3::new(0.0, 1.0, 0.0),
        local_rotation: Quat::new(0.0, 0.0, 0.0, 1.0),
        parent_id,
        child_ids: children.iter().copied().collect(),
    }
}

/// root -> spine -> (head, arm)
pub fn sample_skeleton() -> Skeleton {
    Skeleton {
        version: 700,
        bones: vec![
            bone(0, "root", -1, &[1]),
            bone(1, "spine", 0, &[2, 3]),
            bone(2, "head", 1, &[]),
            bone(3, "arm", 1, &[]),
        ],
    }
}

// ---- CAF ----

pub fn encode_caf(animation: &Animation) -> Vec<u8> {
    let mut w = Writer::new();
    w.raw(CAF_MAGIC)
        .u32(animation.version)
        .f32(animation.duration)
        .u32(animation.tracks.len() as u32);

    for track in &animation.tracks {
        w.u32(track.bone_id).u32(track.keyframes.len() as u32);
        for key in &track.keyframes {
            w.f32(key.time).vec3(key.translation).quat(key.rotation);
        }
    }

    w.finish()
}

pub fn sample_animation() -> Animation {
    let key = |time: f32, x: f32| Keyframe {
        time,
        translation: Vec3::new(x, 0.0, 1.0),
        rotation: Quat::new(0.0, 0.7071068, 0.0, 0.7071068),
    };
    Animation {
        version: 700,
        duration: 2.0,
        tracks: vec![
            Track {
                bone_id: 0,
                keyframes: vec![key(0.0, 0.0), key(1.0, 1.0), key(2.0, 2.0)],
            },
            Track {
                bone_id: 3,
                keyframes: vec![key(0.5, 0.0)],
            },
        ],
    }
}

// ---- E3D ----

const E3D_HEADER_OFFSET: u32 = 28;
const E3D_SECTION_TABLE_SIZE: u32 = 40;

pub fn encode_e3d(object: &StaticObject) -> Vec<u8> {
    let plan = object.plan;
    let vertex_offset = E3D_HEADER_OFFSET + E3D_SECTION_TABLE_SIZE;
    let index_offset = vertex_offset + object.vertex_count() as u32 * plan.vertex_size();
    let material_offset = index_offset + object.indices.len() as u32 * plan.index_size();

    let mut w = Writer::new();
    w.raw(E3D_MAGIC)
        .raw(&object.version.to_bytes())
        .raw(&object.content_hash)
        .u32(E3D_HEADER_OFFSET);
    w.u32(object.vertex_count() as u32)
        .u32(plan.vertex_size())
        .u32(vertex_offset)
        .u32(object.indices.len() as u32)
        .u32(plan.index_size())
        .u32(index_offset)
        .u32(object.materials.len() as u32)
        .u32(plan.material_size())
        .u32(material_offset)
        .u8(plan.options_byte())
        .u8(plan.format_byte())
        .zeros(2);

    for v in 0..object.vertex_count() {
        let uv = object.uvs[v];
        if plan.half_uv {
            w.u16(f32_to_half(uv[0])).u16(f32_to_half(uv[1]));
        } else {
            w.f32(uv[0]).f32(uv[1]);
        }
        w.zeros(plan.secondary_uv_size() as usize);

        if let Some(normals) = &object.normals {
            if plan.compressed_normal {
                w.u16(encode_compressed_normal(normals[v].to_z_up()));
            } else {
                w.vec3(normals[v]);
            }
        }
        w.zeros(plan.tangent_size() as usize);

        if plan.half_position {
            let p = object.positions[v].to_z_up();
            w.u16(f32_to_half(p.x)).u16(f32_to_half(p.y)).u16(f32_to_half(p.z));
        } else {
            w.vec3(object.positions[v]);
        }

        if let Some(colors) = &object.colors {
            w.raw(&colors[v]);
        }
    }

    for index in &object.indices {
        if plan.short_index {
            w.u16(*index as u16);
        } else {
            w.u32(*index);
        }
    }

    for material in &object.materials {
        w.u32(u32::from(material.is_transparent))
            .fixed_str(&material.texture_path, TEXTURE_NAME_SIZE)
            .vec3(material.bounds.min)
            .vec3(material.bounds.max)
            .u32(material.vertex_range[0])
            .u32(material.vertex_range[1])
            .u32(material.index_start)
            .u32(material.index_count);
        if plan.has_secondary_uv {
            w.zeros(TEXTURE_NAME_SIZE);
        }
    }

    w.finish()
}

/// A unit quad with one material, decodable under any plan
pub fn sample_static_object(version: E3dVersion, plan: VertexPlan) -> StaticObject {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, -1.0),
    ];
    StaticObject {
        version,
        content_hash: [7; 16],
        plan,
        normals: plan.has_normal.then(|| vec![Vec3::UP; 4]),
        uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        colors: plan.has_color.then(|| vec![[255, 128, 0, 255]; 4]),
        indices: vec![0, 1, 2, 0, 2, 3],
        materials: vec![Material {
            is_transparent: true,
            texture_path: "3dobjects/crate.dds".to_string(),
            bounds: BoundingBox::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 0.0)),
            vertex_range: [0, 3],
            index_start: 0,
            index_count: 6,
        }],
        positions,
    }
}

// ---- 2D0 ----

pub fn encode_2d0(def: &FlatObjectDef) -> String {
    let mut text = format!(
        "texture: {}\nx_size: {}\ny_size: {}\n",
        def.texture_path, def.width, def.height
    );
    if let Some(uvs) = def.uvs {
        text += &format!(
            "u_start: {}\nu_end: {}\nv_start: {}\nv_end: {}\n",
            uvs[0][0], uvs[2][0], uvs[0][1], uvs[2][1]
        );
    }
    if let Some(alpha) = def.alpha_test {
        text += &format!("alpha_test: {alpha}\n");
    }
    let type_name = match def.object_type {
        FlatObjectType::Ground => Some("ground"),
        FlatObjectType::Plant => Some("plant"),
        FlatObjectType::Fence => Some("fence"),
        FlatObjectType::Invalid => None,
    };
    if let Some(name) = type_name {
        text += &format!("type: {name}\n");
    }
    text
}

pub fn sample_flat_object() -> FlatObjectDef {
    FlatObjectDef {
        object_type: FlatObjectType::Plant,
        texture_path: "textures/bush.dds".to_string(),
        width: 1.25,
        height: 2.5,
        uvs: Some([[0.0, 0.5], [0.25, 0.5], [0.25, 1.0], [0.0, 1.0]]),
        alpha_test: Some(0.2),
    }
}

// ---- ELM ----

pub fn encode_elm(map: &MapDef) -> Vec<u8> {
    let tiles = map.tile_grid.cells.len() as u32;
    let tile_offset = ELM_HEADER_SIZE as u32;
    let elevation_offset = tile_offset + tiles;
    let objects_3d_offset = elevation_offset + map.elevation_grid.cells.len() as u32;
    let objects_2d_offset = objects_3d_offset + map.objects_3d.len() as u32 * OBJECT_3D_SIZE;
    let lights_offset = objects_2d_offset + map.objects_2d.len() as u32 * OBJECT_2D_SIZE;
    let particles_offset = lights_offset + map.lights.len() as u32 * LIGHT_SIZE;

    let mut w = Writer::new();
    w.raw(ELM_MAGIC)
        .u32(map.tile_grid.width)
        .u32(map.tile_grid.height)
        .u32(tile_offset)
        .u32(elevation_offset)
        .u32(OBJECT_3D_SIZE)
        .u32(map.objects_3d.len() as u32)
        .u32(objects_3d_offset)
        .u32(OBJECT_2D_SIZE)
        .u32(map.objects_2d.len() as u32)
        .u32(objects_2d_offset)
        .u32(LIGHT_SIZE)
        .u32(map.lights.len() as u32)
        .u32(lights_offset)
        .u8(u8::from(map.dungeon))
        .zeros(3)
        .f32(map.ambient[0])
        .f32(map.ambient[1])
        .f32(map.ambient[2])
        .u32(PARTICLE_SIZE)
        .u32(map.particles.len() as u32)
        .u32(particles_offset)
        .u32(0)
        .zeros(36);
    assert_eq!(w.len(), ELM_HEADER_SIZE);

    w.raw(&map.tile_grid.cells).raw(&map.elevation_grid.cells);

    for object in &map.objects_3d {
        w.fixed_str(&object.path, PATH_SIZE)
            .vec3(object.position)
            .vec3(object.rotation)
            .u8(u8::from(object.self_lit))
            .u8(object.blended)
            .zeros(2)
            .f32(object.color[0])
            .f32(object.color[1])
            .f32(object.color[2])
            .zeros(24);
    }
    for object in &map.objects_2d {
        w.fixed_str(&object.path, PATH_SIZE)
            .vec3(object.position)
            .vec3(object.rotation)
            .zeros(24);
    }
    for light in &map.lights {
        w.vec3(light.position)
            .f32(light.color[0])
            .f32(light.color[1])
            .f32(light.color[2])
            .zeros(16);
    }
    for particle in &map.particles {
        w.fixed_str(&particle.path, PATH_SIZE)
            .vec3(particle.position)
            .zeros(12);
    }

    w.finish()
}

pub fn placed_3d(record_index: u32, path: &str, blended: u8) -> PlacedObject3d {
    PlacedObject3d {
        record_index,
        path: path.to_string(),
        position: Vec3::new(record_index as f32, 0.0, -2.0),
        rotation: Vec3::new(0.0, 45.0, 0.0),
        self_lit: record_index % 2 == 0,
        blended,
        color: [1.0, 1.0, 1.0],
    }
}

/// A 2×1 tile map with one entity of each kind
pub fn sample_map() -> MapDef {
    let (width, height) = (2u32, 1u32);
    let blocks_w = width * BLOCKS_PER_TILE;
    let blocks_h = height * BLOCKS_PER_TILE;
    MapDef {
        dungeon: false,
        ambient: [0.25, 0.5, 0.75],
        tile_grid: Grid {
            width,
            height,
            cells: vec![3, 4],
        },
        elevation_grid: Grid {
            width: blocks_w,
            height: blocks_h,
            cells: (0..blocks_w * blocks_h).map(|i| (i % 32) as u8).collect(),
        },
        objects_3d: vec![placed_3d(0, "3dobjects/house.e3d", 0)],
        objects_2d: vec![PlacedObject2d {
            path: "2dobjects/grass.2d0".to_string(),
            position: Vec3::new(1.0, 0.0, -1.0),
            rotation: Vec3::ZERO,
        }],
        lights: vec![Light {
            position: Vec3::new(2.0, 3.0, -2.0),
            color: [1.0, 0.75, 0.5],
        }],
        particles: vec![ParticleSystem {
            path: "particles/fire.part".to_string(),
            position: Vec3::new(4.0, 0.5, -4.0),
        }],
    }
}
