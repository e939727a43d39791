// elassets-parsers/src/elm/records.rs
//! Fixed-size ELM record layouts

use elassets_core::Vec3;
use serde::{Deserialize, Serialize};

use crate::cursor::BinaryCursor;
use crate::traits::DecodeResult;

/// Width of every path field
pub const PATH_SIZE: usize = 80;

pub const OBJECT_3D_SIZE: u32 = 144;
pub const OBJECT_2D_SIZE: u32 = 128;
pub const LIGHT_SIZE: u32 = 40;
pub const PARTICLE_SIZE: u32 = 104;

/// `blended` value marking a 3D object as removed from the map
pub const BLENDED_EXCLUDED: u8 = 20;

/// A 3D object placed on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject3d {
    /// Position of the record in the file section
    pub record_index: u32,
    pub path: String,
    /// Y-up
    pub position: Vec3,
    /// Euler angles in degrees (Y-up)
    pub rotation: Vec3,
    pub self_lit: bool,
    pub blended: u8,
    /// RGB tint
    pub color: [f32; 3],
}

impl PlacedObject3d {
    pub(crate) fn parse(cursor: &mut BinaryCursor<'_>, record_index: u32) -> DecodeResult<Self> {
        let path = cursor.read_fixed_str(PATH_SIZE)?;
        let position = cursor.read_vec3_y_up()?;
        let rotation = cursor.read_vec3_y_up()?;
        let self_lit = cursor.read_u8()? != 0;
        let blended = cursor.read_u8()?;
        cursor.skip(2)?;
        let color = [cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?];
        cursor.skip(24)?;

        Ok(Self {
            record_index,
            path,
            position,
            rotation,
            self_lit,
            blended,
            color,
        })
    }

    pub fn is_excluded(&self) -> bool {
        self.blended == BLENDED_EXCLUDED
    }
}

/// A flat object placed on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject2d {
    pub path: String,
    pub position: Vec3,
    pub rotation: Vec3,
}

impl PlacedObject2d {
    pub(crate) fn parse(cursor: &mut BinaryCursor<'_>) -> DecodeResult<Self> {
        let path = cursor.read_fixed_str(PATH_SIZE)?;
        let position = cursor.read_vec3_y_up()?;
        let rotation = cursor.read_vec3_y_up()?;
        cursor.skip(24)?;
        Ok(Self {
            path,
            position,
            rotation,
        })
    }
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: [f32; 3],
}

impl Light {
    pub(crate) fn parse(cursor: &mut BinaryCursor<'_>) -> DecodeResult<Self> {
        let position = cursor.read_vec3_y_up()?;
        let color = [cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?];
        cursor.skip(16)?;
        Ok(Self { position, color })
    }
}

/// Particle system emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub path: String,
    pub position: Vec3,
}

impl ParticleSystem {
    pub(crate) fn parse(cursor: &mut BinaryCursor<'_>) -> DecodeResult<Self> {
        let path = cursor.read_fixed_str(PATH_SIZE)?;
        let position = cursor.read_vec3_y_up()?;
        cursor.skip(12)?;
        Ok(Self { path, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_field(path: &str) -> Vec<u8> {
        let mut field = path.as_bytes().to_vec();
        field.resize(PATH_SIZE, 0);
        field
    }

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_object_3d_layout() {
        let mut data = path_field("./3dobjects/house.e3d");
        data.extend(floats(&[10.0, 20.0, 1.0, 0.0, 0.0, 90.0]));
        data.extend_from_slice(&[1, 20, 0, 0]);
        data.extend(floats(&[1.0, 0.5, 0.25]));
        data.extend_from_slice(&[0; 24]);
        assert_eq!(data.len(), OBJECT_3D_SIZE as usize);

        let mut cursor = BinaryCursor::new(&data);
        let object = PlacedObject3d::parse(&mut cursor, 4).unwrap();

        assert_eq!(object.record_index, 4);
        assert_eq!(object.path, "3dobjects/house.e3d");
        assert_eq!(object.position, Vec3::new(10.0, 1.0, -20.0));
        assert_eq!(object.rotation, Vec3::new(0.0, 90.0, 0.0));
        assert!(object.self_lit);
        assert!(object.is_excluded());
        assert_eq!(object.color, [1.0, 0.5, 0.25]);
        assert!(cursor.at_end());
    }

    #[test]
    fn test_small_record_layouts() {
        let mut data = path_field("2dobjects/grass.2d0");
        data.extend(floats(&[1.0, 2.0, 0.0, 0.0, 0.0, 0.0]));
        data.extend_from_slice(&[0; 24]);
        data.extend(floats(&[5.0, 6.0, 7.0, 1.0, 1.0, 1.0]));
        data.extend_from_slice(&[0; 16]);
        data.extend(path_field("./particles/fire.part"));
        data.extend(floats(&[3.0, 4.0, 5.0]));
        data.extend_from_slice(&[0; 12]);
        assert_eq!(data.len(), (OBJECT_2D_SIZE + LIGHT_SIZE + PARTICLE_SIZE) as usize);

        let mut cursor = BinaryCursor::new(&data);
        let flat = PlacedObject2d::parse(&mut cursor).unwrap();
        let light = Light::parse(&mut cursor).unwrap();
        let particle = ParticleSystem::parse(&mut cursor).unwrap();

        assert_eq!(flat.path, "2dobjects/grass.2d0");
        assert_eq!(flat.position, Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(light.position, Vec3::new(5.0, 7.0, -6.0));
        assert_eq!(light.color, [1.0, 1.0, 1.0]);
        assert_eq!(particle.path, "particles/fire.part");
        assert_eq!(particle.position, Vec3::new(3.0, 5.0, -4.0));
        assert!(cursor.at_end());
    }
}
