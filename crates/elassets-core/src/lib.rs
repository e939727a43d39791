//! elassets core library
//!
//! This crate provides the value types, the coordinate-system conversion and
//! the small numeric codecs shared by every elassets decoder.
//!
//! Source assets are authored in a left-handed, Z-up space. Everything a
//! decoder hands out is converted to a right-handed, Y-up space with
//! [`Vec3::to_y_up`] and [`Quat::to_y_up`].

pub mod codec;
pub mod types;

pub use codec::{
    decode_compressed_normal, encode_compressed_normal, f32_to_half, half_to_f32,
};
pub use types::*;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::codec::*;
    pub use crate::types::*;
}
