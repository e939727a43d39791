//! elassets-parsers
//!
//! Decoders for the character and world asset files of an isometric MMORPG
//! client. Every decoder takes the complete file as a byte slice and returns
//! a fully populated, Y-up value or a typed error.
//!
//! # Supported Formats
//!
//! | Format | Extension | Description |
//! |--------|-----------|-------------|
//! | CMF    | `.cmf`    | Cal3D skinned mesh |
//! | CSF    | `.csf`    | Cal3D skeleton |
//! | CAF    | `.caf`    | Cal3D keyframe animation |
//! | E3D    | `.e3d`    | Static 3D object |
//! | 2D0    | `.2d0`    | Flat (billboard/ground) object definition, text |
//! | ELM    | `.elm`    | Map layout |
//!
//! # Example
//!
//! ```rust,ignore
//! use elassets_parsers::{CmfDecoder, Decoder};
//!
//! let mesh = CmfDecoder::new().decode(&bytes)?;
//! println!("{} vertices", mesh.vertex_count());
//! ```

pub mod batch;
pub mod caf;
pub mod cmf;
pub mod csf;
pub mod cursor;
pub mod e3d;
pub mod elm;
pub mod flat;
pub mod logging;
pub mod registry;
pub mod traits;

// Re-export main types
pub use traits::{
    DecodeError, DecodeOptions, DecodeResult, Decoder, ErrorKind, HierarchicalDecoder,
};

pub use registry::{
    register_builtin_decoders, AnyDecoder, DecodedAsset, DecoderInfo, DecoderRegistration,
    DecoderRegistrationBuilder, DecoderRegistry, RegistryError, GLOBAL_REGISTRY,
};

pub use batch::{decode_batch, BatchItem, BatchSummary};
pub use cursor::BinaryCursor;

pub use caf::{Animation, CafDecoder, Keyframe, Track};
pub use cmf::{CmfDecoder, SkinnedMesh, Spring, SubMesh};
pub use csf::{Bone, CsfDecoder, Skeleton};
pub use e3d::{E3dDecoder, E3dVersion, Material, StaticObject, VertexPlan};
pub use elm::{ElmDecoder, Grid, Light, MapDef, ParticleSystem, PlacedObject2d, PlacedObject3d};
pub use flat::{FlatObjectDecoder, FlatObjectDef, FlatObjectType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
