//! elassets
//!
//! Decoders for the skinned meshes, skeletons, animations, static objects,
//! flat objects and maps of an isometric MMORPG client.
//!
//! The format decoders live in [`elassets_parsers`], the shared value types
//! and numeric codecs in [`elassets_core`]. This crate re-exports both and
//! adds a one-call entry point over the global decoder registry.

pub use elassets_parsers as parsers;

pub use elassets_core::{BoundingBox, Quat, Vec3};
pub use elassets_parsers::{
    DecodeError, DecodeOptions, DecodedAsset, Decoder, ErrorKind, RegistryError, GLOBAL_REGISTRY,
};

/// Decode one asset, picking the decoder from the file name or magic bytes
pub fn decode(file_name: &str, data: &[u8]) -> Result<DecodedAsset, RegistryError> {
    decode_with_options(file_name, data, &DecodeOptions::default())
}

/// [`decode`] with custom options
pub fn decode_with_options(
    file_name: &str,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<DecodedAsset, RegistryError> {
    elassets_parsers::logging::instrument_decode("registry", file_name, || {
        GLOBAL_REGISTRY.decode(file_name, data, options)
    })
}

/// Re-export commonly used items
pub mod prelude {
    pub use elassets_core::prelude::*;
    pub use elassets_parsers::{
        Animation, CafDecoder, CmfDecoder, CsfDecoder, DecodeError, DecodeOptions, DecodeResult,
        DecodedAsset, Decoder, E3dDecoder, ElmDecoder, FlatObjectDecoder, FlatObjectDef,
        HierarchicalDecoder, MapDef, Skeleton, SkinnedMesh, StaticObject,
    };
}
