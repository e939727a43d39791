//! Decoder registry for dynamic decoder discovery and management.
//!
//! The registry provides a centralized way to register, discover, and
//! instantiate decoders by id, file extension or magic bytes, and to decode
//! a buffer without knowing its format up front.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::caf::{Animation, CafDecoder};
use crate::cmf::{CmfDecoder, SkinnedMesh};
use crate::csf::{CsfDecoder, Skeleton};
use crate::e3d::{E3dDecoder, StaticObject};
use crate::elm::{ElmDecoder, MapDef};
use crate::flat::{FlatObjectDecoder, FlatObjectDef};
use crate::traits::{extension_of, DecodeError, DecodeOptions, DecodeResult, Decoder};

/// Output of any registered decoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodedAsset {
    Mesh(SkinnedMesh),
    Skeleton(Skeleton),
    Animation(Animation),
    StaticObject(StaticObject),
    FlatObject(FlatObjectDef),
    Map(MapDef),
}

impl DecodedAsset {
    /// Short name of the asset kind
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedAsset::Mesh(_) => "mesh",
            DecodedAsset::Skeleton(_) => "skeleton",
            DecodedAsset::Animation(_) => "animation",
            DecodedAsset::StaticObject(_) => "static object",
            DecodedAsset::FlatObject(_) => "flat object",
            DecodedAsset::Map(_) => "map",
        }
    }
}

impl From<SkinnedMesh> for DecodedAsset {
    fn from(value: SkinnedMesh) -> Self {
        DecodedAsset::Mesh(value)
    }
}

impl From<Skeleton> for DecodedAsset {
    fn from(value: Skeleton) -> Self {
        DecodedAsset::Skeleton(value)
    }
}

impl From<Animation> for DecodedAsset {
    fn from(value: Animation) -> Self {
        DecodedAsset::Animation(value)
    }
}

impl From<StaticObject> for DecodedAsset {
    fn from(value: StaticObject) -> Self {
        DecodedAsset::StaticObject(value)
    }
}

impl From<FlatObjectDef> for DecodedAsset {
    fn from(value: FlatObjectDef) -> Self {
        DecodedAsset::FlatObject(value)
    }
}

impl From<MapDef> for DecodedAsset {
    fn from(value: MapDef) -> Self {
        DecodedAsset::Map(value)
    }
}

/// Type-erased decoder wrapper for storage in the registry
pub trait AnyDecoder: Send + Sync {
    /// Get the decoder name
    fn decoder_name(&self) -> &str;

    /// Get magic bytes if applicable
    fn decoder_magic(&self) -> Option<&[u8]>;

    /// Decode into the type-erased asset enum
    fn decode_any(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<DecodedAsset>;
}

impl<T> AnyDecoder for T
where
    T: Decoder + 'static,
    T::Output: Into<DecodedAsset>,
{
    fn decoder_name(&self) -> &str {
        Decoder::name(self)
    }

    fn decoder_magic(&self) -> Option<&[u8]> {
        Decoder::magic_bytes(self)
    }

    fn decode_any(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<DecodedAsset> {
        self.decode_with_options(data, options).map(Into::into)
    }
}

/// Factory function type for creating decoder instances
pub type DecoderFactory = Box<dyn Fn() -> Arc<dyn AnyDecoder> + Send + Sync>;

/// Registration entry for a decoder
pub struct DecoderRegistration {
    /// Unique identifier for this decoder
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this decoder handles
    pub description: String,
    /// File extensions handled (lowercase)
    pub extensions: Vec<String>,
    /// Priority for extension conflicts (higher = preferred)
    pub priority: i32,
    /// Factory function to create decoder instance
    pub factory: DecoderFactory,
}

/// Decoder registry
pub struct DecoderRegistry {
    /// Map of decoder ID to registration
    decoders: RwLock<HashMap<String, DecoderRegistration>>,
    /// Map of extensions to decoder IDs (sorted by priority)
    extension_map: RwLock<HashMap<String, Vec<String>>>,
    /// Cached decoder instances
    instances: RwLock<HashMap<String, Arc<dyn AnyDecoder>>>,
}

impl DecoderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            decoders: RwLock::new(HashMap::new()),
            extension_map: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding the built-in decoders
    pub fn with_builtin_decoders() -> Self {
        let registry = Self::new();
        register_builtin_decoders(&registry);
        registry
    }

    /// Register a new decoder
    pub fn register(&self, registration: DecoderRegistration) -> Result<(), RegistryError> {
        let id = registration.id.clone();

        let mut decoders = self.decoders.write();
        if decoders.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }

        let extensions: Vec<String> = registration
            .extensions
            .iter()
            .map(|e| e.to_lowercase())
            .collect();
        decoders.insert(id.clone(), registration);

        // Update extension map
        let mut ext_map = self.extension_map.write();
        for ext in extensions {
            let ids = ext_map.entry(ext).or_default();
            ids.push(id.clone());

            // Sort by priority (descending), stable for equal priorities
            ids.sort_by(|a, b| {
                let pa = decoders.get(a).map(|d| d.priority).unwrap_or(0);
                let pb = decoders.get(b).map(|d| d.priority).unwrap_or(0);
                pb.cmp(&pa)
            });
        }

        Ok(())
    }

    /// Unregister a decoder by ID
    pub fn unregister(&self, id: &str) -> Result<(), RegistryError> {
        let mut decoders = self.decoders.write();
        let registration = decoders
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        let mut ext_map = self.extension_map.write();
        for ext in &registration.extensions {
            if let Some(ids) = ext_map.get_mut(&ext.to_lowercase()) {
                ids.retain(|i| i != id);
            }
        }

        self.instances.write().remove(id);
        Ok(())
    }

    /// Get a decoder instance by ID
    pub fn get(&self, id: &str) -> Result<Arc<dyn AnyDecoder>, RegistryError> {
        // Check cache first
        if let Some(instance) = self.instances.read().get(id) {
            return Ok(Arc::clone(instance));
        }

        // Create new instance
        let instance = {
            let decoders = self.decoders.read();
            let registration = decoders
                .get(id)
                .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
            (registration.factory)()
        };

        // Cache it, keeping any instance another thread stored first
        let mut instances = self.instances.write();
        let cached = instances
            .entry(id.to_string())
            .or_insert_with(|| Arc::clone(&instance));
        Ok(Arc::clone(cached))
    }

    /// Get a decoder for a file extension
    pub fn get_for_extension(&self, ext: &str) -> Result<Arc<dyn AnyDecoder>, RegistryError> {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();

        let id = {
            let ext_map = self.extension_map.read();
            ext_map
                .get(&ext_lower)
                .and_then(|ids| ids.first())
                .cloned()
                .ok_or_else(|| RegistryError::NoDecoderForExtension(ext_lower.clone()))?
        };

        self.get(&id)
    }

    /// Get a decoder for a file name by its extension
    pub fn get_for_name(&self, file_name: &str) -> Result<Arc<dyn AnyDecoder>, RegistryError> {
        match extension_of(file_name) {
            Some(ext) => self.get_for_extension(ext),
            None => Err(RegistryError::NoDecoderForName(file_name.to_string())),
        }
    }

    /// Find a decoder whose magic bytes start `data`
    pub fn detect(&self, data: &[u8]) -> Option<Arc<dyn AnyDecoder>> {
        let mut ids: Vec<(i32, String)> = self
            .decoders
            .read()
            .values()
            .map(|d| (d.priority, d.id.clone()))
            .collect();
        ids.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        ids.into_iter()
            .filter_map(|(_, id)| self.get(&id).ok())
            .find(|d| d.decoder_magic().is_some_and(|m| data.starts_with(m)))
    }

    /// Decode a buffer, choosing the decoder by extension, then by magic
    pub fn decode(
        &self,
        file_name: &str,
        data: &[u8],
        options: &DecodeOptions,
    ) -> Result<DecodedAsset, RegistryError> {
        let decoder = match self.get_for_name(file_name) {
            Ok(decoder) => decoder,
            Err(_) => self
                .detect(data)
                .ok_or_else(|| RegistryError::NoDecoderForName(file_name.to_string()))?,
        };

        decoder
            .decode_any(data, options)
            .map_err(|source| RegistryError::Decode {
                file_name: file_name.to_string(),
                source,
            })
    }

    /// List all registered decoders
    pub fn list(&self) -> Vec<DecoderInfo> {
        let mut infos: Vec<DecoderInfo> = self
            .decoders
            .read()
            .values()
            .map(|d| DecoderInfo {
                id: d.id.clone(),
                name: d.name.clone(),
                description: d.description.clone(),
                extensions: d.extensions.clone(),
                priority: d.priority,
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder information for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub extensions: Vec<String>,
    pub priority: i32,
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Decoder with ID '{0}' already registered")]
    DuplicateId(String),

    #[error("Decoder with ID '{0}' not found")]
    NotFound(String),

    #[error("No decoder available for extension '.{0}'")]
    NoDecoderForExtension(String),

    #[error("No decoder available for file: {0}")]
    NoDecoderForName(String),

    #[error("Decoding {file_name} failed: {source}")]
    Decode {
        file_name: String,
        #[source]
        source: DecodeError,
    },
}

/// Global registry instance
pub static GLOBAL_REGISTRY: Lazy<DecoderRegistry> = Lazy::new(DecoderRegistry::with_builtin_decoders);

fn builtin<D, F>(
    id: &str,
    name: &str,
    description: &str,
    extensions: &[&str],
    factory: F,
) -> DecoderRegistration
where
    F: Fn() -> D + Send + Sync + 'static,
    D: Decoder + 'static,
    D::Output: Into<DecodedAsset>,
{
    DecoderRegistration {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        extensions: extensions.iter().map(|s| s.to_string()).collect(),
        priority: 100,
        factory: Box::new(move || Arc::new(factory())),
    }
}

/// Register all built-in decoders
pub fn register_builtin_decoders(registry: &DecoderRegistry) {
    let registrations = [
        builtin("cmf", "Cal3D Mesh Decoder", "Decodes Cal3D binary skinned meshes", &["cmf"], CmfDecoder::new),
        builtin("csf", "Cal3D Skeleton Decoder", "Decodes Cal3D binary skeletons", &["csf"], CsfDecoder::new),
        builtin("caf", "Cal3D Animation Decoder", "Decodes Cal3D binary animations", &["caf"], CafDecoder::new),
        builtin("e3d", "E3D Static Object Decoder", "Decodes static 3D objects", &["e3d"], E3dDecoder::new),
        builtin("2d0", "2D0 Flat Object Decoder", "Decodes flat object definitions", &["2d0"], FlatObjectDecoder::new),
        builtin("elm", "ELM Map Decoder", "Decodes map layouts", &["elm"], ElmDecoder::new),
    ];

    for registration in registrations {
        let id = registration.id.clone();
        if let Err(e) = registry.register(registration) {
            warn!(id = %id, error = %e, "Skipping built-in decoder");
        }
    }
}

/// Builder for decoder registration
pub struct DecoderRegistrationBuilder {
    id: Option<String>,
    name: Option<String>,
    description: String,
    extensions: Vec<String>,
    priority: i32,
    factory: Option<DecoderFactory>,
}

impl DecoderRegistrationBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            description: String::new(),
            extensions: Vec::new(),
            priority: 0,
            factory: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.extensions = exts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn factory<F, D>(mut self, factory: F) -> Self
    where
        F: Fn() -> D + Send + Sync + 'static,
        D: Decoder + 'static,
        D::Output: Into<DecodedAsset>,
    {
        self.factory = Some(Box::new(move || Arc::new(factory())));
        self
    }

    pub fn build(self) -> Result<DecoderRegistration, &'static str> {
        let id = self.id.ok_or("ID is required")?;
        let factory = self.factory.ok_or("Factory is required")?;

        Ok(DecoderRegistration {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            description: self.description,
            extensions: self.extensions,
            priority: self.priority,
            factory,
        })
    }
}

impl Default for DecoderRegistrationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
