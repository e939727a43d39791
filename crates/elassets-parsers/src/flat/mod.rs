// elassets-parsers/src/flat/mod.rs
//! 2D0 (flat object definition) decoder
//!
//! Text format, one `key: value` or `key=value` pair per line:
//! ```text
//! texture: ./textures/plants1.dds
//! file_x_len: 256
//! file_y_len: 256
//! x_size: 1.2
//! y_size: 1.6
//! u_start: 0
//! u_end: 64
//! v_start: 0
//! v_end: 128
//! alpha_test: 0.18
//! type: plant
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::cursor::strip_dot_slash;
use crate::traits::{DecodeError, DecodeOptions, DecodeResult, Decoder};

/// How a flat object is placed in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatObjectType {
    /// Lies on the terrain
    Ground,
    /// Billboard facing the camera
    Plant,
    /// Upright, fixed orientation
    Fence,
    /// Unrecognised `type` value
    Invalid,
}

impl FlatObjectType {
    /// Case-insensitive lookup; unknown names map to `Invalid`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ground" => Self::Ground,
            "plant" => Self::Plant,
            "fence" => Self::Fence,
            _ => Self::Invalid,
        }
    }
}

/// A decoded flat object definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatObjectDef {
    pub object_type: FlatObjectType,
    pub texture_path: String,
    /// World-space width
    pub width: f32,
    /// World-space height
    pub height: f32,
    /// Normalized texture quad, corners in fixed winding:
    /// `(u_start, v_start)`, `(u_end, v_start)`, `(u_end, v_end)`, `(u_start, v_end)`
    pub uvs: Option<[[f32; 2]; 4]>,
    /// Alpha cutoff, clamped to be non-negative
    pub alpha_test: Option<f32>,
}

/// Values collected while scanning lines
#[derive(Debug, Default)]
struct RawFlatObject {
    object_type: Option<String>,
    texture: Option<String>,
    file_x_len: Option<f32>,
    file_y_len: Option<f32>,
    x_size: Option<f32>,
    y_size: Option<f32>,
    u_start: Option<f32>,
    u_end: Option<f32>,
    v_start: Option<f32>,
    v_end: Option<f32>,
    alpha_test: Option<f32>,
}

fn parse_number(key: &str, value: &str, line: usize) -> DecodeResult<f32> {
    value.parse::<f32>().map_err(|e| DecodeError::InvalidValue {
        line,
        message: format!("{key} = {value:?}: {e}"),
    })
}

fn parse_extent(key: &str, value: &str, line: usize) -> DecodeResult<f32> {
    let extent = parse_number(key, value, line)?;
    if extent <= 0.0 {
        return Err(DecodeError::InvalidValue {
            line,
            message: format!("{key} must be positive, got {extent}"),
        });
    }
    Ok(extent)
}

/// Split a line at its first `:` or `=`
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let at = line.find(|c: char| c == ':' || c == '=')?;
    Some((line[..at].trim(), line[at + 1..].trim()))
}

impl RawFlatObject {
    fn scan(text: &str) -> DecodeResult<Self> {
        let mut raw = Self::default();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = split_pair(line) else {
                trace!(line = line_no, "Skipping line without separator");
                continue;
            };

            let key = key.to_ascii_lowercase();
            match key.as_str() {
                "type" => raw.object_type = Some(value.to_string()),
                "texture" => raw.texture = Some(strip_dot_slash(value).to_string()),
                "file_x_len" => raw.file_x_len = Some(parse_extent(&key, value, line_no)?),
                "file_y_len" => raw.file_y_len = Some(parse_extent(&key, value, line_no)?),
                "x_size" => raw.x_size = Some(parse_number(&key, value, line_no)?),
                "y_size" => raw.y_size = Some(parse_number(&key, value, line_no)?),
                "u_start" => raw.u_start = Some(parse_number(&key, value, line_no)?),
                "u_end" => raw.u_end = Some(parse_number(&key, value, line_no)?),
                "v_start" => raw.v_start = Some(parse_number(&key, value, line_no)?),
                "v_end" => raw.v_end = Some(parse_number(&key, value, line_no)?),
                "alpha_test" => raw.alpha_test = Some(parse_number(&key, value, line_no)?),
                _ => trace!(line = line_no, key = %key, "Ignoring unknown key"),
            }
        }

        Ok(raw)
    }

    fn uv_quad(&self) -> Option<[[f32; 2]; 4]> {
        let x_len = self.file_x_len.unwrap_or(1.0);
        let y_len = self.file_y_len.unwrap_or(1.0);
        let u0 = self.u_start? / x_len;
        let u1 = self.u_end? / x_len;
        let v0 = self.v_start? / y_len;
        let v1 = self.v_end? / y_len;
        Some([[u0, v0], [u1, v0], [u1, v1], [u0, v1]])
    }
}

/// Flat object decoder
pub struct FlatObjectDecoder;

impl FlatObjectDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode from already validated text
    pub fn decode_str(&self, text: &str, options: &DecodeOptions) -> DecodeResult<FlatObjectDef> {
        let raw = RawFlatObject::scan(text)?;

        let object_type = match raw.object_type.as_deref() {
            Some(name) => {
                let object_type = FlatObjectType::from_name(name);
                if object_type == FlatObjectType::Invalid {
                    if options.strict_object_types {
                        return Err(DecodeError::UnsupportedVariant(format!(
                            "flat object type {name:?}"
                        )));
                    }
                    warn!(object_type = %name, "Unknown flat object type");
                }
                object_type
            }
            None => FlatObjectType::Invalid,
        };

        let def = FlatObjectDef {
            object_type,
            uvs: raw.uv_quad(),
            alpha_test: raw.alpha_test.map(|a| a.max(0.0)),
            width: raw.x_size.ok_or_else(|| DecodeError::MissingField("x_size".into()))?,
            height: raw.y_size.ok_or_else(|| DecodeError::MissingField("y_size".into()))?,
            texture_path: raw
                .texture
                .ok_or_else(|| DecodeError::MissingField("texture".into()))?,
        };

        debug!(
            object_type = ?def.object_type,
            texture = %def.texture_path,
            has_uvs = def.uvs.is_some(),
            "Decoded flat object"
        );
        Ok(def)
    }
}

impl Default for FlatObjectDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FlatObjectDecoder {
    type Output = FlatObjectDef;

    fn extensions(&self) -> &[&str] {
        &["2d0"]
    }

    fn name(&self) -> &str {
        "2D0 Flat Object Decoder"
    }

    fn decode_with_options(&self, data: &[u8], options: &DecodeOptions) -> DecodeResult<Self::Output> {
        let text = std::str::from_utf8(data)?;
        self.decode_str(text, options)
    }
}
