//! Per-type asset metadata: the discriminated variant model.
//!
//! Every asset carries a metadata document whose required fields depend on
//! the asset type. The variants are serialized as a tagged JSON object
//! (`"type"` discriminator) and stored in the `assets.metadata` jsonb
//! column, so the API can flatten them back into asset responses.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The five supported asset types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Model3d,
    Sound,
    Image,
    Video,
    Scripting,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Model3d,
        AssetKind::Sound,
        AssetKind::Image,
        AssetKind::Video,
        AssetKind::Scripting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Model3d => "model3d",
            AssetKind::Sound => "sound",
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Scripting => "scripting",
        }
    }

    /// 3D models must ship a screenshot for the preview pane.
    pub fn requires_screenshot(self) -> bool {
        matches!(self, AssetKind::Model3d)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown asset type '{s}'. Must be one of: model3d, sound, image, video, scripting"
                ))
            })
    }
}

/// Type-specific metadata, discriminated on `"type"`.
///
/// Numeric fields (`duration`, `bitrate`, `frame_rate`) are coerced from
/// the multipart text values at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetMetadata {
    Model3d {
        format: String,
        environment: String,
        size: String,
        condition: String,
        polycount: String,
    },
    Sound {
        format: String,
        sound_type: String,
        duration: f64,
        bitrate: f64,
    },
    Image {
        format: String,
        resolution: String,
        color_depth: String,
    },
    Video {
        format: String,
        resolution: String,
        frame_rate: f64,
        duration: f64,
    },
    Scripting {
        language: String,
    },
}

impl AssetMetadata {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetMetadata::Model3d { .. } => AssetKind::Model3d,
            AssetMetadata::Sound { .. } => AssetKind::Sound,
            AssetMetadata::Image { .. } => AssetKind::Image,
            AssetMetadata::Video { .. } => AssetKind::Video,
            AssetMetadata::Scripting { .. } => AssetKind::Scripting,
        }
    }

    /// Build validated metadata from the text fields of an upload form.
    ///
    /// Missing required fields and non-numeric values for numeric fields
    /// are reported as [`CoreError::Validation`].
    pub fn from_fields(
        kind: AssetKind,
        fields: &HashMap<String, String>,
    ) -> Result<Self, CoreError> {
        let meta = match kind {
            AssetKind::Model3d => AssetMetadata::Model3d {
                format: require(fields, "format")?,
                environment: require(fields, "environment")?,
                size: require(fields, "size")?,
                condition: require(fields, "condition")?,
                polycount: require(fields, "polycount")?,
            },
            AssetKind::Sound => AssetMetadata::Sound {
                format: require(fields, "format")?,
                sound_type: require(fields, "sound_type")?,
                duration: require_number(fields, "duration")?,
                bitrate: require_number(fields, "bitrate")?,
            },
            AssetKind::Image => AssetMetadata::Image {
                format: require(fields, "format")?,
                resolution: require(fields, "resolution")?,
                color_depth: require(fields, "color_depth")?,
            },
            AssetKind::Video => AssetMetadata::Video {
                format: require(fields, "format")?,
                resolution: require(fields, "resolution")?,
                frame_rate: require_number(fields, "frame_rate")?,
                duration: require_number(fields, "duration")?,
            },
            AssetKind::Scripting => AssetMetadata::Scripting {
                language: require(fields, "language")?,
            },
        };
        Ok(meta)
    }

    /// Apply a field-merge patch to a stored metadata document and
    /// re-validate the result against the asset's type.
    ///
    /// The `"type"` discriminator cannot be changed through a patch; any
    /// `"type"` key in the patch is ignored.
    pub fn patched(
        current: &serde_json::Value,
        patch: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, CoreError> {
        let mut merged = current
            .as_object()
            .cloned()
            .ok_or_else(|| CoreError::Internal("Stored metadata is not an object".into()))?;

        for (key, value) in patch {
            if key == "type" {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }

        serde_json::from_value(serde_json::Value::Object(merged))
            .map_err(|e| CoreError::Validation(format!("Invalid metadata patch: {e}")))
    }

    /// Serialize to the tagged JSON document stored in the database.
    pub fn to_value(&self) -> serde_json::Value {
        // A tagged enum of plain fields always serializes cleanly.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn require(fields: &HashMap<String, String>, name: &str) -> Result<String, CoreError> {
    fields
        .get(name)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| CoreError::Validation(format!("Missing required field '{name}'")))
}

fn require_number(fields: &HashMap<String, String>, name: &str) -> Result<f64, CoreError> {
    let raw = require(fields, name)?;
    raw.parse::<f64>()
        .map_err(|_| CoreError::Validation(format!("Field '{name}' must be a number, got '{raw}'")))
}
