//! Multipart form collection for the upload endpoints.
//!
//! Upload forms mix text fields (metadata) and file parts; this module
//! drains a [`Multipart`] stream into an in-memory [`FormData`] that
//! handlers can query by name.

use std::collections::HashMap;

use axum::extract::Multipart;

use assetforge_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// A file part from an upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename; only its extension is preserved.
    pub filename: String,
    pub data: Vec<u8>,
}

/// All parts of a multipart form, keyed by field name.
///
/// Later parts with the same name overwrite earlier ones.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Drain a multipart stream. Parts with a filename become files,
    /// everything else becomes a text field.
    pub async fn collect(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }

            if let Some(filename) = field.file_name() {
                let filename = filename.to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.files.insert(
                    name,
                    UploadedFile {
                        filename,
                        data: data.to_vec(),
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// A text field's value, if present and non-empty.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// A required text field, or a validation error naming it.
    pub fn require_field(&self, name: &str) -> AppResult<String> {
        self.field(name).map(str::to_string).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Missing required field '{name}'"
            )))
        })
    }

    /// A required text field parsed as an id.
    pub fn require_id(&self, name: &str) -> AppResult<i64> {
        let raw = self.require_field(name)?;
        raw.parse().map_err(|_| {
            AppError::Core(CoreError::Validation(format!(
                "Field '{name}' must be a numeric id, got '{raw}'"
            )))
        })
    }

    /// A file part, if present.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}
