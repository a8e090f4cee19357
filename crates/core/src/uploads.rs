//! Stored-filename generation for the upload directory.
//!
//! Uploaded files are stored flat under `uploads/` with generated names so
//! collisions between identically-named uploads are practically impossible:
//! `<unix-millis>-<9-digit random><original extension>`.

use std::path::Path;

use rand::Rng;

/// The URL prefix under which stored files are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Generate a stored filename for an uploaded file, preserving the
/// original's extension (including the dot), if any.
pub fn stored_filename(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);

    format!("{millis}-{suffix:09}{ext}")
}

/// The relative URL path (`/uploads/<name>`) for a stored filename.
pub fn relative_url(stored_name: &str) -> String {
    format!("{UPLOADS_PREFIX}/{stored_name}")
}
