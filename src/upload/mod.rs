//! Stored-name generation and filesystem writes for uploaded files.
//!
//! The upload directory is a shared, append-only namespace. Stored names are
//! `{unix-millis}-{disambiguator}{ext}`; the timestamp plus disambiguator is
//! what makes concurrent uploads collision-free, not locking.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

/// Extensions accepted for document uploads (resumes).
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Strip path separators and characters unsafe in a filename, collapse
/// whitespace runs to single dashes, collapse repeated dashes.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        match c {
            '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' | '\0' => {}
            c if c.is_whitespace() => pending_dash = true,
            '-' => pending_dash = true,
            c => {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.push(c);
            }
        }
    }
    out
}

/// Split a filename into base name and extension (including the leading dot).
/// An extension segment is alphanumeric only; anything else (separators,
/// whitespace, further dots) means the name has no usable extension and the
/// whole string is treated as the base.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx < name.len() - 1 => {
            let (base, ext) = name.split_at(idx);
            if ext[1..].chars().all(|c| c.is_ascii_alphanumeric()) {
                (base, ext)
            } else {
                (name, "")
            }
        }
        _ => (name, ""),
    }
}

/// The extension without its dot, lowercased. Empty if there is none.
pub fn extension(name: &str) -> String {
    split_extension(name).1.trim_start_matches('.').to_lowercase()
}

pub fn is_allowed_document(name: &str) -> bool {
    DOCUMENT_EXTENSIONS.contains(&extension(name).as_str())
}

/// Stored name for an image upload: timestamp plus the sanitized original
/// base name, keeping the original extension.
pub fn stored_image_name(original: &str) -> String {
    let (base, ext) = split_extension(original);
    let safe_base = sanitize_filename(base);
    let safe_base = if safe_base.is_empty() {
        "upload".to_string()
    } else {
        safe_base
    };
    format!("{}-{}{}", Utc::now().timestamp_millis(), safe_base, ext)
}

/// Stored name for a document upload: timestamp plus a random token, so the
/// original name never reaches the filesystem.
pub fn stored_document_name(original: &str) -> String {
    let (_, ext) = split_extension(original);
    format!("{}-{}{}", Utc::now().timestamp_millis(), Uuid::new_v4(), ext)
}

/// MIME type for an allow-listed document extension.
pub fn document_content_type(name: &str) -> &'static str {
    match extension(name).as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Write the file under the upload directory, returning its full path.
pub async fn save(dir: &Path, stored_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let path = dir.join(stored_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Compose the externally reachable address for a stored file from the
/// request's own scheme and host.
pub fn public_url(scheme: &str, host: &str, stored_name: &str) -> String {
    format!("{scheme}://{host}/uploads/{stored_name}")
}
