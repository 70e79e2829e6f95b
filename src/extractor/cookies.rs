//! Temporary cookie file for authenticated extraction
//!
//! The cookies blob comes from the environment, either as raw Netscape
//! cookies.txt text or base64-encoded. It is written to a private temporary
//! file for the duration of one extraction; the file is removed when the
//! [`CookieFile`] is dropped, whatever way the extraction ends.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::ExtractError;

/// Scoped cookies.txt on disk
#[derive(Debug)]
pub struct CookieFile {
    file: NamedTempFile,
}

impl CookieFile {
    /// Materialize `blob` as a cookie file.
    ///
    /// Returns `None` for an empty or whitespace-only blob.
    pub fn from_blob(blob: &str) -> Result<Option<Self>, ExtractError> {
        let blob = blob.trim();
        if blob.is_empty() {
            return Ok(None);
        }

        let contents = decode_blob(blob);
        let mut file = tempfile::Builder::new()
            .prefix("cookies-")
            .suffix(".txt")
            .tempfile()
            .map_err(ExtractError::Credentials)?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.flush())
            .map_err(ExtractError::Credentials)?;

        tracing::debug!(path = %file.path().display(), "Wrote temporary cookie file");
        Ok(Some(Self { file }))
    }

    /// Read the blob from environment variable `var`, if set.
    pub fn from_env(var: &str) -> Result<Option<Self>, ExtractError> {
        match std::env::var(var) {
            Ok(blob) => Self::from_blob(&blob),
            Err(_) => Ok(None),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Base64 text decoding to UTF-8 is taken as encoded, anything else as raw.
fn decode_blob(blob: &str) -> String {
    let compact: String = blob.split_whitespace().collect();
    STANDARD
        .decode(compact.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| blob.to_string())
}
