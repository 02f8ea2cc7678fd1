//! Avatar uploads.
//!
//! The uploaded image is embedded in the user record as a base64 `data:`
//! URL. Reading is the one asynchronous step of a registration: the submit
//! waits for it and is aborted if it fails.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use mochileros_core::{AvatarSource, AvatarUpload};

/// Errors that can occur while reading an avatar upload.
#[derive(Debug, Error)]
pub enum FileReadError {
    /// The file could not be opened or read.
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file holds no data.
    #[error("{file_name} is empty")]
    Empty { file_name: String },
}

/// Read the upload and encode it as a `data:` URL.
///
/// # Errors
///
/// Returns `FileReadError` if the file cannot be read or is empty.
pub async fn read_avatar(upload: &AvatarUpload) -> Result<String, FileReadError> {
    let bytes = match &upload.source {
        AvatarSource::Bytes(bytes) => bytes.clone(),
        AvatarSource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| FileReadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
    };

    if bytes.is_empty() {
        return Err(FileReadError::Empty {
            file_name: upload.file_name.clone(),
        });
    }

    tracing::debug!(
        file_name = %upload.file_name,
        bytes = bytes.len(),
        "Avatar read"
    );

    Ok(format!(
        "data:{};base64,{}",
        upload.mime_type(),
        STANDARD.encode(&bytes)
    ))
}
