//! Photo evidence encoding.
//!
//! Reports carry their photo inline as a `data:` URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest accepted photo file (5 MiB).
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("unsupported photo type '{0}' (expected jpg, jpeg, png, webp or gif)")]
    UnsupportedType(String),

    #[error("photo is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("cannot read photo '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the MIME type for a supported image extension.
fn mime_for(path: &Path) -> Result<&'static str, PhotoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => Err(PhotoError::UnsupportedType(ext)),
    }
}

/// Encodes raw bytes as a `data:` URI.
#[must_use]
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads and encodes a photo file.
///
/// Type and size are checked before the file content is read.
///
/// # Errors
///
/// Returns [`PhotoError`] for unsupported extensions, oversized files or
/// read failures.
pub async fn encode_file(path: &Path) -> Result<String, PhotoError> {
    let mime = mime_for(path)?;

    let read_err = |source| PhotoError::Read {
        path: path.to_path_buf(),
        source,
    };
    let size = tokio::fs::metadata(path).await.map_err(read_err)?.len();
    if size > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge {
            size,
            limit: MAX_PHOTO_BYTES,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(read_err)?;
    Ok(data_uri(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("a.JPG")).unwrap(), "image/jpeg");
        assert_eq!(mime_for(Path::new("a.jpeg")).unwrap(), "image/jpeg");
        assert_eq!(mime_for(Path::new("a.png")).unwrap(), "image/png");
        assert_eq!(mime_for(Path::new("a.webp")).unwrap(), "image/webp");
        assert_eq!(mime_for(Path::new("a.gif")).unwrap(), "image/gif");
        assert!(matches!(
            mime_for(Path::new("a.bmp")),
            Err(PhotoError::UnsupportedType(ref e)) if e == "bmp"
        ));
        assert!(mime_for(Path::new("noext")).is_err());
    }

    #[test]
    fn data_uri_format() {
        assert_eq!(data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn encodes_small_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pothole.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let uri = encode_file(&path).await.unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn rejects_oversized_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("huge.jpg");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_PHOTO_BYTES + 1).unwrap();

        assert!(matches!(
            encode_file(&path).await,
            Err(PhotoError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let err = encode_file(Path::new("/nonexistent/photo.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/photo.png"));
    }
}
