use base64::Engine;
use std::path::{Path, PathBuf};

/// MIME type used when the extension is unknown or missing.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// An image ready to be embedded inline in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    /// Standard base64 of the file bytes
    pub payload: String,
}

impl EncodedImage {
    /// Encode in-memory bytes (no file I/O).
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Render as a `data:<mime>;base64,<payload>` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

/// Read a local image and encode it as an inline data reference.
///
/// The MIME type comes from the file extension. Unknown extensions fall
/// back to [`FALLBACK_MIME_TYPE`] instead of failing.
///
/// # Errors
///
/// Returns [`EncodeError::ImageRead`] if the file cannot be read.
pub fn encode_image(path: &Path) -> Result<EncodedImage, EncodeError> {
    let bytes = std::fs::read(path).map_err(|source| EncodeError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mime_type = guess_mime_type(path);
    log::debug!(
        "Encoded {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime_type
    );
    Ok(EncodedImage::from_bytes(&bytes, mime_type))
}

/// Guess the MIME type from the file extension.
///
/// Unknown or missing extensions yield [`FALLBACK_MIME_TYPE`].
pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}

/// Errors that can occur while encoding an image.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Failed to read image {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn decode(payload: &str) -> Vec<u8> {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap()
    }

    #[test]
    fn encode_round_trips_file_bytes() {
        let mut file = tempfile::Builder::new().suffix(".JPEG").tempfile().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        file.write_all(&bytes).unwrap();

        let encoded = encode_image(file.path()).unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(decode(&encoded.payload), bytes);
    }

    #[test]
    fn encode_empty_file() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let encoded = encode_image(file.path()).unwrap();
        assert_eq!(encoded.payload, "");
        assert_eq!(encoded.to_data_url(), "data:image/png;base64,");
    }

    #[test]
    fn encode_unknown_extension_falls_back() {
        let mut file = tempfile::Builder::new().suffix(".xyz123").tempfile().unwrap();
        file.write_all(b"raw").unwrap();
        let encoded = encode_image(file.path()).unwrap();
        assert_eq!(encoded.mime_type, "application/octet-stream");
        assert_eq!(decode(&encoded.payload), b"raw");
    }

    #[test]
    fn encode_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.jpg");
        let err = encode_image(&path).unwrap_err();
        assert!(err.to_string().contains("nope.jpg"));
    }

    #[test]
    fn data_url_format() {
        let image = EncodedImage::from_bytes(b"hi", "image/png");
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn guess_mime_type_from_extension() {
        assert_eq!(guess_mime_type(Path::new("a/img1.JPEG")), "image/jpeg");
        assert_eq!(guess_mime_type(Path::new("b.Png")), "image/png");
        assert_eq!(guess_mime_type(Path::new("c.webp")), "image/webp");
        assert_eq!(guess_mime_type(Path::new("scan.pdf")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime_type(Path::new("noext")), FALLBACK_MIME_TYPE);
        assert_eq!(guess_mime_type(Path::new(".hidden")), FALLBACK_MIME_TYPE);
    }
}
