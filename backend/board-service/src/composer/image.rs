//! Inline image embedding: file bytes become a `data:` URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mime::Mime;
use rich_text::InlineImage;

use super::ComposerError;

/// Soft threshold above which the user is warned, not blocked
pub const DEFAULT_IMAGE_WARN_BYTES: usize = 500_000;

pub const IMAGE_ALT: &str = "uploaded image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub image: InlineImage,
    pub size: usize,
    pub oversized: bool,
}

/// Encode an image file for inline embedding.
///
/// Only `image/*` types are accepted. Files above `warn_bytes` are still
/// encoded; `oversized` tells the caller to warn.
pub fn encode_image(
    content_type: &str,
    bytes: &[u8],
    warn_bytes: usize,
) -> Result<EncodedImage, ComposerError> {
    let parsed: Mime = content_type
        .parse()
        .map_err(|_| ComposerError::UnsupportedImage(content_type.to_string()))?;
    if parsed.type_() != mime::IMAGE {
        return Err(ComposerError::UnsupportedImage(content_type.to_string()));
    }

    let src = format!("data:{};base64,{}", parsed.essence_str(), STANDARD.encode(bytes));
    Ok(EncodedImage {
        image: InlineImage::new(src, IMAGE_ALT),
        size: bytes.len(),
        oversized: bytes.len() > warn_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_becomes_data_url() {
        let encoded = encode_image("image/png", b"abc", DEFAULT_IMAGE_WARN_BYTES).unwrap();
        assert_eq!(encoded.image.src, "data:image/png;base64,YWJj");
        assert_eq!(encoded.image.alt, IMAGE_ALT);
        assert!(!encoded.oversized);
    }

    #[test]
    fn test_parameters_are_dropped_from_data_url() {
        let encoded = encode_image("image/svg+xml; charset=utf-8", b"<svg/>", 100).unwrap();
        assert!(encoded.image.src.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_large_file_is_flagged_not_refused() {
        let bytes = vec![0u8; 11];
        let encoded = encode_image("image/jpeg", &bytes, 10).unwrap();
        assert!(encoded.oversized);
        assert_eq!(encoded.size, 11);
    }

    #[test]
    fn test_non_image_rejected() {
        assert!(matches!(
            encode_image("application/pdf", b"%PDF", 100),
            Err(ComposerError::UnsupportedImage(_))
        ));
        assert!(matches!(
            encode_image("not a mime", b"", 100),
            Err(ComposerError::UnsupportedImage(_))
        ));
    }
}
