use crate::domain::error::DomainError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

const DATA_URI_MARKER: &str = "base64,";

/// Standard alphabet, accepts payloads with or without trailing padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded query image normalized to 8-bit RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalImage {
    pixels: RgbImage,
}

impl CanonicalImage {
    /// Decode encoded image bytes (png, jpeg, webp, gif).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        if bytes.is_empty() {
            return Err(DomainError::Decode("image payload is empty".into()));
        }
        let decoded =
            image::load_from_memory(bytes).map_err(|e| DomainError::Decode(e.to_string()))?;
        Ok(Self {
            pixels: decoded.to_rgb8(),
        })
    }

    /// Decode a base64 payload, with or without a `data:<mime>;base64,` prefix.
    pub fn from_inline(data: &str) -> Result<Self, DomainError> {
        let bytes = decode_inline_payload(data)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Re-encode as PNG for transport to an embedding service.
    pub fn to_png(&self) -> Result<Vec<u8>, DomainError> {
        let mut buf = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| DomainError::Internal(format!("PNG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }
}

/// Whether a string looks like an inline data URI rather than a fetchable URL.
pub fn is_data_uri(value: &str) -> bool {
    value.trim_start().starts_with("data:")
}

/// Strip an optional data URI header and decode the base64 body.
pub fn decode_inline_payload(data: &str) -> Result<Vec<u8>, DomainError> {
    let payload = match data.find(DATA_URI_MARKER) {
        Some(pos) => &data[pos + DATA_URI_MARKER.len()..],
        None => data,
    };
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(DomainError::Decode("image payload is empty".into()));
    }
    LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| DomainError::Decode(format!("malformed base64: {e}")))
}
