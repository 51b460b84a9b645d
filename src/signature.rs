//! Leading-byte signature checks for the built-in file types.
//!
//! Each check has the validator shape `fn(&[u8]) -> Result<(), ContentError>`
//! and only inspects the bytes named in its table row:
//!
//!   JPEG       : [0..3]  = FF D8 FF
//!   PNG        : [0..8]  = 89 50 4E 47 0D 0A 1A 0A
//!   GIF        : [0..6]  = "GIF87a" | "GIF89a"
//!   WebP       : [0..4]  = "RIFF", [8..12] = "WEBP"
//!   TIFF       : [0..4]  = 49 49 2A 00 | 4D 4D 00 2A
//!   BMP        : [0..2]  = "BM"
//!   HEIC/AVIF  : [4..8]  = "ftyp", [8..12] = brand; shorter than 12 bytes
//!                is InsufficientData rather than a mismatch
//!   PDF        : [0..5]  = "%PDF-"
//!   CSV        : whole buffer is UTF-8

use crate::constants::*;
use crate::errors::ContentError;

pub(crate) const MIME_JPEG: &str = "image/jpeg";
pub(crate) const MIME_PNG: &str = "image/png";
pub(crate) const MIME_GIF: &str = "image/gif";
pub(crate) const MIME_WEBP: &str = "image/webp";
pub(crate) const MIME_TIFF: &str = "image/tiff";
pub(crate) const MIME_BMP: &str = "image/bmp";
pub(crate) const MIME_HEIC: &str = "image/heic";
pub(crate) const MIME_AVIF: &str = "image/avif";
pub(crate) const MIME_PDF: &str = "application/pdf";
pub(crate) const MIME_CSV: &str = "text/csv";

/// Best-effort identification of `bytes` against the signature table.
///
/// Used to fill `ContentMismatch::detected`.  Text formats are never
/// reported since any UTF-8 buffer would match.
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(JPEG_MAGIC) {
        Some(MIME_JPEG)
    } else if bytes.starts_with(PNG_MAGIC) {
        Some(MIME_PNG)
    } else if is_gif(bytes) {
        Some(MIME_GIF)
    } else if is_webp(bytes) {
        Some(MIME_WEBP)
    } else if is_tiff(bytes) {
        Some(MIME_TIFF)
    } else if bytes.starts_with(PDF_MAGIC) {
        Some(MIME_PDF)
    } else if has_brand(bytes, HEIC_BRAND) {
        Some(MIME_HEIC)
    } else if has_brand(bytes, AVIF_BRAND) {
        Some(MIME_AVIF)
    } else if bytes.starts_with(BMP_MAGIC) {
        // Two bytes is a weak signature; keep it last.
        Some(MIME_BMP)
    } else {
        None
    }
}

fn mismatch(expected: &str, bytes: &[u8]) -> ContentError {
    ContentError::ContentMismatch {
        expected: expected.to_owned(),
        detected: sniff(bytes).map(str::to_owned),
    }
}

fn require(ok: bool, expected: &str, bytes: &[u8]) -> Result<(), ContentError> {
    if ok {
        Ok(())
    } else {
        Err(mismatch(expected, bytes))
    }
}

fn is_gif(bytes: &[u8]) -> bool {
    bytes.starts_with(GIF87A_MAGIC) || bytes.starts_with(GIF89A_MAGIC)
}

fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && bytes.starts_with(RIFF_MAGIC) && &bytes[8..12] == WEBP_FOURCC
}

fn is_tiff(bytes: &[u8]) -> bool {
    bytes.starts_with(TIFF_LE_MAGIC) || bytes.starts_with(TIFF_BE_MAGIC)
}

fn has_brand(bytes: &[u8], brand: &[u8; 4]) -> bool {
    bytes.len() >= ISO_BMFF_MIN_LEN && &bytes[4..8] == FTYP_BOX && &bytes[8..12] == brand
}

pub fn jpeg(bytes: &[u8]) -> Result<(), ContentError> {
    require(bytes.starts_with(JPEG_MAGIC), MIME_JPEG, bytes)
}

pub fn png(bytes: &[u8]) -> Result<(), ContentError> {
    require(bytes.starts_with(PNG_MAGIC), MIME_PNG, bytes)
}

pub fn gif(bytes: &[u8]) -> Result<(), ContentError> {
    require(is_gif(bytes), MIME_GIF, bytes)
}

pub fn webp(bytes: &[u8]) -> Result<(), ContentError> {
    require(is_webp(bytes), MIME_WEBP, bytes)
}

pub fn tiff(bytes: &[u8]) -> Result<(), ContentError> {
    require(is_tiff(bytes), MIME_TIFF, bytes)
}

pub fn bmp(bytes: &[u8]) -> Result<(), ContentError> {
    require(bytes.starts_with(BMP_MAGIC), MIME_BMP, bytes)
}

pub fn pdf(bytes: &[u8]) -> Result<(), ContentError> {
    require(bytes.starts_with(PDF_MAGIC), MIME_PDF, bytes)
}

pub fn heic(bytes: &[u8]) -> Result<(), ContentError> {
    iso_bmff(bytes, HEIC_BRAND, MIME_HEIC)
}

pub fn avif(bytes: &[u8]) -> Result<(), ContentError> {
    iso_bmff(bytes, AVIF_BRAND, MIME_AVIF)
}

fn iso_bmff(bytes: &[u8], brand: &[u8; 4], expected: &str) -> Result<(), ContentError> {
    if bytes.len() < ISO_BMFF_MIN_LEN {
        return Err(ContentError::InsufficientData {
            expected: expected.to_owned(),
            required: ISO_BMFF_MIN_LEN,
            actual: bytes.len(),
        });
    }
    require(has_brand(bytes, brand), expected, bytes)
}

pub fn csv(bytes: &[u8]) -> Result<(), ContentError> {
    require(std::str::from_utf8(bytes).is_ok(), MIME_CSV, bytes)
}

/// Validator for formats identified by metadata only.
pub fn any(_bytes: &[u8]) -> Result<(), ContentError> {
    Ok(())
}
