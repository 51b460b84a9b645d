//! Limits, suffixes and binary signatures shared by the encoder and the
//! upload guard.

// ── Upload size limits ───────────────────────────────────────

/// Size limit applied when a config is built without an explicit one (10 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Hard ceiling for any configured size limit (1 GiB).
pub const MAX_UPLOAD_SIZE: u64 = 1024 * 1024 * 1024;

/// Characters that may not appear in an upload filename.
pub const PATH_SEPARATORS: &[char] = &['/', '\\'];

// ── Field encoding ───────────────────────────────────────────

/// Appended once to an array's name under `ArrayEncoding::BracketSuffix`.
pub const ARRAY_BRACKET_SUFFIX: &str = "[]";

/// Media type of the rendered envelope.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

// ── Binary signatures ────────────────────────────────────────
// Offsets are from the start of the buffer.

pub const JPEG_MAGIC: &[u8; 3] = &[0xFF, 0xD8, 0xFF];
pub const PNG_MAGIC: &[u8; 8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
pub const GIF87A_MAGIC: &[u8; 6] = b"GIF87a";
pub const GIF89A_MAGIC: &[u8; 6] = b"GIF89a";
/// `RIFF` at 0..4, then a 4-byte chunk size, then `WEBP` at 8..12.
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WEBP_FOURCC: &[u8; 4] = b"WEBP";
pub const TIFF_LE_MAGIC: &[u8; 4] = &[0x49, 0x49, 0x2A, 0x00];
pub const TIFF_BE_MAGIC: &[u8; 4] = &[0x4D, 0x4D, 0x00, 0x2A];
pub const BMP_MAGIC: &[u8; 2] = b"BM";
pub const PDF_MAGIC: &[u8; 5] = b"%PDF-";

/// ISO-BMFF `ftyp` box type, at bytes 4..8 (after the 4-byte box size).
pub const FTYP_BOX: &[u8; 4] = b"ftyp";
pub const HEIC_BRAND: &[u8; 4] = b"heic";
pub const AVIF_BRAND: &[u8; 4] = b"avif";

/// Box size + box type + major brand.
pub const ISO_BMFF_MIN_LEN: usize = 12;
