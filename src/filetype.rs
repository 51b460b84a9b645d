//! File type descriptors, the built-in catalog, and an open registry.
//!
//! A descriptor binds a content type and extension to a validator.  The
//! catalog is a set of `const` descriptors; callers add their own with
//! [`FileTypeDescriptor::custom`] or [`FileTypeDescriptor::with_signature`]
//! instead of touching any dispatch code.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::errors::ContentError;
use crate::signature;

/// `primary/subtype`, e.g. `image/jpeg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    pub primary: Cow<'static, str>,
    pub subtype: Cow<'static, str>,
}

impl ContentType {
    pub const fn from_static(primary: &'static str, subtype: &'static str) -> Self {
        Self {
            primary: Cow::Borrowed(primary),
            subtype: Cow::Borrowed(subtype),
        }
    }

    pub fn new(primary: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            primary: Cow::Owned(primary.into()),
            subtype: Cow::Owned(subtype.into()),
        }
    }

    /// Parse `type/subtype`, ignoring parameters and ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        let essence = s.split(';').next()?.trim();
        let (primary, subtype) = essence.split_once('/')?;
        if primary.is_empty() || subtype.is_empty() {
            return None;
        }
        Some(Self::new(primary.to_ascii_lowercase(), subtype.to_ascii_lowercase()))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary, self.subtype)
    }
}

type CheckFn = dyn Fn(&[u8]) -> Result<(), ContentError> + Send + Sync;

/// The byte check behind a descriptor.
#[derive(Clone)]
pub enum Validator {
    /// A plain function, used by the built-in catalog.
    Builtin(fn(&[u8]) -> Result<(), ContentError>),
    /// The buffer must start with these bytes.
    Prefix(&'static [u8]),
    /// Any caller-supplied check.
    Custom(Arc<CheckFn>),
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Builtin(_) => f.write_str("Builtin"),
            Validator::Prefix(p) => write!(f, "Prefix({} bytes)", p.len()),
            Validator::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A file format: content type, canonical extension and byte check.
#[derive(Debug, Clone)]
pub struct FileTypeDescriptor {
    content_type: ContentType,
    extension: Cow<'static, str>,
    validator: Validator,
}

impl FileTypeDescriptor {
    const fn builtin(
        primary: &'static str,
        subtype: &'static str,
        extension: &'static str,
        check: fn(&[u8]) -> Result<(), ContentError>,
    ) -> Self {
        Self {
            content_type: ContentType::from_static(primary, subtype),
            extension: Cow::Borrowed(extension),
            validator: Validator::Builtin(check),
        }
    }

    /// Descriptor whose buffers must start with `magic`.
    pub const fn with_signature(
        primary: &'static str,
        subtype: &'static str,
        extension: &'static str,
        magic: &'static [u8],
    ) -> Self {
        Self {
            content_type: ContentType::from_static(primary, subtype),
            extension: Cow::Borrowed(extension),
            validator: Validator::Prefix(magic),
        }
    }

    /// Descriptor with an arbitrary check.
    pub fn custom<F>(
        primary: impl Into<String>,
        subtype: impl Into<String>,
        extension: impl Into<String>,
        check: F,
    ) -> Self
    where
        F: Fn(&[u8]) -> Result<(), ContentError> + Send + Sync + 'static,
    {
        Self {
            content_type: ContentType::new(primary, subtype),
            extension: Cow::Owned(extension.into()),
            validator: Validator::Custom(Arc::new(check)),
        }
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Canonical extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Check that `bytes` really are of this type.
    pub fn validate(&self, bytes: &[u8]) -> Result<(), ContentError> {
        match &self.validator {
            Validator::Builtin(check) => check(bytes),
            Validator::Prefix(magic) => {
                if bytes.starts_with(magic) {
                    Ok(())
                } else {
                    Err(ContentError::ContentMismatch {
                        expected: self.content_type.to_string(),
                        detected: signature::sniff(bytes).map(str::to_owned),
                    })
                }
            }
            Validator::Custom(check) => check(bytes),
        }
    }
}

// ── Built-in catalog ─────────────────────────────────────────

// Images (signature-checked)
pub const JPEG: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "jpeg", "jpg", signature::jpeg);
pub const PNG: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "png", "png", signature::png);
pub const GIF: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "gif", "gif", signature::gif);
pub const WEBP: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "webp", "webp", signature::webp);
pub const TIFF: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "tiff", "tiff", signature::tiff);
pub const BMP: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "bmp", "bmp", signature::bmp);
pub const HEIC: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "heic", "heic", signature::heic);
pub const AVIF: FileTypeDescriptor = FileTypeDescriptor::builtin("image", "avif", "avif", signature::avif);

// Documents
pub const PDF: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "pdf", "pdf", signature::pdf);
pub const CSV: FileTypeDescriptor = FileTypeDescriptor::builtin("text", "csv", "csv", signature::csv);
pub const JSON: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "json", "json", signature::any);
pub const PLAIN_TEXT: FileTypeDescriptor = FileTypeDescriptor::builtin("text", "plain", "txt", signature::any);

// Office
pub const DOC: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "msword", "doc", signature::any);
pub const DOCX: FileTypeDescriptor = FileTypeDescriptor::builtin(
    "application",
    "vnd.openxmlformats-officedocument.wordprocessingml.document",
    "docx",
    signature::any,
);
pub const XLS: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "vnd.ms-excel", "xls", signature::any);
pub const XLSX: FileTypeDescriptor = FileTypeDescriptor::builtin(
    "application",
    "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "xlsx",
    signature::any,
);
pub const PPT: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "vnd.ms-powerpoint", "ppt", signature::any);
pub const PPTX: FileTypeDescriptor = FileTypeDescriptor::builtin(
    "application",
    "vnd.openxmlformats-officedocument.presentationml.presentation",
    "pptx",
    signature::any,
);

// Archives
pub const ZIP: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "zip", "zip", signature::any);
pub const GZIP: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "gzip", "gz", signature::any);
pub const TAR: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "x-tar", "tar", signature::any);
pub const SEVEN_ZIP: FileTypeDescriptor = FileTypeDescriptor::builtin("application", "x-7z-compressed", "7z", signature::any);

// Audio
pub const MP3: FileTypeDescriptor = FileTypeDescriptor::builtin("audio", "mpeg", "mp3", signature::any);
pub const WAV: FileTypeDescriptor = FileTypeDescriptor::builtin("audio", "wav", "wav", signature::any);
pub const OGG: FileTypeDescriptor = FileTypeDescriptor::builtin("audio", "ogg", "ogg", signature::any);
pub const M4A: FileTypeDescriptor = FileTypeDescriptor::builtin("audio", "mp4", "m4a", signature::any);

// Video
pub const MP4: FileTypeDescriptor = FileTypeDescriptor::builtin("video", "mp4", "mp4", signature::any);
pub const WEBM: FileTypeDescriptor = FileTypeDescriptor::builtin("video", "webm", "webm", signature::any);
pub const MOV: FileTypeDescriptor = FileTypeDescriptor::builtin("video", "quicktime", "mov", signature::any);

// Fonts
pub const WOFF: FileTypeDescriptor = FileTypeDescriptor::builtin("font", "woff", "woff", signature::any);
pub const WOFF2: FileTypeDescriptor = FileTypeDescriptor::builtin("font", "woff2", "woff2", signature::any);
pub const TTF: FileTypeDescriptor = FileTypeDescriptor::builtin("font", "ttf", "ttf", signature::any);
pub const OTF: FileTypeDescriptor = FileTypeDescriptor::builtin("font", "otf", "otf", signature::any);

pub const OCTET_STREAM: FileTypeDescriptor =
    FileTypeDescriptor::builtin("application", "octet-stream", "bin", signature::any);

/// Every built-in descriptor, in registry order.
pub const BUILTIN: &[FileTypeDescriptor] = &[
    JPEG, PNG, GIF, WEBP, TIFF, BMP, HEIC, AVIF, PDF, CSV, JSON, PLAIN_TEXT, DOC, DOCX, XLS, XLSX,
    PPT, PPTX, ZIP, GZIP, TAR, SEVEN_ZIP, MP3, WAV, OGG, M4A, MP4, WEBM, MOV, WOFF, WOFF2, TTF,
    OTF, OCTET_STREAM,
];

/// Extra extensions that map onto a catalog entry.
const EXTENSION_ALIASES: &[(&str, &str)] = &[("jpeg", "jpg"), ("tif", "tiff"), ("text", "txt")];

// ── Registry ─────────────────────────────────────────────────

/// Ordered, extensible set of descriptors.
///
/// Lookups scan newest first, so a registered descriptor shadows an earlier
/// one with the same extension or content type.
#[derive(Debug, Clone, Default)]
pub struct FileTypeRegistry {
    descriptors: Vec<FileTypeDescriptor>,
}

impl FileTypeRegistry {
    /// Registry with no descriptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in catalog.
    pub fn builtin() -> Self {
        Self {
            descriptors: BUILTIN.to_vec(),
        }
    }

    pub fn register(&mut self, descriptor: FileTypeDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileTypeDescriptor> {
        self.descriptors.iter()
    }

    /// Look up by extension.  Case-insensitive; a leading dot is ignored.
    pub fn by_extension(&self, ext: &str) -> Option<&FileTypeDescriptor> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        let canonical = EXTENSION_ALIASES
            .iter()
            .find(|(alias, _)| *alias == ext)
            .map_or(ext.as_str(), |(_, canonical)| *canonical);
        self.descriptors.iter().rev().find(|d| {
            d.extension().eq_ignore_ascii_case(&ext) || d.extension().eq_ignore_ascii_case(canonical)
        })
    }

    /// Look up by content type.  Parameters (`; charset=...`) are ignored.
    pub fn by_content_type(&self, content_type: &str) -> Option<&FileTypeDescriptor> {
        let wanted = ContentType::parse(content_type)?;
        self.descriptors.iter().rev().find(|d| {
            d.content_type.primary.eq_ignore_ascii_case(&wanted.primary)
                && d.content_type.subtype.eq_ignore_ascii_case(&wanted.subtype)
        })
    }

    /// Look up by the extension of `filename`.
    pub fn for_filename(&self, filename: &str) -> Option<&FileTypeDescriptor> {
        let (_, ext) = filename.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        self.by_extension(ext)
    }
}
