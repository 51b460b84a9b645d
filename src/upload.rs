//! File-upload guard: a validated upload config and the end-to-end check
//! of a candidate buffer against it.
//!
//! Check order is fixed because it decides which single error the caller
//! sees:
//!   1. empty buffer      → EmptyData
//!   2. over the limit    → FileTooLarge
//!   3. signature check   → Content(..)

use crate::constants::{DEFAULT_MAX_SIZE, MAX_UPLOAD_SIZE, PATH_SEPARATORS};
use crate::envelope::{DispositionFormatter, Part, PartBody, CONTENT_DISPOSITION, CONTENT_TYPE};
use crate::errors::{ConfigError, ValidationError};
use crate::filetype::{FileTypeDescriptor, FileTypeRegistry};

/// Where and how a file may be uploaded.  Always satisfies its invariants:
/// non-empty field name, a non-empty filename without path separators, and
/// `0 < max_size <= 1 GiB`.
#[derive(Debug, Clone)]
pub struct FileUploadConfig {
    field_name: String,
    filename: String,
    file_type: FileTypeDescriptor,
    max_size: u64,
}

impl FileUploadConfig {
    /// Config with the default 10 MiB limit.
    pub fn new(
        field_name: impl Into<String>,
        filename: impl Into<String>,
        file_type: FileTypeDescriptor,
    ) -> Result<Self, ConfigError> {
        let (field_name, filename) = check_names(field_name.into(), filename.into())?;
        Ok(Self {
            field_name,
            filename,
            file_type,
            max_size: DEFAULT_MAX_SIZE,
        })
    }

    /// Config with an explicit size limit in bytes.
    pub fn with_max_size(
        field_name: impl Into<String>,
        filename: impl Into<String>,
        file_type: FileTypeDescriptor,
        max_size: i64,
    ) -> Result<Self, ConfigError> {
        let (field_name, filename) = check_names(field_name.into(), filename.into())?;
        let max_size = check_max_size(max_size)?;
        Ok(Self {
            field_name,
            filename,
            file_type,
            max_size,
        })
    }

    /// Config whose file type is picked from `registry` by the filename's
    /// extension, with the default 10 MiB limit.
    pub fn for_filename(
        registry: &FileTypeRegistry,
        field_name: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let (field_name, filename) = check_names(field_name.into(), filename.into())?;
        let file_type = infer_type(registry, &filename)?;
        Ok(Self {
            field_name,
            filename,
            file_type,
            max_size: DEFAULT_MAX_SIZE,
        })
    }

    /// [`FileUploadConfig::for_filename`] with an explicit size limit.
    pub fn for_filename_with_max_size(
        registry: &FileTypeRegistry,
        field_name: impl Into<String>,
        filename: impl Into<String>,
        max_size: i64,
    ) -> Result<Self, ConfigError> {
        let (field_name, filename) = check_names(field_name.into(), filename.into())?;
        let max_size = check_max_size(max_size)?;
        let file_type = infer_type(registry, &filename)?;
        Ok(Self {
            field_name,
            filename,
            file_type,
            max_size,
        })
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn file_type(&self) -> &FileTypeDescriptor {
        &self.file_type
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Run the emptiness, size and content checks, in that order.
    pub fn validate(&self, data: &[u8]) -> Result<(), ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::EmptyData);
        }
        let size = data.len() as u64;
        if size > self.max_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max_size: self.max_size,
            });
        }
        self.file_type.validate(data)?;
        Ok(())
    }

    /// Validate `data` and hand it back as a payload ready for rendering.
    pub fn accept(&self, data: impl Into<Vec<u8>>) -> Result<FilePayload, ValidationError> {
        let bytes = data.into();
        self.validate(&bytes)?;
        tracing::debug!(
            field = %self.field_name,
            filename = %self.filename,
            content_type = %self.file_type.content_type(),
            size = bytes.len(),
            "accepted upload"
        );
        Ok(FilePayload {
            field_name: self.field_name.clone(),
            filename: self.filename.clone(),
            content_type: self.file_type.content_type().to_string(),
            bytes,
        })
    }
}

/// A file that passed validation, in the shape the envelope renderer takes.
///
/// Only [`FileUploadConfig::accept`] builds one, and its contents cannot be
/// changed afterwards:
///
/// ```compile_fail
/// let payload = formpart::FilePayload {
///     field_name: "avatar".into(),
///     filename: "../../etc/passwd".into(),
///     content_type: "image/png".into(),
///     bytes: b"MZ".to_vec(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    field_name: String,
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl FilePayload {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Byte part with `Content-Disposition` (name and filename) and
    /// `Content-Type` headers.
    pub fn into_part(self, formatter: &dyn DispositionFormatter) -> Part {
        Part {
            headers: vec![
                (
                    CONTENT_DISPOSITION.to_owned(),
                    formatter.form_data(&self.field_name, Some(&self.filename)),
                ),
                (CONTENT_TYPE.to_owned(), self.content_type),
            ],
            body: PartBody::Bytes(self.bytes),
        }
    }
}

fn infer_type(registry: &FileTypeRegistry, filename: &str) -> Result<FileTypeDescriptor, ConfigError> {
    registry.for_filename(filename).cloned().ok_or_else(|| {
        let ext = filename.rsplit_once('.').map_or("", |(_, ext)| ext);
        ConfigError::UnknownExtension(ext.to_owned())
    })
}

fn check_names(field_name: String, filename: String) -> Result<(String, String), ConfigError> {
    if field_name.is_empty() {
        return Err(ConfigError::EmptyFieldName);
    }
    if filename.is_empty() {
        return Err(ConfigError::EmptyFilename);
    }
    if filename.contains(PATH_SEPARATORS) {
        return Err(ConfigError::InvalidFilename(filename));
    }
    Ok((field_name, filename))
}

fn check_max_size(max_size: i64) -> Result<u64, ConfigError> {
    if max_size <= 0 {
        return Err(ConfigError::InvalidMaxSize(max_size));
    }
    let size = max_size as u64;
    if size > MAX_UPLOAD_SIZE {
        return Err(ConfigError::MaxSizeExceedsLimit(max_size));
    }
    Ok(size)
}
