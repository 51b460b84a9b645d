//! # formpart
//!
//! Flatten structured values into ordered multipart form fields, and guard
//! file uploads by checking their leading-byte signatures.
//!
//! ```no_run
//! use formpart::{encode, filetype, ArrayEncoding, FileUploadConfig};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Profile {
//!     name: String,
//!     tags: Vec<String>,
//!     nickname: Option<String>,
//! }
//!
//! let profile = Profile {
//!     name: "Jane".into(),
//!     tags: vec!["admin".into(), "ops".into()],
//!     nickname: None,
//! };
//! let fields = encode(&profile, ArrayEncoding::BracketSuffix).unwrap();
//! // name=Jane, tags[]=admin, tags[]=ops
//!
//! let config = FileUploadConfig::new("avatar", "me.png", filetype::PNG).unwrap();
//! config.validate(b"\x89PNG\r\n\x1a\n....").unwrap();
//! ```
//!
//! Nothing here frames the wire body.  [`envelope`] defines the traits a
//! renderer, boundary generator and header formatter implement.

pub mod constants;
pub mod encode;
pub mod envelope;
pub mod errors;
pub mod filetype;
pub mod serializer;
pub mod signature;
pub mod upload;
pub mod value;

pub use encode::{encode, encode_fields, ArrayEncoding, Field};
pub use envelope::{
    Boundary, BoundaryGenerator, DispositionFormatter, EnvelopeRenderer, FormSession, Part,
    PartBody, UuidBoundary,
};
pub use errors::{ConfigError, ContentError, EncodingError, ValidationError};
pub use filetype::{ContentType, FileTypeDescriptor, FileTypeRegistry, Validator};
pub use serializer::to_structured;
pub use upload::{FilePayload, FileUploadConfig};
pub use value::StructuredValue;

