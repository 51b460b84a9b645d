//! Seams to the collaborators that turn fields and files into wire bytes.
//!
//! This crate does not frame bodies.  It produces [`Part`]s and hands them,
//! with a [`Boundary`], to an [`EnvelopeRenderer`].  Boundary generation
//! and `Content-Disposition` escaping are likewise behind traits.

use std::fmt;

use uuid::Uuid;

use crate::constants::MULTIPART_FORM_DATA;
use crate::encode::{encode_fields, ArrayEncoding, Field};
use crate::errors::EncodingError;
use crate::value::StructuredValue;

pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Source of boundary tokens.  Tokens must be ASCII with no whitespace.
pub trait BoundaryGenerator {
    fn generate(&self) -> String;
}

/// `formpart-` followed by a random v4 UUID in simple form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidBoundary;

impl BoundaryGenerator for UuidBoundary {
    fn generate(&self) -> String {
        format!("formpart-{}", Uuid::new_v4().simple())
    }
}

/// A boundary token, fixed for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Ask `generator` for a token, exactly once.
    pub fn generate(generator: &dyn BoundaryGenerator) -> Self {
        Boundary(generator.generate())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds `Content-Disposition` header values.  Implementors own the
/// RFC 2183 / RFC 2231 escaping of `name` and `filename`.
pub trait DispositionFormatter {
    fn form_data(&self, name: &str, filename: Option<&str>) -> String;
}

/// Body of one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    Bytes(Vec<u8>),
}

/// One body part: ordered headers plus content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub headers: Vec<(String, String)>,
    pub body: PartBody,
}

impl Part {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl Field {
    pub fn into_part(self, formatter: &dyn DispositionFormatter) -> Part {
        Part {
            headers: vec![(
                CONTENT_DISPOSITION.to_owned(),
                formatter.form_data(&self.name, None),
            )],
            body: PartBody::Text(self.value),
        }
    }
}

/// Renders a boundary and parts into a framed body.
pub trait EnvelopeRenderer {
    type Output;
    type Error;

    fn render(&self, boundary: &Boundary, parts: &[Part]) -> Result<Self::Output, Self::Error>;
}

/// One outgoing form: a boundary chosen at construction plus the array
/// policy used for every record encoded through it.
#[derive(Debug, Clone)]
pub struct FormSession {
    boundary: Boundary,
    strategy: ArrayEncoding,
}

impl FormSession {
    pub fn new(generator: &dyn BoundaryGenerator, strategy: ArrayEncoding) -> Self {
        let boundary = Boundary::generate(generator);
        tracing::debug!(boundary = %boundary, ?strategy, "form session created");
        Self { boundary, strategy }
    }

    /// Session with a random UUID boundary.
    pub fn with_strategy(strategy: ArrayEncoding) -> Self {
        Self::new(&UuidBoundary, strategy)
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn strategy(&self) -> ArrayEncoding {
        self.strategy
    }

    /// `multipart/form-data; boundary=<token>`
    pub fn content_type(&self) -> String {
        format!("{MULTIPART_FORM_DATA}; boundary={}", self.boundary)
    }

    pub fn fields(&self, value: &StructuredValue) -> Result<Vec<Field>, EncodingError> {
        encode_fields(value, self.strategy)
    }

    /// Encode `value` and wrap each field as a text part.
    pub fn field_parts(
        &self,
        value: &StructuredValue,
        formatter: &dyn DispositionFormatter,
    ) -> Result<Vec<Part>, EncodingError> {
        Ok(self
            .fields(value)?
            .into_iter()
            .map(|field| field.into_part(formatter))
            .collect())
    }

    pub fn render<R: EnvelopeRenderer>(&self, parts: &[Part], renderer: &R) -> Result<R::Output, R::Error> {
        renderer.render(&self.boundary, parts)
    }
}
