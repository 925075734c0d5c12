#![forbid(unsafe_code)]
//! Document parser (C4): dispatches `(bytes, contentType, filename)` to a
//! format-specific extractor and never touches the network or the model
//! gateway (spec §4.4).

mod dispatch;
mod docx;
mod error;
mod pdf;
mod text;
mod types;

pub use dispatch::parse_document;
pub use error::{ParseError, ParseResult};
pub use types::{ParsedDocument, ParsedPage};

pub const TRACING_TARGET: &str = "kbrag_parser";
