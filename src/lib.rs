// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! RFC822-style Envelope Parser
//!
//! Turns a `Key: Value` header block, an optional blank line and a free-form
//! body into an ordered map of fields.
//!
//! # Features
//!
//! - Single-line header folding (continuations start with whitespace)
//! - Optional `Content-Type` to `content_type` key normalization
//! - Optional number and date coercion of header values
//! - Body kept as lines or joined into one string
//! - Partial options from JSON, merged over the defaults
//!
//! # Example
//!
//! ```rust
//! use envelope822::{Options, KeyStyle, parse_with};
//!
//! let raw = "Content-Type: text/plain\r\nContent-Length: 4\r\n\r\nBody";
//! let options = Options::default()
//!     .with_key_style(KeyStyle::Underscore)
//!     .with_numbers(true);
//! let message = parse_with(raw, &options).unwrap();
//!
//! assert_eq!(message.get_str("content_type"), Some("text/plain"));
//! assert_eq!(message.get_number("content_length"), Some(4.0));
//! assert_eq!(message.get_str("body"), Some("Body"));
//! ```

mod error;
mod options;
mod parser;
mod types;

pub use error::{OptionsError, ParseError, ParseFailure, Result};
pub use options::{KeyStyle, Options, OptionsOverrides};
pub use parser::{parse, parse_with, parse_with_overrides};
pub use types::{Message, Value};
