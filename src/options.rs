//! Parser configuration and default/override merging

use crate::error::OptionsError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Default patterns
static LINE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n").unwrap());

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*?): +(.*)$").unwrap());

static CONTINUATION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\s.+)$").unwrap());

/// How header names are written into the resulting message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// Keep header names exactly as they appear
    #[default]
    Verbatim,

    /// Lower-case names and collapse non-word runs to `_`
    /// (`Content-Type` becomes `content_type`)
    Underscore,
}

/// Options controlling a single parse
///
/// A parse only reads its options, so one value can be shared between any
/// number of parses.
#[derive(Debug, Clone)]
pub struct Options {
    /// Header name normalization
    pub key_style: KeyStyle,

    /// Try to turn non-numeric values into timestamps
    pub convert_dates: bool,

    /// Try to turn values into numbers
    pub convert_numbers: bool,

    /// Splits the raw message into lines
    pub line_break_pattern: Regex,

    /// Separator used when joining body lines
    pub join_newline: String,

    /// Collapse the body lines into a single string
    pub join_body: bool,

    /// Field name the body is stored under
    pub body_field_name: String,

    /// Recognizes `key: value`, capturing the key then the value
    pub header_pattern: Regex,

    /// Recognizes a continuation line, capturing its text
    pub continuation_pattern: Regex,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            key_style: KeyStyle::Verbatim,
            convert_dates: false,
            convert_numbers: false,
            line_break_pattern: LINE_BREAK_REGEX.clone(),
            join_newline: "\n".to_string(),
            join_body: true,
            body_field_name: "body".to_string(),
            header_pattern: HEADER_REGEX.clone(),
            continuation_pattern: CONTINUATION_REGEX.clone(),
        }
    }
}

impl Options {
    #[must_use]
    pub fn with_key_style(mut self, key_style: KeyStyle) -> Self {
        self.key_style = key_style;
        self
    }

    #[must_use]
    pub fn with_dates(mut self, enabled: bool) -> Self {
        self.convert_dates = enabled;
        self
    }

    #[must_use]
    pub fn with_numbers(mut self, enabled: bool) -> Self {
        self.convert_numbers = enabled;
        self
    }

    #[must_use]
    pub fn with_join(mut self, enabled: bool) -> Self {
        self.join_body = enabled;
        self
    }

    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.join_newline = newline.into();
        self
    }

    #[must_use]
    pub fn with_body_field(mut self, name: impl Into<String>) -> Self {
        self.body_field_name = name.into();
        self
    }

    #[must_use]
    pub fn with_line_breaks(mut self, pattern: Regex) -> Self {
        self.line_break_pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_header_pattern(mut self, pattern: Regex) -> Self {
        self.header_pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_continuation_pattern(mut self, pattern: Regex) -> Self {
        self.continuation_pattern = pattern;
        self
    }

    /// Apply caller overrides on top of these options.
    ///
    /// Fields present in `overrides` win, everything else is kept.
    pub fn merged(&self, overrides: &OptionsOverrides) -> Result<Self, OptionsError> {
        let mut options = self.clone();

        if let Some(keys) = overrides.keys {
            options.key_style = keys;
        }
        if let Some(dates) = overrides.dates {
            options.convert_dates = dates;
        }
        if let Some(numbers) = overrides.numbers {
            options.convert_numbers = numbers;
        }
        if let Some(join) = overrides.join {
            options.join_body = join;
        }
        if let Some(newline) = &overrides.newline {
            options.join_newline.clone_from(newline);
        }
        if let Some(body_key) = &overrides.body_key {
            options.body_field_name.clone_from(body_key);
        }
        if let Some(breaks) = &overrides.breaks {
            options.line_break_pattern = compile("breaks", breaks)?;
        }
        if let Some(header) = &overrides.header {
            options.header_pattern = compile("header", header)?;
        }
        if let Some(continued) = &overrides.continued_header {
            options.continuation_pattern = compile("continued_header", continued)?;
        }

        Ok(options)
    }
}

fn compile(field: &'static str, source: &str) -> Result<Regex, OptionsError> {
    Regex::new(source).map_err(|source| OptionsError::Pattern { field, source })
}

/// Caller-supplied partial options
///
/// Every field is optional; omitted fields fall back to the defaults when
/// resolved. Patterns are given as regex source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsOverrides {
    pub keys: Option<KeyStyle>,
    pub dates: Option<bool>,
    pub numbers: Option<bool>,
    pub breaks: Option<String>,
    pub newline: Option<String>,
    pub join: Option<bool>,
    pub body_key: Option<String>,
    pub header: Option<String>,
    pub continued_header: Option<String>,
}

impl OptionsOverrides {
    /// Read overrides from a JSON object such as `{"keys": "underscore"}`
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merge these overrides over [`Options::default`]
    pub fn resolve(&self) -> Result<Options, OptionsError> {
        Options::default().merged(self)
    }
}
