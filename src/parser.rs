//! Main envelope parser implementation

use crate::error::{ParseError, ParseFailure, Result};
use crate::options::{KeyStyle, Options, OptionsOverrides};
use crate::types::{Message, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

// Values that are never tried as dates
static NUMERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-?\d+\.?\d*\s*$").unwrap());

static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

// ASCII word characters only, so `Über-Key` becomes `_ber_key`
static NON_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Parse an envelope with the default options
pub fn parse(message: &str) -> Result<Message> {
    parse_with(message, &Options::default())
}

/// Parse an envelope with caller overrides merged over the defaults
pub fn parse_with_overrides(
    message: &str,
    overrides: &OptionsOverrides,
) -> std::result::Result<Message, ParseFailure> {
    let options = overrides.resolve()?;
    Ok(parse_with(message, &options)?)
}

/// Parse an envelope into its header fields and body.
///
/// Lines before the first empty line must be headers or continuations of
/// the header right above them. Everything after it is body, verbatim.
pub fn parse_with(message: &str, options: &Options) -> Result<Message> {
    let state = options
        .line_break_pattern
        .split(message)
        .try_fold(ParseState::new(options), |state, line| state.line(line))?;

    let message = state.finish();
    debug!(
        "Parsed envelope: {} fields, body {}",
        message.len(),
        if message.body().is_some() { "present" } else { "absent" }
    );
    Ok(message)
}

/// How a line in the header section reads
#[derive(Debug, PartialEq, Eq)]
enum HeaderLine<'a> {
    Blank,
    Header { key: &'a str, value: &'a str },
    Continuation(&'a str),
    Malformed,
}

fn classify<'a>(line: &'a str, options: &Options) -> HeaderLine<'a> {
    if line.is_empty() {
        return HeaderLine::Blank;
    }

    if let Some(caps) = options.header_pattern.captures(line)
        && let (Some(key), Some(value)) = (caps.get(1), caps.get(2))
    {
        return HeaderLine::Header {
            key: key.as_str(),
            value: value.as_str(),
        };
    }

    options
        .continuation_pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or(HeaderLine::Malformed, |text| {
            HeaderLine::Continuation(text.as_str())
        })
}

enum Section {
    /// Holds the key a continuation line may extend. Only the line right
    /// after an accepted header can continue it.
    Headers { last_key: Option<String> },
    Body(Vec<String>),
}

struct ParseState<'o> {
    options: &'o Options,
    message: Message,
    section: Section,
}

impl<'o> ParseState<'o> {
    fn new(options: &'o Options) -> Self {
        Self {
            options,
            message: Message::new(options.body_field_name.clone()),
            section: Section::Headers { last_key: None },
        }
    }

    fn line(mut self, line: &str) -> Result<Self> {
        let last_key = match &mut self.section {
            Section::Body(lines) => {
                lines.push(line.to_string());
                return Ok(self);
            }
            Section::Headers { last_key } => last_key.take(),
        };

        let kind = classify(line, self.options);
        trace!("Header section line {line:?}: {kind:?}");

        match kind {
            HeaderLine::Blank => {
                self.section = Section::Body(Vec::new());
            }
            HeaderLine::Header { key, value } => {
                let key = normalize_key(key, self.options.key_style);
                let value = coerce(value, self.options);
                if !key.is_empty() && value.is_truthy() {
                    self.message.insert(key.clone(), value);
                    self.section = Section::Headers {
                        last_key: Some(key),
                    };
                }
            }
            HeaderLine::Continuation(text) => {
                let Some(key) = last_key else {
                    warn!("Continuation without a preceding header: {line:?}");
                    return Err(ParseError::MalformedHeader(line.to_string()));
                };
                self.append(&key, coerce(text, self.options));
            }
            HeaderLine::Malformed => {
                warn!("Malformed header line: {line:?}");
                return Err(ParseError::MalformedHeader(line.to_string()));
            }
        }

        Ok(self)
    }

    // Folded text joins its header with no separator
    fn append(&mut self, key: &str, value: Value) {
        if !value.is_truthy() {
            return;
        }
        match self.message.get_mut(key) {
            Some(Value::Text(existing)) => existing.push_str(&value.to_string()),
            _ => self.message.insert(key, value),
        }
    }

    fn finish(self) -> Message {
        let Self {
            options,
            mut message,
            section,
        } = self;

        if let Section::Body(lines) = section {
            let body = if options.join_body {
                Value::Text(lines.join(&options.join_newline))
            } else {
                Value::Lines(lines)
            };
            message.insert(options.body_field_name.clone(), body);
        }

        message
    }
}

fn normalize_key(key: &str, style: KeyStyle) -> String {
    match style {
        KeyStyle::Verbatim => key.to_string(),
        KeyStyle::Underscore => NON_WORD_REGEX
            .replace_all(&key.to_lowercase(), "_")
            .into_owned(),
    }
}

fn coerce(raw: &str, options: &Options) -> Value {
    let mut value = Value::Text(raw.to_string());

    if options.convert_dates
        && !NUMERAL_REGEX.is_match(raw)
        && let Some(date) = parse_date(raw)
    {
        value = Value::Date(date);
    }

    // A value that is not numeric falls back to the raw text, even one
    // that already became a date
    if options.convert_numbers {
        value = parse_number(raw).map_or_else(|| Value::Text(raw.to_string()), Value::Number);
    }

    value
}

/// Accepts RFC 2822, RFC 3339, and these naive layouts read as UTC:
/// `2012-01-17 03:01:04`, `2012-01-17T03:01:04`, `2012/01/17 03:01:04`,
/// `2012-01-17`, `2012/01/17`, `Jan 17, 2012`, `January 17, 2012`,
/// `Jan 17 2012`.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc());
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y", "%b %d %Y"]
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Loose numeric literal: blank reads as zero, `Infinity` and `0x`/`0o`/`0b`
/// integers are accepted, anything else that is not a decimal is rejected.
fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();

    if s.is_empty() {
        return Some(0.0);
    }
    if DECIMAL_REGEX.is_match(s) {
        return s.parse().ok();
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let (radix, digits) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        Some("0o" | "0O") => (8, &s[2..]),
        Some("0b" | "0B") => (2, &s[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
    })
}
