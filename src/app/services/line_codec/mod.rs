//! Line codec for delimited record files
//!
//! Every record is stored as one line: fields joined by the primary separator,
//! list and sub-record fields joined internally by the secondary separator, and
//! null scalars written as the null token. Decoding is fixed-arity per record
//! type and never panics on malformed input.

use crate::app::models::{RecordId, RecordKind, WeatherScore};
use crate::constants::{DEFAULT_FIELD_SEPARATOR, DEFAULT_NULL_TOKEN, DEFAULT_SUB_SEPARATOR};
use crate::{Error, Result};

pub mod records;

#[cfg(test)]
pub mod tests;

/// Separators and null token shared by encoder and decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separators {
    pub field: char,
    pub sub: char,
    pub null_token: String,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD_SEPARATOR,
            sub: DEFAULT_SUB_SEPARATOR,
            null_token: DEFAULT_NULL_TOKEN.to_string(),
        }
    }
}

/// Mapping between a record and its one-line text form
///
/// Implementations must satisfy `decode(encode(x)) == x` for every record
/// `encode` accepts.
pub trait LineCodec: Sized {
    /// Collection the record belongs to
    const KIND: RecordKind;

    /// Header labels written when the backing file is created
    const HEADERS: &'static [&'static str];

    /// Encode the record as a single line without terminator
    fn encode(&self, separators: &Separators) -> Result<String>;

    /// Decode one line into a record
    fn decode(line: &str, separators: &Separators) -> Result<Self>;
}

/// Read the ID in the first column of a line, if it parses
pub fn leading_id(line: &str, separators: &Separators) -> Option<RecordId> {
    line.split(separators.field)
        .next()
        .and_then(|field| field.trim().parse().ok())
}

// =============================================================================
// Encoding
// =============================================================================

/// Accumulates encoded fields for one line
pub(crate) struct FieldWriter<'a> {
    separators: &'a Separators,
    fields: Vec<String>,
}

impl<'a> FieldWriter<'a> {
    pub(crate) fn new(separators: &'a Separators) -> Self {
        Self {
            separators,
            fields: Vec::new(),
        }
    }

    pub(crate) fn id(&mut self, value: RecordId) -> &mut Self {
        self.fields.push(value.to_string());
        self
    }

    pub(crate) fn optional_id(&mut self, value: Option<RecordId>) -> &mut Self {
        let encoded = match value {
            Some(id) => id.to_string(),
            None => self.separators.null_token.clone(),
        };
        self.fields.push(encoded);
        self
    }

    pub(crate) fn ids(&mut self, values: &[RecordId]) -> &mut Self {
        let joined = values
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(&self.separators.sub.to_string());
        self.fields.push(joined);
        self
    }

    pub(crate) fn coordinate(&mut self, value: f64) -> &mut Self {
        // Display prints the shortest text that parses back to the same f64
        self.fields.push(value.to_string());
        self
    }

    pub(crate) fn text(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.check_text(name, value, false)?;
        self.fields.push(value.to_string());
        Ok(self)
    }

    pub(crate) fn optional_text(&mut self, name: &str, value: Option<&str>) -> Result<&mut Self> {
        let encoded = match value {
            Some(text) => {
                self.check_text(name, text, false)?;
                self.check_not_null_token(name, text)?;
                text.to_string()
            }
            None => self.separators.null_token.clone(),
        };
        self.fields.push(encoded);
        Ok(self)
    }

    /// Score and comment joined by the secondary separator; a null score is empty
    pub(crate) fn score(&mut self, name: &str, value: &WeatherScore) -> Result<&mut Self> {
        let score = value.score().map(|s| s.to_string()).unwrap_or_default();
        let comment = match value.comment() {
            Some(text) => {
                self.check_text(name, text, true)?;
                self.check_not_null_token(name, text)?;
                text.to_string()
            }
            None => self.separators.null_token.clone(),
        };
        self.fields
            .push(format!("{}{}{}", score, self.separators.sub, comment));
        Ok(self)
    }

    pub(crate) fn finish(&mut self) -> String {
        self.fields.join(&self.separators.field.to_string())
    }

    fn check_text(&self, name: &str, value: &str, in_sub_field: bool) -> Result<()> {
        if value.contains(['\n', '\r']) {
            return Err(Error::unencodable_value(name, "contains a line break"));
        }
        if value.contains(self.separators.field) {
            return Err(Error::unencodable_value(
                name,
                format!("contains the field separator '{}'", self.separators.field),
            ));
        }
        if in_sub_field && value.contains(self.separators.sub) {
            return Err(Error::unencodable_value(
                name,
                format!("contains the sub-field separator '{}'", self.separators.sub),
            ));
        }
        Ok(())
    }

    fn check_not_null_token(&self, name: &str, value: &str) -> Result<()> {
        if value == self.separators.null_token {
            return Err(Error::unencodable_value(
                name,
                format!("equals the null token '{}'", self.separators.null_token),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Sequential reader over the fields of one line
pub(crate) struct FieldReader<'a> {
    kind: RecordKind,
    separators: &'a Separators,
    fields: Vec<&'a str>,
    position: usize,
}

impl<'a> FieldReader<'a> {
    /// Split a line and check its arity against the accepted field counts
    pub(crate) fn new(
        kind: RecordKind,
        line: &'a str,
        separators: &'a Separators,
        accepted_counts: &[usize],
    ) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(separators.field).collect();

        if !accepted_counts.contains(&fields.len()) {
            return Err(Error::decode(
                kind,
                format!(
                    "expected {} fields, found {}",
                    accepted_counts
                        .iter()
                        .map(|n| n.to_string())
                        .collect::<Vec<_>>()
                        .join(" or "),
                    fields.len()
                ),
            ));
        }

        Ok(Self {
            kind,
            separators,
            fields,
            position: 0,
        })
    }

    pub(crate) fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn next_raw(&mut self, name: &str) -> Result<&'a str> {
        let value = self
            .fields
            .get(self.position)
            .copied()
            .ok_or_else(|| Error::decode(self.kind, format!("missing field '{}'", name)))?;
        self.position += 1;
        Ok(value)
    }

    /// Text fields keep their whitespace, so only an exact token is null
    fn is_null(&self, value: &str) -> bool {
        value == self.separators.null_token
    }

    pub(crate) fn id(&mut self, name: &str) -> Result<RecordId> {
        let raw = self.next_raw(name)?;
        parse_id(self.kind, name, raw)
    }

    pub(crate) fn optional_id(&mut self, name: &str) -> Result<Option<RecordId>> {
        let raw = self.next_raw(name)?;
        if self.is_null(raw.trim()) || raw.trim().is_empty() {
            return Ok(None);
        }
        parse_id(self.kind, name, raw).map(Some)
    }

    pub(crate) fn ids(&mut self, name: &str) -> Result<Vec<RecordId>> {
        let raw = self.next_raw(name)?;
        raw.split(self.separators.sub)
            .map(|part| parse_id(self.kind, name, part))
            .collect()
    }

    /// Coordinates written with a decimal comma are accepted
    pub(crate) fn coordinate(&mut self, name: &str) -> Result<f64> {
        let raw = self.next_raw(name)?;
        raw.trim().replace(',', ".").parse().map_err(|_| {
            Error::decode(self.kind, format!("invalid {} '{}'", name, raw))
        })
    }

    pub(crate) fn text(&mut self, name: &str) -> Result<String> {
        self.next_raw(name).map(str::to_string)
    }

    pub(crate) fn optional_text(&mut self, name: &str) -> Result<Option<String>> {
        let raw = self.next_raw(name)?;
        if self.is_null(raw) {
            Ok(None)
        } else {
            Ok(Some(raw.to_string()))
        }
    }

    pub(crate) fn score(&mut self, name: &str) -> Result<WeatherScore> {
        let raw = self.next_raw(name)?;
        let parts: Vec<&str> = raw.split(self.separators.sub).collect();
        let [score, comment] = parts.as_slice() else {
            return Err(Error::decode(
                self.kind,
                format!(
                    "{} must be 'score{}comment', found '{}'",
                    name, self.separators.sub, raw
                ),
            ));
        };

        let score = if score.trim().is_empty() || self.is_null(score.trim()) {
            None
        } else {
            Some(score.trim().parse::<u8>().map_err(|_| {
                Error::decode(self.kind, format!("invalid {} score '{}'", name, score))
            })?)
        };
        let comment = if self.is_null(comment) {
            None
        } else {
            Some(comment.to_string())
        };

        WeatherScore::new(score, comment)
            .map_err(|e| Error::decode(self.kind, format!("{}: {}", name, e)))
    }

    /// Wrap a model validation failure as a decode error for this record kind
    pub(crate) fn invalid(&self, error: Error) -> Error {
        Error::decode(self.kind, error.to_string())
    }
}

fn parse_id(kind: RecordKind, name: &str, raw: &str) -> Result<RecordId> {
    raw.trim()
        .parse()
        .map_err(|_| Error::decode(kind, format!("invalid {} '{}'", name, raw)))
}
