use std::fmt;

use thiserror::Error;

/// A single EMV QR data object.
///
/// Wire format:
/// ```text
/// [tag: 2 digits] [length: 2 digits, zero padded] [value: `length` characters]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub tag: String,
    pub value: String,
}

impl TlvField {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Declared length: the number of Unicode scalar values (`char`s) in the
    /// value, which equals the byte count for the ASCII values this crate emits.
    pub fn length(&self) -> usize {
        self.value.chars().count()
    }

    /// Serialize as tag‖length‖value.
    pub fn encode(&self) -> String {
        format!("{}{:02}{}", self.tag, self.length(), self.value)
    }
}

impl fmt::Display for TlvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:02}]={}", self.tag, self.length(), self.value)
    }
}

/// Ordered TLV builder. Lengths are always derived from the values.
#[derive(Debug, Clone, Default)]
pub struct TlvBuilder {
    fields: Vec<TlvField>,
}

impl TlvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn field(mut self, tag: &str, value: impl Into<String>) -> Self {
        self.fields.push(TlvField::new(tag, value));
        self
    }

    /// Append a field only when a value is present.
    pub fn field_opt(self, tag: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.field(tag, v),
            None => self,
        }
    }

    /// Append a field whose value is the encoding of an inner builder.
    pub fn nested(self, tag: &str, inner: TlvBuilder) -> Self {
        let value = inner.build();
        self.field(tag, value)
    }

    /// Concatenate all fields in insertion order, with no delimiters.
    pub fn build(&self) -> String {
        self.fields.iter().map(TlvField::encode).collect()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TlvError {
    #[error("truncated field header at offset {offset}")]
    TruncatedHeader { offset: usize },
    #[error("invalid length {length:?} for tag {tag} at offset {offset}")]
    InvalidLength {
        tag: String,
        length: String,
        offset: usize,
    },
    #[error("value of tag {tag} overruns input: needs {needed} characters, {available} left")]
    ValueOverrun {
        tag: String,
        needed: usize,
        available: usize,
    },
}

/// Parse a flat sequence of TLV fields.
pub fn parse_fields(data: &str) -> Result<Vec<TlvField>, TlvError> {
    let chars: Vec<char> = data.chars().collect();
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if pos + 4 > chars.len() {
            return Err(TlvError::TruncatedHeader { offset: pos });
        }
        let tag: String = chars[pos..pos + 2].iter().collect();
        let length: String = chars[pos + 2..pos + 4].iter().collect();
        let len = length
            .parse::<usize>()
            .ok()
            .filter(|_| length.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| TlvError::InvalidLength {
                tag: tag.clone(),
                length: length.clone(),
                offset: pos,
            })?;

        let start = pos + 4;
        let available = chars.len() - start;
        if len > available {
            return Err(TlvError::ValueOverrun {
                tag,
                needed: len,
                available,
            });
        }
        let value: String = chars[start..start + len].iter().collect();
        fields.push(TlvField { tag, value });
        pos = start + len;
    }

    Ok(fields)
}
