//! Compact JSON writer.
//!
//! Writes straight into any `fmt::Write` sink. Nothing is buffered here; if a
//! value fails mid-document the sink holds a valid prefix and no more.
//! Callers guarantee the structure is acyclic (owned `Value`s always are).

use super::value::{Number, Object, Value};
use crate::domain::errors::EncodingError;
use std::borrow::Borrow;
use std::fmt::{self, Write};
use std::io;

/// Write `object` as a JSON object
pub fn write_object<W: Write>(sink: &mut W, object: &Object) -> Result<(), EncodingError> {
    write_entries(sink, object.iter())
}

/// Write any key/value sequence as a JSON object.
///
/// Keys are stringified with `Display` before escaping, so a map keyed by
/// integers or ids encodes without conversion. Entries are written in the
/// iterator's order.
pub fn write_entries<W, K, V, I>(sink: &mut W, entries: I) -> Result<(), EncodingError>
where
    W: Write,
    K: fmt::Display,
    V: Borrow<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    sink.write_char('{')?;
    let mut first = true;
    for (key, value) in entries {
        if !first {
            sink.write_char(',')?;
        }
        write_string(sink, &key.to_string())?;
        sink.write_char(':')?;
        write_value(sink, value.borrow())?;
        first = false;
    }
    sink.write_char('}')?;
    Ok(())
}

/// Write a finite sequence as a JSON array
pub fn write_array<W, V, I>(sink: &mut W, items: I) -> Result<(), EncodingError>
where
    W: Write,
    V: Borrow<Value>,
    I: IntoIterator<Item = V>,
{
    sink.write_char('[')?;
    let mut first = true;
    for item in items {
        if !first {
            sink.write_char(',')?;
        }
        write_value(sink, item.borrow())?;
        first = false;
    }
    sink.write_char(']')?;
    Ok(())
}

pub fn write_value<W: Write>(sink: &mut W, value: &Value) -> Result<(), EncodingError> {
    match value {
        Value::Null => sink.write_str("null")?,
        Value::Object(object) => write_object(sink, object)?,
        Value::Array(items) => write_array(sink, items)?,
        Value::Number(number) => write_number(sink, *number)?,
        Value::Bool(b) => sink.write_str(if *b { "true" } else { "false" })?,
        Value::String(s) => write_string(sink, s)?,
        Value::Opaque(description) => {
            return Err(EncodingError::UnsupportedValue {
                description: description.clone(),
            });
        }
    }
    Ok(())
}

/// Rejects NaN and the infinities; JSON has no spelling for them
pub fn write_number<W: Write>(sink: &mut W, number: Number) -> Result<(), EncodingError> {
    if !number.is_finite() {
        return Err(EncodingError::NonFiniteNumber {
            value: number.as_f64(),
        });
    }
    write!(sink, "{}", number)?;
    Ok(())
}

/// Write `s` as a quoted, escaped JSON string.
///
/// Besides the mandatory escapes, `/` is escaped when it directly follows `<`
/// so the output can sit inside an HTML `<script>` block, and C1 controls plus
/// U+2000..U+20FF (which includes the line and paragraph separators) are
/// always written as `\uXXXX`.
pub fn write_string<W: Write>(sink: &mut W, s: &str) -> Result<(), EncodingError> {
    sink.write_char('"')?;
    let mut previous = '\0';
    for c in s.chars() {
        match c {
            '\\' | '"' => {
                sink.write_char('\\')?;
                sink.write_char(c)?;
            }
            '/' => {
                if previous == '<' {
                    sink.write_char('\\')?;
                }
                sink.write_char(c)?;
            }
            '\u{8}' => sink.write_str("\\b")?,
            '\t' => sink.write_str("\\t")?,
            '\n' => sink.write_str("\\n")?,
            '\u{c}' => sink.write_str("\\f")?,
            '\r' => sink.write_str("\\r")?,
            c if needs_unicode_escape(c) => write!(sink, "\\u{:04x}", c as u32)?,
            c => sink.write_char(c)?,
        }
        previous = c;
    }
    sink.write_char('"')?;
    Ok(())
}

fn needs_unicode_escape(c: char) -> bool {
    c < ' ' || ('\u{80}'..'\u{a0}').contains(&c) || ('\u{2000}'..'\u{2100}').contains(&c)
}

/// Encode `object` into a new string
pub fn to_string(object: &Object) -> Result<String, EncodingError> {
    let mut out = String::new();
    write_object(&mut out, object)?;
    Ok(out)
}

/// Encode `object` as UTF-8 bytes
pub fn to_vec(object: &Object) -> Result<Vec<u8>, EncodingError> {
    to_string(object).map(String::into_bytes)
}

/// Encode `object` as UTF-8 into a byte writer
pub fn write_object_io<W: io::Write>(writer: W, object: &Object) -> Result<(), EncodingError> {
    let mut sink = IoSink::new(writer);
    match write_object(&mut sink, object) {
        Err(EncodingError::Sink(_)) => match sink.take_error() {
            Some(e) => Err(EncodingError::Io(e)),
            None => Err(EncodingError::Sink(fmt::Error)),
        },
        other => other,
    }
}

/// Adapts an `io::Write` into a character sink, keeping the first I/O error
pub struct IoSink<W: io::Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Write for IoSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}
