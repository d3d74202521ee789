//! JSON writers for the pretty and compact output forms.
//!
//! serde_json writes non-ASCII characters verbatim. [`AsciiFormatter`] wraps
//! another formatter and escapes everything outside printable ASCII as
//! `\uXXXX`, using surrogate pairs above the Basic Multilingual Plane.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

const INDENT: &[u8] = b"    ";

/// Layout of a serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Four-space indentation, `": "` between keys and values.
    Pretty,
    /// No insignificant whitespace.
    Compact,
}

/// Formatter adapter that escapes non-ASCII characters.
pub struct AsciiFormatter<F> {
    inner: F,
}

impl<F> AsciiFormatter<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: Formatter> Formatter for AsciiFormatter<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// Serializes `value` into a byte buffer.
///
/// With `ascii` set, every character outside printable ASCII is escaped.
pub fn to_vec<T>(value: &T, layout: Layout, ascii: bool) -> serde_json::Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut out = Vec::with_capacity(256);
    match (layout, ascii) {
        (Layout::Pretty, true) => serialize(
            value,
            &mut out,
            AsciiFormatter::new(PrettyFormatter::with_indent(INDENT)),
        )?,
        (Layout::Pretty, false) => {
            serialize(value, &mut out, PrettyFormatter::with_indent(INDENT))?
        }
        (Layout::Compact, true) => {
            serialize(value, &mut out, AsciiFormatter::new(CompactFormatter))?
        }
        (Layout::Compact, false) => serialize(value, &mut out, CompactFormatter)?,
    }
    Ok(out)
}

fn serialize<T, F>(value: &T, out: &mut Vec<u8>, formatter: F) -> serde_json::Result<()>
where
    T: ?Sized + Serialize,
    F: Formatter,
{
    let mut serializer = serde_json::Serializer::with_formatter(out, formatter);
    value.serialize(&mut serializer)
}
