//! Cursor-based text tokenizer.
//!
//! [`TextParser`] loads a whole file into memory and walks it with a single
//! forward cursor: [`TextParser::seek`] jumps past the next occurrence of a
//! tag, and [`TextParser::get_int`] / [`TextParser::get_float`] read the
//! whitespace-delimited token that follows.
//!
//! Tags only match whole tokens, so seeking `*MESH_VERTEX` skips over
//! `*MESH_VERTEX_LIST` and seeking `B:` skips over `AB:`.

use std::path::Path;

use crate::error::{MeshError, Result};

pub struct TextParser {
    source: String,
    cursor: usize,
}

impl TextParser {
    /// Reads the whole file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(source))
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            cursor: 0,
        }
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Bytes between the cursor and the end of the input.
    pub fn remaining(&self) -> usize {
        self.source.len() - self.cursor
    }

    /// Returns `true` once only whitespace is left.
    pub fn is_at_end(&self) -> bool {
        self.source.as_bytes()[self.cursor..]
            .iter()
            .all(u8::is_ascii_whitespace)
    }

    /// Moves the cursor just past the next whole-token occurrence of `tag`.
    /// On failure the cursor does not move.
    pub fn seek(&mut self, tag: &str) -> Result<()> {
        let bytes = self.source.as_bytes();
        let mut from = self.cursor;

        while let Some(found) = self.source[from..].find(tag) {
            let start = from + found;
            let end = start + tag.len();
            let starts_token = start == 0 || bytes[start - 1].is_ascii_whitespace();
            let ends_token = end == bytes.len() || bytes[end].is_ascii_whitespace();
            if starts_token && ends_token {
                self.cursor = end;
                return Ok(());
            }
            // Tags are ASCII, so the next char boundary is one byte on.
            from = start + 1;
        }

        Err(MeshError::TagNotFound {
            tag: tag.to_string(),
            offset: self.cursor,
        })
    }

    /// Returns the next whitespace-delimited token and its byte offset.
    pub fn next_token(&mut self) -> Result<(&str, usize)> {
        let bytes = self.source.as_bytes();
        let mut start = self.cursor;
        while start < bytes.len() && bytes[start].is_ascii_whitespace() {
            start += 1;
        }
        if start == bytes.len() {
            self.cursor = start;
            return Err(MeshError::UnexpectedEof { offset: start });
        }

        let mut end = start;
        while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
            end += 1;
        }
        self.cursor = end;
        Ok((&self.source[start..end], start))
    }

    /// Reads the next token as an integer. A single trailing `:` is allowed,
    /// as in ASE face headers (`*MESH_FACE 0:`).
    pub fn get_int(&mut self) -> Result<i64> {
        let (token, offset) = self.next_token()?;
        let digits = token.strip_suffix(':').unwrap_or(token);
        digits.parse::<i64>().map_err(|_| MeshError::InvalidToken {
            expected: "integer",
            token: token.to_string(),
            offset,
        })
    }

    /// Reads the next token as a float.
    pub fn get_float(&mut self) -> Result<f32> {
        let (token, offset) = self.next_token()?;
        token.parse::<f32>().map_err(|_| MeshError::InvalidToken {
            expected: "float",
            token: token.to_string(),
            offset,
        })
    }
}
