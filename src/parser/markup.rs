//! Markup Reader
//!
//! A small reader for the XML subset used by VFS declarations. It handles:
//! - Elements, self-closing elements and quoted attributes
//! - Text with the predefined entities and numeric character references
//! - CDATA sections
//! - Comments, processing instructions and DOCTYPE declarations (skipped)

use super::types::{Content, Element, MarkupError};

/// Deepest element nesting accepted, counting the document element.
pub const MAX_NESTING_DEPTH: usize = 256;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Parse a whole document and return its single root element.
pub fn parse_markup(input: &str) -> Result<Element, MarkupError> {
    let mut reader = MarkupReader::new(input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input));
    reader.skip_misc()?;
    if reader.is_eof() {
        return Err(reader.error("document has no root element"));
    }
    if reader.peek() != Some('<') {
        return Err(reader.error("expected '<' to start the root element"));
    }
    let root = reader.parse_element(1)?;
    reader.skip_misc()?;
    if !reader.is_eof() {
        return Err(reader.error("unexpected content after the root element"));
    }
    Ok(root)
}

struct MarkupReader {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl MarkupReader {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut i = self.pos;
        for c in s.chars() {
            if self.chars.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn error(&self, message: impl Into<String>) -> MarkupError {
        MarkupError::new(message, self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn expect(&mut self, c: char) -> Result<(), MarkupError> {
        match self.peek() {
            Some(found) if found == c => {
                self.advance();
                Ok(())
            }
            Some(found) => Err(self.error(format!("expected '{}', found '{}'", c, found))),
            None => Err(self.error(format!("expected '{}', found end of input", c))),
        }
    }

    /// Consume everything up to and including `terminator`.
    fn consume_until(&mut self, terminator: &str, what: &str) -> Result<String, MarkupError> {
        let (line, column) = (self.line, self.column);
        let mut out = String::new();
        while !self.starts_with(terminator) {
            match self.advance() {
                Some(c) => out.push(c),
                None => return Err(MarkupError::new(format!("unterminated {}", what), line, column)),
            }
        }
        self.advance_by(terminator.chars().count());
        Ok(out)
    }

    /// Whitespace, comments, processing instructions and DOCTYPE outside
    /// the root element.
    fn skip_misc(&mut self) -> Result<(), MarkupError> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<!--") {
                self.advance_by(4);
                self.consume_until("-->", "comment")?;
            } else if self.starts_with("<?") {
                self.advance_by(2);
                self.consume_until("?>", "processing instruction")?;
            } else if self.starts_with("<!DOCTYPE") {
                self.advance_by(9);
                self.consume_until(">", "DOCTYPE declaration")?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_name(&mut self) -> Result<String, MarkupError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.error("expected a name"));
        }
        Ok(name)
    }

    /// Parse an element starting at its `<`. `depth` is 1 for the
    /// document element.
    fn parse_element(&mut self, depth: usize) -> Result<Element, MarkupError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "elements nested deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        let line = self.line;
        self.expect('<')?;
        let mut element = Element::new(self.parse_name()?, line);

        loop {
            self.skip_whitespace();
            if self.starts_with("/>") {
                self.advance_by(2);
                return Ok(element);
            }
            if self.peek() == Some('>') {
                self.advance();
                break;
            }
            if self.is_eof() {
                return Err(self.error(format!("unterminated start tag <{}>", element.tag)));
            }
            let (name_line, name_column) = (self.line, self.column);
            let name = self.parse_name()?;
            self.skip_whitespace();
            self.expect('=')?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;
            if element.attributes.contains_key(&name) {
                return Err(MarkupError::new(
                    format!("duplicate attribute '{}' on <{}>", name, element.tag),
                    name_line,
                    name_column,
                ));
            }
            element.attributes.insert(name, value);
        }

        self.parse_content(&mut element, depth)?;
        Ok(element)
    }

    fn parse_attribute_value(&mut self) -> Result<String, MarkupError> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("attribute value must be quoted")),
        };
        self.advance();
        let (line, column) = (self.line, self.column);
        let mut raw = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => break,
                Some('<') => return Err(self.error("'<' is not allowed in attribute values")),
                Some(c) => raw.push(c),
                None => return Err(MarkupError::new("unterminated attribute value", line, column)),
            }
        }
        decode_entities(&raw).map_err(|m| MarkupError::new(m, line, column))
    }

    /// Parse children up to and including the matching end tag.
    fn parse_content(&mut self, element: &mut Element, depth: usize) -> Result<(), MarkupError> {
        loop {
            if self.is_eof() {
                return Err(self.error(format!("unclosed element <{}>", element.tag)));
            }
            if self.starts_with("</") {
                self.advance_by(2);
                let name = self.parse_name()?;
                if name != element.tag {
                    return Err(self.error(format!(
                        "mismatched end tag: expected </{}>, found </{}>",
                        element.tag, name
                    )));
                }
                self.skip_whitespace();
                self.expect('>')?;
                return Ok(());
            }
            if self.starts_with("<!--") {
                self.advance_by(4);
                self.consume_until("-->", "comment")?;
            } else if self.starts_with("<![CDATA[") {
                self.advance_by(9);
                let text = self.consume_until("]]>", "CDATA section")?;
                element.push_text(text);
            } else if self.starts_with("<?") {
                self.advance_by(2);
                self.consume_until("?>", "processing instruction")?;
            } else if self.peek() == Some('<') {
                let child = self.parse_element(depth + 1)?;
                element.children.push(Content::Element(child));
            } else {
                let (line, column) = (self.line, self.column);
                let mut raw = String::new();
                while let Some(c) = self.peek() {
                    if c == '<' {
                        break;
                    }
                    raw.push(c);
                    self.advance();
                }
                let text = decode_entities(&raw).map_err(|m| MarkupError::new(m, line, column))?;
                element.push_text(text);
            }
        }
    }
}

/// Replace entity and character references in `raw`.
fn decode_entities(raw: &str) -> Result<String, String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| "unterminated entity reference".to_string())?;
        let entity = &after[..semi];
        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    return Err(format!("unknown entity '&{};'", entity));
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid character reference '&{};'", entity))?
            }
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
