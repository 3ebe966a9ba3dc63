//! Command Line Tokenizer
//!
//! Splits one input line into a command name and its arguments. The command
//! is everything before the first space; the rest is split on spaces, with
//! double quotes grouping words into a single argument.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Unclosed quotes")]
    UnclosedQuotes,
}

/// A tokenized input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub command: Option<String>,
    pub args: Vec<String>,
}

/// Tokenize `line`, reporting an unterminated quote as "no command, no args".
pub fn parse(line: &str) -> ParsedLine {
    tokenize(line).unwrap_or_default()
}

/// Tokenize `line`, surfacing quote errors.
pub fn tokenize(line: &str) -> Result<ParsedLine, TokenizeError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ParsedLine::default());
    }

    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => return Ok(ParsedLine { command: Some(line.to_string()), args: Vec::new() }),
    };

    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in rest.chars() {
        match c {
            '"' if !in_quotes => in_quotes = true,
            '"' => {
                in_quotes = false;
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(TokenizeError::UnclosedQuotes);
    }
    if !current.is_empty() {
        args.push(current);
    }

    Ok(ParsedLine { command: Some(command.to_string()), args })
}
