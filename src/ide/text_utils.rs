//! Cursor tokens and name validation.

use crate::syntax::atoms::{is_name_char, is_unquoted_atom, is_variable_name, parse_quoted_atom};
use crate::syntax::lexical::{LexState, lex_states};

use super::error::RenameError;

/// The atom or variable under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorToken {
    /// Text as written (quotes included for quoted atoms)
    pub text: String,
    pub start: u32,
    pub end: u32,
    pub quoted: bool,
}

impl CursorToken {
    /// The name the token denotes (quotes removed).
    pub fn name(&self) -> String {
        if self.quoted {
            parse_quoted_atom(&self.text).unwrap_or_else(|| self.text.clone())
        } else {
            self.text.clone()
        }
    }
}

/// Find the token under (or immediately before) the cursor.
///
/// Quoted atoms are returned whole. Nothing is returned inside comments,
/// `0'c` literals or double-quoted text.
pub fn token_at_cursor(line: &str, column: usize) -> Option<CursorToken> {
    let chars: Vec<char> = line.chars().collect();
    let states = lex_states(&chars);
    // A cursor right after a name or a closing quote still selects it
    token_span(&chars, &states, column)
        .or_else(|| token_span(&chars, &states, column.checked_sub(1)?))
}

/// The token covering the character at `idx`.
fn token_span(chars: &[char], states: &[LexState], idx: usize) -> Option<CursorToken> {
    match *states.get(idx)? {
        LexState::SingleQuoted => {
            let mut start = idx;
            while start > 0 && states[start - 1] == LexState::SingleQuoted {
                start -= 1;
            }
            let mut end = idx + 1;
            while end < chars.len() && states[end] == LexState::SingleQuoted {
                end += 1;
            }
            let text: String = chars[start..end].iter().collect();
            parse_quoted_atom(&text)?;
            Some(CursorToken {
                text,
                start: start as u32,
                end: end as u32,
                quoted: true,
            })
        }
        LexState::Code if is_name_char(chars[idx]) => {
            let in_name = |i: usize| states[i] == LexState::Code && is_name_char(chars[i]);
            let mut start = idx;
            while start > 0 && in_name(start - 1) {
                start -= 1;
            }
            let mut end = idx + 1;
            while end < chars.len() && in_name(end) {
                end += 1;
            }
            Some(CursorToken {
                text: chars[start..end].iter().collect(),
                start: start as u32,
                end: end as u32,
                quoted: false,
            })
        }
        _ => None,
    }
}

/// Validate a new name for a predicate, non-terminal or entity.
pub fn validate_atom_name(name: &str) -> Result<(), RenameError> {
    if name.is_empty() {
        return Err(RenameError::invalid_name(name, "name is empty"));
    }
    if is_unquoted_atom(name) {
        return Ok(());
    }
    match parse_quoted_atom(name) {
        Some(content) if !content.is_empty() => Ok(()),
        Some(_) => Err(RenameError::invalid_name(name, "quoted atom is empty")),
        None => Err(RenameError::invalid_name(
            name,
            "must start with a lowercase letter and contain only letters, digits and underscores, or be a quoted atom",
        )),
    }
}

/// Validate a new name for a variable.
pub fn validate_variable_name(name: &str) -> Result<(), RenameError> {
    if name == "_" {
        return Err(RenameError::invalid_name(
            name,
            "the anonymous variable cannot be a rename target",
        ));
    }
    if is_variable_name(name) {
        Ok(())
    } else {
        Err(RenameError::invalid_name(
            name,
            "must start with an uppercase letter or underscore and contain only letters, digits and underscores",
        ))
    }
}
