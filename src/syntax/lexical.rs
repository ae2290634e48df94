//! Lexical context classification.
//!
//! Every matcher in the engine is textual, so each candidate match is checked
//! against the lexical state of the character it starts on: code, a quoted
//! atom, a double-quoted string, a back-quoted string, a character-code
//! literal (`0'c`) or a comment.
//!
//! Block comments are only tracked within the text being lexed. Lines that
//! begin with `/*`, `*` or `*/` are treated as comment lines by
//! [`is_non_code_line`] regardless of what precedes them.

/// Lexical state of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Code,
    SingleQuoted,
    DoubleQuoted,
    BackQuoted,
    /// The quote and the code character of a `0'c` literal
    CharCode,
    LineComment,
    BlockComment,
}

impl LexState {
    pub fn is_comment(self) -> bool {
        matches!(self, LexState::LineComment | LexState::BlockComment)
    }
}

/// Result of classifying an offset within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexicalContext {
    pub in_comment: bool,
    pub in_single_quoted: bool,
    pub in_double_quoted: bool,
}

impl LexicalContext {
    fn from_state(state: LexState) -> Self {
        Self {
            in_comment: state.is_comment(),
            in_single_quoted: state == LexState::SingleQuoted,
            in_double_quoted: matches!(state, LexState::DoubleQuoted | LexState::BackQuoted),
        }
    }

    /// True when the offset sits in plain code.
    pub fn is_code(&self) -> bool {
        !self.in_comment && !self.in_single_quoted && !self.in_double_quoted
    }
}

/// Classify the character at `col` (a character index) of `line`.
///
/// Offsets past the end of the line inherit a trailing line comment, since
/// `%` swallows the rest of the line.
pub fn classify(line: &str, col: usize) -> LexicalContext {
    let chars: Vec<char> = line.chars().collect();
    let states = lex_states(&chars);
    match states.get(col) {
        Some(state) => LexicalContext::from_state(*state),
        None => match states.last() {
            Some(LexState::LineComment) => LexicalContext::from_state(LexState::LineComment),
            _ => LexicalContext::default(),
        },
    }
}

/// Compute the lexical state of every character in `chars`.
///
/// Newlines are always `Code`: line comments stop at them, and an unescaped
/// newline inside a quoted item closes it so one stray quote cannot poison
/// the rest of the text.
pub fn lex_states(chars: &[char]) -> Vec<LexState> {
    let mut states = vec![LexState::Code; chars.len()];
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '%' => {
                while i < chars.len() && chars[i] != '\n' {
                    states[i] = LexState::LineComment;
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                states[i] = LexState::BlockComment;
                states[i + 1] = LexState::BlockComment;
                i += 2;
                while i < chars.len() {
                    states[i] = LexState::BlockComment;
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        states[i + 1] = LexState::BlockComment;
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            '\'' if is_char_code_quote(chars, i) => {
                i = mark_char_code(chars, &mut states, i);
            }
            quote @ ('\'' | '"' | '`') => {
                let state = match quote {
                    '\'' => LexState::SingleQuoted,
                    '"' => LexState::DoubleQuoted,
                    _ => LexState::BackQuoted,
                };
                i = mark_quoted(chars, &mut states, i, quote, state);
            }
            _ => i += 1,
        }
    }

    states
}

/// `0'c` character code: a quote right after a standalone `0`.
fn is_char_code_quote(chars: &[char], i: usize) -> bool {
    if i == 0 || chars[i - 1] != '0' {
        return false;
    }
    match i.checked_sub(2).map(|j| chars[j]) {
        Some(c) => !(c.is_alphanumeric() || c == '_'),
        None => true,
    }
}

fn mark_char_code(chars: &[char], states: &mut [LexState], quote: usize) -> usize {
    states[quote] = LexState::CharCode;
    let mut i = quote + 1;
    match chars.get(i) {
        Some('\\') => {
            states[i] = LexState::CharCode;
            if i + 1 < chars.len() && chars[i + 1] != '\n' {
                states[i + 1] = LexState::CharCode;
                i += 1;
            }
            i + 1
        }
        Some('\'') => {
            states[i] = LexState::CharCode;
            if chars.get(i + 1) == Some(&'\'') {
                states[i + 1] = LexState::CharCode;
                i += 1;
            }
            i + 1
        }
        Some('\n') | None => i,
        Some(_) => {
            states[i] = LexState::CharCode;
            i + 1
        }
    }
}

/// Mark a quoted item starting at `open`, returning the index after it.
fn mark_quoted(
    chars: &[char],
    states: &mut [LexState],
    open: usize,
    quote: char,
    state: LexState,
) -> usize {
    states[open] = state;
    let mut i = open + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            return i;
        }
        states[i] = state;
        if c == '\\' {
            if i + 1 < chars.len() {
                // `\` followed by a newline is a line continuation
                states[i + 1] = state;
            }
            i += 2;
            continue;
        }
        if c == quote {
            if chars.get(i + 1) == Some(&quote) {
                states[i + 1] = state;
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    i
}

/// True for blank lines and lines the comment heuristic treats as non-code.
///
/// A line starting with `/*` still counts as code when the comment closes on
/// the same line and code follows it.
pub fn is_non_code_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('%') {
        return true;
    }
    if let Some(rest) = trimmed.strip_prefix("/*") {
        return match rest.find("*/") {
            Some(end) => is_non_code_line(&rest[end + 2..]),
            None => true,
        };
    }
    trimmed.starts_with('*')
}

/// The code portion of a line: comments are blanked out with spaces so that
/// column positions are preserved, and trailing whitespace is removed.
pub fn code_part(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let states = lex_states(&chars);
    let mut out: String = chars
        .iter()
        .zip(&states)
        .map(|(c, state)| if state.is_comment() { ' ' } else { *c })
        .collect();
    out.truncate(out.trim_end().len());
    out
}
