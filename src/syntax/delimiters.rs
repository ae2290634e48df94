//! Delimiter balancing and argument counting.

use super::text::FlatText;

fn closer_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Find the delimiter closing the one at `open`.
///
/// Parentheses, brackets and braces nest independently but must close in
/// order; anything inside quotes, comments or `0'c` literals is ignored.
/// Returns `None` for unbalanced or mismatched input rather than a guess.
pub fn find_matching_close(text: &FlatText, open: usize) -> Option<usize> {
    let first = closer_for(text.char_at(open)?)?;
    if !text.is_code(open) {
        return None;
    }

    let mut expected = vec![first];
    for offset in open + 1..text.len() {
        if !text.is_code(offset) {
            continue;
        }
        let c = text.chars()[offset];
        if let Some(closer) = closer_for(c) {
            expected.push(closer);
        } else if matches!(c, ')' | ']' | '}') {
            if expected.pop() != Some(c) {
                return None;
            }
            if expected.is_empty() {
                return Some(offset);
            }
        }
    }
    None
}

/// Argument spans (`start..end` offsets, untrimmed) of the compound term
/// whose opening delimiter is at `open`.
///
/// Only commas at the call's own nesting level separate arguments. An
/// argument list holding nothing but whitespace or comments has no arguments.
pub fn top_level_arguments(text: &FlatText, open: usize) -> Option<Vec<(usize, usize)>> {
    let close = find_matching_close(text, open)?;

    let body_start = open + 1;
    if text.skip_layout(body_start) >= close {
        return Some(Vec::new());
    }

    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut start = body_start;
    for offset in body_start..close {
        if !text.is_code(offset) {
            continue;
        }
        match text.chars()[offset] {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                arguments.push((start, offset));
                start = offset + 1;
            }
            _ => {}
        }
    }
    arguments.push((start, close));
    Some(arguments)
}

/// Number of top-level arguments of the compound term opened at `open`.
pub fn count_arguments(text: &FlatText, open: usize) -> Option<u32> {
    top_level_arguments(text, open).map(|args| args.len() as u32)
}
