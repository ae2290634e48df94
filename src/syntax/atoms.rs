//! Atom and variable naming rules.

/// Characters that may continue an unquoted atom or a variable name.
#[inline]
pub fn is_name_char(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// `[a-z][A-Za-z0-9_]*`, extended to Unicode lowercase letters.
pub fn is_unquoted_atom(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => chars.all(is_name_char),
        _ => false,
    }
}

/// `[A-Z_][A-Za-z0-9_]*`, extended to Unicode uppercase letters.
pub fn is_variable_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_uppercase() => chars.all(is_name_char),
        _ => false,
    }
}

/// Parameter variables are uppercase variables wrapped in underscores (`_Type_`).
pub fn is_parameter_variable(text: &str) -> bool {
    let Some(inner) = text
        .strip_prefix('_')
        .and_then(|rest| rest.strip_suffix('_'))
    else {
        return false;
    };
    inner.chars().next().is_some_and(char::is_uppercase) && inner.chars().all(is_name_char)
}

/// Content of a quoted atom (`'...'`), with escapes resolved.
///
/// Returns `None` when `text` is not exactly one well-formed quoted atom.
pub fn parse_quoted_atom(text: &str) -> Option<String> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut content = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => return None,
            '\\' => match chars.next()? {
                'n' => content.push('\n'),
                't' => content.push('\t'),
                '\n' => {}
                other => content.push(other),
            },
            '\'' => {
                if chars.next()? != '\'' {
                    return None;
                }
                content.push('\'');
            }
            other => content.push(other),
        }
    }
    Some(content)
}

/// Quote an atom's content.
pub fn quote_atom(content: &str) -> String {
    let mut quoted = String::with_capacity(content.len() + 2);
    quoted.push('\'');
    for c in content.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

/// Text to write in place of an occurrence of a renamed atom.
///
/// Quoted occurrences stay quoted. Unquoted occurrences lose the quotes of a
/// quoted new name, unless the bare content would not read back as an atom.
pub fn replacement_text(occurrence_quoted: bool, new_name: &str) -> String {
    let quoted_content = parse_quoted_atom(new_name);
    match (occurrence_quoted, quoted_content) {
        (true, Some(_)) => new_name.to_string(),
        (true, None) => quote_atom(new_name),
        (false, Some(content)) if is_unquoted_atom(&content) => content,
        (false, _) => new_name.to_string(),
    }
}
