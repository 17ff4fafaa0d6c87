//! Identifier shaping: case conversion, uniqueness and reserved-word escaping.
//!
//! Escaping appends [`RESERVED_WORD_MARKER`] to an identifier that collides
//! with a reserved word. Unescaping strips one trailing marker only when what
//! remains is reserved. An identifier chosen on purpose as `class_` is
//! therefore indistinguishable from an escaped `class` and unescapes to it;
//! callers that need the raw identifier back must keep it themselves.

use std::collections::HashSet;

pub const RESERVED_WORD_MARKER: char = '_';

pub const JAVA_RESERVED_WORDS: &[&str] = &[
    "_",
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

pub fn is_reserved_word(text: &str) -> bool {
    JAVA_RESERVED_WORDS.iter().any(|kw| *kw == text)
}

pub fn escape_reserved_word(ident: &str) -> String {
    if is_reserved_word(ident) {
        format!("{ident}{RESERVED_WORD_MARKER}")
    } else {
        ident.to_string()
    }
}

pub fn unescape_reserved_word(ident: &str) -> String {
    match ident.strip_suffix(RESERVED_WORD_MARKER) {
        Some(stripped) if is_reserved_word(stripped) => stripped.to_string(),
        _ => ident.to_string(),
    }
}

pub fn to_pascal_case(raw: &str) -> String {
    let mut out = String::new();
    for token in identifier_tokens(raw) {
        push_capitalized(&mut out, &token);
    }
    out
}

pub fn to_camel_case(raw: &str) -> String {
    let mut out = String::new();
    for (i, token) in identifier_tokens(raw).iter().enumerate() {
        if i == 0 {
            out.push_str(token);
        } else {
            push_capitalized(&mut out, token);
        }
    }
    out
}

pub fn to_upper_snake_case(raw: &str) -> String {
    identifier_tokens(raw).join("_").to_ascii_uppercase()
}

fn push_capitalized(out: &mut String, token: &str) {
    let mut chars = token.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.extend(chars);
    }
}

/// Lower-cased words of `raw`, split on punctuation and camel-case humps.
pub fn identifier_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in raw.split(|c: char| !c.is_ascii_alphanumeric()) {
        if chunk.is_empty() {
            continue;
        }
        tokens.extend(split_camel_tokens(chunk));
    }
    tokens
}

fn split_camel_tokens(chunk: &str) -> Vec<String> {
    let chars: Vec<char> = chunk.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut start = 0usize;

    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let curr = chars[i];
        let next = chars.get(i + 1).copied();

        let boundary = (prev.is_ascii_lowercase() && curr.is_ascii_uppercase())
            || (prev.is_ascii_alphabetic() && curr.is_ascii_digit())
            || (prev.is_ascii_digit() && curr.is_ascii_alphabetic())
            || (prev.is_ascii_uppercase()
                && curr.is_ascii_uppercase()
                && next.map(|n| n.is_ascii_lowercase()).unwrap_or(false));

        if boundary {
            tokens.push(chars[start..i].iter().collect::<String>().to_ascii_lowercase());
            start = i;
        }
    }

    tokens.push(chars[start..].iter().collect::<String>().to_ascii_lowercase());
    tokens
}

/// Returns `base`, or `base2`, `base3`, ... if already taken, and records it.
pub fn unique_identifier(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }

    let mut idx = 2usize;
    loop {
        let candidate = format!("{base}{idx}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        idx += 1;
    }
}

fn starts_with_ident_char(text: &str) -> bool {
    text.chars()
        .next()
        .map(|c| c == '_' || c == '$' || c.is_ascii_alphabetic())
        .unwrap_or(false)
}

/// PascalCase type name for an arbitrary wire name.
pub fn sanitize_type_name(raw: &str) -> String {
    let mut out = to_pascal_case(raw);
    if out.is_empty() {
        out = "Type".to_string();
    }
    if !starts_with_ident_char(&out) {
        out = format!("Type{out}");
    }
    escape_reserved_word(&out)
}

/// camelCase member name for an arbitrary wire name, escaped if reserved.
pub fn sanitize_member_name(raw: &str, fallback: &str) -> String {
    let mut out = to_camel_case(raw);
    if out.is_empty() {
        out = fallback.to_string();
    }
    if !starts_with_ident_char(&out) {
        out = format!("{RESERVED_WORD_MARKER}{out}");
    }
    escape_reserved_word(&out)
}

/// UPPER_SNAKE constant name for an enum value.
pub fn sanitize_constant_name(raw: &str) -> String {
    let mut out = to_upper_snake_case(raw);
    if out.is_empty() {
        out = "VALUE".to_string();
    }
    if !starts_with_ident_char(&out) {
        out = format!("V_{out}");
    }
    out
}
