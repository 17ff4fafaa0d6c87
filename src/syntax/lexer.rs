use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Magnitude only; a leading '-' is a separate token.
    Int(u64),
    Str(String),
    Dot,
    Comma,
    Semi,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Question,
    At,
    Assign,
    EqEq,
    NotEq,
    Bang,
    Plus,
    Minus,
    Star,
    AndAnd,
    OrOr,
    Eof,
}

impl TokenKind {
    /// Source-like rendering for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("'{name}'"),
            TokenKind::Int(n) => format!("integer {n}"),
            TokenKind::Str(s) => format!("string \"{s}\""),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::Question => "'?'".to_string(),
            TokenKind::At => "'@'".to_string(),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::EqEq => "'=='".to_string(),
            TokenKind::NotEq => "'!='".to_string(),
            TokenKind::Bang => "'!'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::AndAnd => "'&&'".to_string(),
            TokenKind::OrOr => "'||'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

/// Splits Java source text into tokens, skipping whitespace and comments.
///
/// `>>` is always two `Gt` tokens so nested type arguments close cleanly.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut chars = input.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some((idx, ch)) = chars.peek().copied() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        match ch {
            '0'..='9' => {
                let start = idx;
                let mut end = idx;
                while let Some((i, c)) = chars.peek().copied() {
                    if c.is_ascii_digit() {
                        end = i;
                        chars.next();
                    } else {
                        break;
                    }
                }
                if matches!(chars.peek(), Some((_, 'L' | 'l'))) {
                    chars.next();
                }
                let raw = &input[start..=end];
                let n: u64 = raw.parse().map_err(|e| {
                    ParseError::new(format!("invalid integer literal '{raw}': {e}"), start)
                })?;
                tokens.push(Token {
                    kind: TokenKind::Int(n),
                    pos: start,
                });
            }
            '"' => {
                chars.next();
                let start = idx;
                let mut out = String::new();
                let mut closed = false;
                while let Some((i, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\n' => {
                            return Err(ParseError::new("newline in string literal", i));
                        }
                        '\\' => {
                            let Some((esc_pos, esc)) = chars.next() else {
                                return Err(ParseError::new("unterminated escape sequence", i));
                            };
                            match esc {
                                '"' => out.push('"'),
                                '\'' => out.push('\''),
                                '\\' => out.push('\\'),
                                'n' => out.push('\n'),
                                't' => out.push('\t'),
                                'r' => out.push('\r'),
                                'b' => out.push('\u{8}'),
                                'f' => out.push('\u{c}'),
                                '0' => out.push('\0'),
                                'u' => {
                                    let mut hex = String::new();
                                    for _ in 0..4 {
                                        match chars.next() {
                                            Some((_, h)) if h.is_ascii_hexdigit() => hex.push(h),
                                            _ => {
                                                return Err(ParseError::new(
                                                    "invalid unicode escape",
                                                    esc_pos,
                                                ))
                                            }
                                        }
                                    }
                                    let code = u32::from_str_radix(&hex, 16)
                                        .ok()
                                        .and_then(char::from_u32)
                                        .ok_or_else(|| {
                                            ParseError::new("invalid unicode escape", esc_pos)
                                        })?;
                                    out.push(code);
                                }
                                other => {
                                    return Err(ParseError::new(
                                        format!("unknown escape sequence '\\{other}'"),
                                        esc_pos,
                                    ))
                                }
                            }
                        }
                        other => out.push(other),
                    }
                }

                if !closed {
                    return Err(ParseError::new(
                        format!("unterminated string literal starting at {start}"),
                        start,
                    ));
                }

                tokens.push(Token {
                    kind: TokenKind::Str(out),
                    pos: start,
                });
            }
            '/' => {
                chars.next();
                match chars.peek().copied() {
                    Some((_, '/')) => {
                        for (_, c) in chars.by_ref() {
                            if c == '\n' {
                                break;
                            }
                        }
                    }
                    Some((_, '*')) => {
                        chars.next();
                        let mut prev = '\0';
                        let mut closed = false;
                        for (_, c) in chars.by_ref() {
                            if prev == '*' && c == '/' {
                                closed = true;
                                break;
                            }
                            prev = c;
                        }
                        if !closed {
                            return Err(ParseError::new("unterminated block comment", idx));
                        }
                    }
                    _ => {
                        return Err(ParseError::new("unexpected character '/'", idx));
                    }
                }
            }
            '&' | '|' => {
                chars.next();
                if chars.peek().map(|(_, c)| *c) == Some(ch) {
                    chars.next();
                    let kind = if ch == '&' {
                        TokenKind::AndAnd
                    } else {
                        TokenKind::OrOr
                    };
                    tokens.push(Token { kind, pos: idx });
                } else {
                    return Err(ParseError::new(format!("unexpected character '{ch}'"), idx));
                }
            }
            '=' | '!' => {
                chars.next();
                let doubled = chars.peek().map(|(_, c)| *c) == Some('=');
                if doubled {
                    chars.next();
                }
                let kind = match (ch, doubled) {
                    ('=', true) => TokenKind::EqEq,
                    ('=', false) => TokenKind::Assign,
                    ('!', true) => TokenKind::NotEq,
                    _ => TokenKind::Bang,
                };
                tokens.push(Token { kind, pos: idx });
            }
            c if c == '_' || c == '$' || c.is_ascii_alphabetic() => {
                let start = idx;
                let mut end = idx;
                while let Some((i, c)) = chars.peek().copied() {
                    if c == '_' || c == '$' || c.is_ascii_alphanumeric() {
                        end = i;
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(input[start..=end].to_string()),
                    pos: start,
                });
            }
            _ => {
                let kind = match ch {
                    '.' => TokenKind::Dot,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semi,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '<' => TokenKind::Lt,
                    '>' => TokenKind::Gt,
                    '?' => TokenKind::Question,
                    '@' => TokenKind::At,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    other => {
                        return Err(ParseError::new(
                            format!("unexpected character '{other}'"),
                            idx,
                        ))
                    }
                };
                chars.next();
                tokens.push(Token { kind, pos: idx });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        pos: input.len(),
    });

    Ok(tokens)
}
