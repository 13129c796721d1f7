//! Token types for the GraphQL lexical grammar.
//!
//! Scanning is derived with `logos`. Literal bodies (strings, block strings,
//! numbers) are finished by callbacks so that the token carries its decoded
//! value and malformed literals surface as a [`LexError`].

use crate::ast::Span;
use logos::Logos;
use smol_str::SmolStr;
use std::fmt;

/// Reasons a slice of query text could not be turned into a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    InvalidEscape,
    InvalidNumber,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter => write!(f, "unexpected character"),
            LexError::UnterminatedString => write!(f, "unterminated string"),
            LexError::InvalidEscape => write!(f, "invalid escape sequence"),
            LexError::InvalidNumber => write!(f, "invalid number"),
        }
    }
}

/// The kind of a lexical token.
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n,\x{FEFF}]+")]
#[logos(skip r"#[^\r\n]*")]
pub enum TokenKind {
    #[token("!")]
    Bang,
    #[token("$")]
    Dollar,
    #[token("&")]
    Amp,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("...")]
    Spread,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("@")]
    At,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("|")]
    Pipe,
    #[token("}")]
    RBrace,

    #[regex(r"[_A-Za-z][_0-9A-Za-z]*", |lex| SmolStr::new(lex.slice()))]
    Name(SmolStr),

    #[regex(r"-?[0-9]+", int, priority = 3)]
    Int(SmolStr),

    // Every prefix of a float is accepted here and checked in `float`.
    #[regex(r"-?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]*)?", float)]
    Float(SmolStr),

    #[token("\"", string)]
    String(String),

    #[token("\"\"\"", block_string)]
    BlockString(String),

    /// End of input. Never produced by scanning; appended by the lexer.
    Eof,
}

impl TokenKind {
    /// Returns the name text if this is a `Name` token.
    pub fn as_name(&self) -> Option<&SmolStr> {
        match self {
            TokenKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if this is the `Name` token with exactly this text.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, TokenKind::Name(name) if name == keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Dollar => write!(f, "'$'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Spread => write!(f, "'...'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::At => write!(f, "'@'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Name(name) => write!(f, "Name \"{name}\""),
            TokenKind::Int(value) => write!(f, "Int \"{value}\""),
            TokenKind::Float(value) => write!(f, "Float \"{value}\""),
            TokenKind::String(_) => write!(f, "String"),
            TokenKind::BlockString(_) => write!(f, "BlockString"),
            TokenKind::Eof => write!(f, "<EOF>"),
        }
    }
}

/// A lexical token with its kind and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the source slice covered by this token.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

fn is_number_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn int(lex: &mut logos::Lexer<'_, TokenKind>) -> Result<SmolStr, LexError> {
    let digits = lex.slice().trim_start_matches('-');
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(invalid_number(lex));
    }
    finish_number(lex)
}

fn float(lex: &mut logos::Lexer<'_, TokenKind>) -> Result<SmolStr, LexError> {
    let text = lex.slice().trim_start_matches('-');
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(index) => (&text[..index], Some(&text[index + 1..])),
        None => (text, None),
    };
    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };

    let leading_zero = integer.len() > 1 && integer.starts_with('0');
    let empty_fraction = fraction.is_some_and(str::is_empty);
    let empty_exponent =
        exponent.is_some_and(|exponent| exponent.trim_start_matches(['+', '-']).is_empty());
    if leading_zero || empty_fraction || empty_exponent {
        return Err(invalid_number(lex));
    }
    finish_number(lex)
}

/// A number may not be directly followed by a digit, a `.` or a name
/// character (`12abc`, `1.5.2`).
fn finish_number(lex: &mut logos::Lexer<'_, TokenKind>) -> Result<SmolStr, LexError> {
    if lex.remainder().starts_with(is_number_continuation) {
        return Err(invalid_number(lex));
    }
    Ok(SmolStr::new(lex.slice()))
}

/// Swallows the rest of the malformed literal so it is reported once.
fn invalid_number(lex: &mut logos::Lexer<'_, TokenKind>) -> LexError {
    let remainder = lex.remainder();
    let tail = remainder
        .find(|c: char| !is_number_continuation(c))
        .unwrap_or(remainder.len());
    lex.bump(tail);
    LexError::InvalidNumber
}

/// Finishes a quoted string after its opening `"`.
fn string(lex: &mut logos::Lexer<'_, TokenKind>) -> Result<String, LexError> {
    let remainder = lex.remainder();
    let mut value = String::new();
    let mut chars = remainder.char_indices();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => {
                lex.bump(index + 1);
                return Ok(value);
            }
            '\n' | '\r' => break,
            '\\' => {
                let escaped = match chars.next() {
                    Some((_, '"')) => '"',
                    Some((_, '\\')) => '\\',
                    Some((_, '/')) => '/',
                    Some((_, 'b')) => '\u{0008}',
                    Some((_, 'f')) => '\u{000C}',
                    Some((_, 'n')) => '\n',
                    Some((_, 'r')) => '\r',
                    Some((_, 't')) => '\t',
                    Some((start, 'u')) => {
                        let hex = remainder.get(start + 1..start + 5);
                        match hex.and_then(decode_unicode_escape) {
                            Some(decoded) => {
                                for _ in 0..4 {
                                    chars.next();
                                }
                                decoded
                            }
                            None => {
                                lex.bump(start + 1);
                                return Err(LexError::InvalidEscape);
                            }
                        }
                    }
                    Some((start, other)) => {
                        lex.bump(start + other.len_utf8());
                        return Err(LexError::InvalidEscape);
                    }
                    None => break,
                };
                value.push(escaped);
            }
            other => value.push(other),
        }
    }

    let line_end = remainder.find(['\n', '\r']).unwrap_or(remainder.len());
    lex.bump(line_end);
    Err(LexError::UnterminatedString)
}

fn decode_unicode_escape(hex: &str) -> Option<char> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Finishes a block string after its opening `"""`.
fn block_string(lex: &mut logos::Lexer<'_, TokenKind>) -> Result<String, LexError> {
    let remainder = lex.remainder();
    let mut raw = String::new();
    let mut index = 0;

    while index < remainder.len() {
        let rest = &remainder[index..];
        if rest.starts_with("\\\"\"\"") {
            raw.push_str("\"\"\"");
            index += 4;
        } else if rest.starts_with("\"\"\"") {
            lex.bump(index + 3);
            return Ok(block_string_value(&raw));
        } else if let Some(ch) = rest.chars().next() {
            raw.push(ch);
            index += ch.len_utf8();
        }
    }

    lex.bump(remainder.len());
    Err(LexError::UnterminatedString)
}

/// Removes the common indentation and the leading and trailing blank lines
/// of a block string.
fn block_string_value(raw: &str) -> String {
    let lines: Vec<&str> = raw.split("\r\n").flat_map(|line| line.split(['\n', '\r'])).collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            (indent < line.len()).then_some(indent)
        })
        .min()
        .unwrap_or(0);

    let mut dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line
            } else {
                line.get(common_indent..).unwrap_or("")
            }
        })
        .collect();

    let is_blank = |line: &&str| line.trim_matches([' ', '\t']).is_empty();
    while dedented.first().is_some_and(is_blank) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(is_blank) {
        dedented.pop();
    }

    dedented.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Result<TokenKind, LexError>> {
        TokenKind::lexer(source).collect()
    }

    #[test]
    fn token_creation() {
        let token = Token::new(TokenKind::LBrace, 0..1);
        assert_eq!(token.kind, TokenKind::LBrace);
        assert_eq!(token.slice("{ id }"), "{");
    }

    #[test]
    fn punctuators_and_names() {
        assert_eq!(
            kinds("{ ...on $x: [Int!] = @skip }"),
            vec![
                Ok(TokenKind::LBrace),
                Ok(TokenKind::Spread),
                Ok(TokenKind::Name("on".into())),
                Ok(TokenKind::Dollar),
                Ok(TokenKind::Name("x".into())),
                Ok(TokenKind::Colon),
                Ok(TokenKind::LBracket),
                Ok(TokenKind::Name("Int".into())),
                Ok(TokenKind::Bang),
                Ok(TokenKind::RBracket),
                Ok(TokenKind::Equals),
                Ok(TokenKind::At),
                Ok(TokenKind::Name("skip".into())),
                Ok(TokenKind::RBrace),
            ]
        );
    }

    #[test]
    fn commas_and_comments_are_ignored() {
        assert_eq!(
            kinds("a, b # trailing comment\n c"),
            vec![
                Ok(TokenKind::Name("a".into())),
                Ok(TokenKind::Name("b".into())),
                Ok(TokenKind::Name("c".into())),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("0 -12 3.25 1e10 6.02E-23"),
            vec![
                Ok(TokenKind::Int("0".into())),
                Ok(TokenKind::Int("-12".into())),
                Ok(TokenKind::Float("3.25".into())),
                Ok(TokenKind::Float("1e10".into())),
                Ok(TokenKind::Float("6.02E-23".into())),
            ]
        );
    }

    #[test]
    fn malformed_numbers() {
        assert_eq!(kinds("007"), vec![Err(LexError::InvalidNumber)]);
        assert_eq!(kinds("12abc"), vec![Err(LexError::InvalidNumber)]);
        assert_eq!(kinds("1."), vec![Err(LexError::InvalidNumber)]);
        assert_eq!(kinds("2e+"), vec![Err(LexError::InvalidNumber)]);
    }

    #[test]
    fn strings_decode_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\nA""#),
            vec![Ok(TokenKind::String("a\"b\\c\nA".to_string()))]
        );
        assert_eq!(kinds(r#""""#), vec![Ok(TokenKind::String(String::new()))]);
    }

    #[test]
    fn string_errors() {
        assert_eq!(kinds("\"open"), vec![Err(LexError::UnterminatedString)]);
        assert_eq!(kinds(r#""bad \q""#)[0], Err(LexError::InvalidEscape));
        assert_eq!(kinds(r#""bad \u12""#)[0], Err(LexError::InvalidEscape));
    }

    #[test]
    fn block_strings_are_dedented() {
        let source = "\"\"\"\n    Hello,\n      World!\n\n    Yours\n  \"\"\"";
        assert_eq!(
            kinds(source),
            vec![Ok(TokenKind::BlockString(
                "Hello,\n  World!\n\nYours".to_string()
            ))]
        );
        assert_eq!(
            kinds(r#"""say \""" twice"""#),
            vec![Ok(TokenKind::BlockString("say \"\"\" twice".to_string()))]
        );
    }

    #[test]
    fn display_for_messages() {
        assert_eq!(TokenKind::Name("subject".into()).to_string(), "Name \"subject\"");
        assert_eq!(TokenKind::RBrace.to_string(), "'}'");
        assert_eq!(TokenKind::Eof.to_string(), "<EOF>");
    }
}
