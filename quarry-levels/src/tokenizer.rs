/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Splits map text into tokens.
//!
//! Braces only count as braces when they stand alone, so masked texture names
//! like `{vinehang2b` come through as ordinary words. Quoted strings have no
//! escapes: the next quote on the same line always ends the string.

use crate::error::{ParseError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`
    Open,
    /// `}`
    Close,
    /// Text between two quotes, which may be empty.
    Quoted(String),
    /// A run of non-whitespace characters.
    Word(String),
}

impl Token {
    /// True if this is the word `word`.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Open => f.write_str("{"),
            Token::Close => f.write_str("}"),
            Token::Quoted(s) => write!(f, "\"{}\"", s),
            Token::Word(s) => f.write_str(s),
        }
    }
}

/// A token and the line it started on (1-indexed).
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Tokenize the whole of `text`. `//` comments are dropped.
pub fn tokenize(text: &str) -> Result<Vec<SpannedToken>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut line = 1;

    while let Some(&(start, chr)) = chars.peek() {
        match chr {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut end = None;
                for (i, c) in chars.by_ref() {
                    match c {
                        '"' => {
                            end = Some(i);
                            break;
                        }
                        '\n' => break,
                        _ => {}
                    }
                }

                let end = end.ok_or(ParseError::UnterminatedQuote { line })?;
                tokens.push(SpannedToken {
                    token: Token::Quoted(text[start + 1..end].to_owned()),
                    line,
                });
            }
            _ => {
                let mut end = text.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() || c == '"' {
                        end = i;
                        break;
                    }
                    chars.next();
                }

                let word = &text[start..end];
                if word.starts_with("//") {
                    while let Some(&(_, c)) = chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        chars.next();
                    }
                    continue;
                }

                let token = match word {
                    "{" => Token::Open,
                    "}" => Token::Close,
                    _ => Token::Word(word.to_owned()),
                };
                tokens.push(SpannedToken { token, line });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<Token> {
        tokenize(text).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn masked_texture_is_a_word() {
        assert_eq!(
            kinds("{ {vinehang2b }"),
            vec![Token::Open, Token::Word("{vinehang2b".into()), Token::Close]
        );
    }

    #[test]
    fn empty_quotes_are_a_value() {
        assert_eq!(
            kinds("\"target\" \"\""),
            vec![Token::Quoted("target".into()), Token::Quoted("".into())]
        );
    }

    #[test]
    fn comments_and_lines() {
        let tokens = tokenize("// Game: Quake\n{\n\"a\" \"b\" // trailing\n}").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[3].line, 4);
    }

    #[test]
    fn unterminated_quote() {
        match tokenize("{\n\"classname\" \"worldspawn\n}") {
            Err(ParseError::UnterminatedQuote { line }) => assert_eq!(line, 2),
            other => panic!("expected unterminated quote, got {:?}", other),
        }
    }
}
