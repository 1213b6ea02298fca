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

//! Recovering the brace structure of a map
//!
//! A block runs from an opening brace to its matching closing brace, found by
//! counting opens and closes. Inside it are quoted key/value pairs, solid
//! literals, and nested child blocks.

use crate::definitions::{Definition, DefinitionDictionary};
use crate::error::{ParseError, Result};
use crate::geometry::{Plane, Side, Solid, TextureProjection};
use crate::keyvalues::{KeyValue, KeyValues};
use crate::tokenizer::{SpannedToken, Token};
use quarry_types::{Vector2, Vector3};
use std::sync::Arc;

bitflags!(
    /// Which parts of a block are written back out.
    pub struct SaveFlags: u8 {
        /// Key/values
        const ENTITY = 0x1;

        /// Solid literals
        const SOLIDS = 0x2;

        /// Nested child blocks
        const CHILDREN = 0x4;
    }
);

/// How the contents of a block are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Every nested block is a child block. Bare words are ignored.
    Generic,
    /// Nested blocks starting with a plane line are solids.
    Quake,
}

impl Default for BlockKind {
    fn default() -> BlockKind {
        BlockKind::Quake
    }
}

/// One parsed brace-delimited block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub key_values: KeyValues,
    pub children: Vec<Block>,
    pub solids: Vec<Solid>,
    pub save: SaveFlags,
    pub definition: Option<Arc<Definition>>,
    /// Line of the opening brace, or 0 if this block wasn't parsed.
    pub line: usize,
}

impl Block {
    /// Parse every top-level block in `tokens`.
    pub fn parse_all(
        tokens: &[SpannedToken],
        kind: BlockKind,
        definitions: &DefinitionDictionary,
    ) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            match &tokens[i].token {
                Token::Open => {
                    let (block, used) = Block::parse(tokens, i, kind, definitions)?;
                    blocks.push(block);
                    i += used;
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        line: tokens[i].line,
                        found: other.to_string(),
                        expected: "`{`",
                    })
                }
            }
        }

        Ok(blocks)
    }

    /// Parse the block opening at `tokens[start]`.
    /// Returns the block and the number of tokens it covers, braces included.
    pub fn parse(
        tokens: &[SpannedToken],
        start: usize,
        kind: BlockKind,
        definitions: &DefinitionDictionary,
    ) -> Result<(Block, usize)> {
        let end = matching_close(tokens, start)?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut children = Vec::new();
        let mut solids = Vec::new();

        let mut i = start + 1;
        while i < end {
            let line = tokens[i].line;
            match &tokens[i].token {
                Token::Quoted(key) => match tokens.get(i + 1) {
                    Some(SpannedToken {
                        token: Token::Quoted(value),
                        ..
                    }) if i + 1 < end => {
                        pairs.push((key.clone(), value.clone()));
                        i += 2;
                    }
                    _ => {
                        return Err(ParseError::DanglingKey {
                            line,
                            key: key.clone(),
                        })
                    }
                },
                Token::Open => {
                    let solid_literal = kind == BlockKind::Quake
                        && tokens.get(i + 1).map_or(false, |t| t.token.is_word("("));

                    if solid_literal {
                        let (solid, used) = parse_solid(tokens, i)?;
                        solids.push(solid);
                        i += used;
                    } else {
                        let (child, used) = Block::parse(tokens, i, kind, definitions)?;
                        children.push(child);
                        i += used;
                    }
                }
                Token::Word(_) if kind == BlockKind::Generic => {
                    i += 1;
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        line,
                        found: other.to_string(),
                        expected: "a key/value pair or block",
                    })
                }
            }
        }

        let definition = pairs
            .iter()
            .rev()
            .find(|(k, _)| k == "classname")
            .and_then(|(_, classname)| definitions.lookup(classname));

        let mut key_values = KeyValues::new();
        for (key, value) in pairs {
            let template = definition.as_ref().and_then(|d| d.template(&key));
            key_values.insert(key, KeyValue::authored(value, template));
        }

        let block = Block {
            kind,
            key_values,
            children,
            solids,
            save: SaveFlags::all(),
            definition,
            line: tokens[start].line,
        };

        Ok((block, end - start + 1))
    }

    pub fn classname(&self) -> Option<&str> {
        self.key_values.value("classname")
    }
}

/// Index of the brace closing the one at `tokens[start]`.
fn matching_close(tokens: &[SpannedToken], start: usize) -> Result<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(start) {
        match t.token {
            Token::Open => depth += 1,
            Token::Close => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::UnbalancedBraces {
        line: tokens.get(start).map_or(0, |t| t.line),
    })
}

/// Parse the solid literal opening at `tokens[start]`.
fn parse_solid(tokens: &[SpannedToken], start: usize) -> Result<(Solid, usize)> {
    let end = matching_close(tokens, start)?;
    let mut cursor = Cursor {
        tokens: &tokens[start + 1..end],
        pos: 0,
    };

    let mut sides = Vec::new();
    while !cursor.is_empty() {
        sides.push(parse_side(&mut cursor)?);
    }

    Ok((Solid::new(sides), end - start + 1))
}

/// One side line, in either standard or valve 220 format.
fn parse_side(cursor: &mut Cursor) -> Result<Side> {
    let line = cursor.line();
    let points = [cursor.point()?, cursor.point()?, cursor.point()?];
    let texture = cursor.texture()?;

    let mut side = if cursor.peek_word("[") {
        let (basis_s, offset_s) = cursor.axis()?;
        let (basis_t, offset_t) = cursor.axis()?;
        let rotation = cursor.number()?;
        let scale = Vector2::new(cursor.number()?, cursor.number()?);

        Side::new(
            points,
            texture,
            TextureProjection::valve(
                basis_s,
                basis_t,
                Vector2::new(offset_s, offset_t),
                rotation,
                scale,
            ),
        )
    } else {
        let offset = Vector2::new(cursor.number()?, cursor.number()?);
        let rotation = cursor.number()?;
        let scale = Vector2::new(cursor.number()?, cursor.number()?);

        let plane = Plane::from_points(&points[0], &points[1], &points[2], Side::WINDING);
        Side::new(
            points,
            texture,
            TextureProjection::standard(&plane.normal, offset, rotation, scale),
        )
    };

    while let Some(word) = cursor.word_on_line(line) {
        side.extra.push(word);
    }

    Ok(side)
}

/// Walks the tokens of a solid literal.
struct Cursor<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn line(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |t| t.line)
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a SpannedToken> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(ParseError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn peek_word(&self, word: &str) -> bool {
        self.tokens
            .get(self.pos)
            .map_or(false, |t| t.token.is_word(word))
    }

    fn expect_word(&mut self, word: &'static str) -> Result<()> {
        let token = self.next(word)?;
        if token.token.is_word(word) {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                line: token.line,
                found: token.token.to_string(),
                expected: word,
            })
        }
    }

    fn number(&mut self) -> Result<f64> {
        let token = self.next("a number")?;
        match &token.token {
            Token::Word(w) => w.parse().map_err(|_| ParseError::InvalidNumber {
                line: token.line,
                value: w.clone(),
            }),
            other => Err(ParseError::UnexpectedToken {
                line: token.line,
                found: other.to_string(),
                expected: "a number",
            }),
        }
    }

    /// `( x y z )`
    fn point(&mut self) -> Result<Vector3> {
        self.expect_word("(")?;
        let point = Vector3::new(self.number()?, self.number()?, self.number()?);
        self.expect_word(")")?;
        Ok(point)
    }

    /// `[ x y z offset ]`
    fn axis(&mut self) -> Result<(Vector3, f64)> {
        self.expect_word("[")?;
        let axis = Vector3::new(self.number()?, self.number()?, self.number()?);
        let offset = self.number()?;
        self.expect_word("]")?;
        Ok((axis, offset))
    }

    fn texture(&mut self) -> Result<String> {
        let token = self.next("a texture name")?;
        match &token.token {
            Token::Word(w) | Token::Quoted(w) => Ok(w.clone()),
            other => Err(ParseError::UnexpectedToken {
                line: token.line,
                found: other.to_string(),
                expected: "a texture name",
            }),
        }
    }

    /// The next word, if it's still on `line`.
    fn word_on_line(&mut self, line: usize) -> Option<String> {
        match self.tokens.get(self.pos) {
            Some(SpannedToken {
                token: Token::Word(w),
                line: l,
            }) if *l == line && w != "(" => {
                self.pos += 1;
                Some(w.clone())
            }
            _ => None,
        }
    }
}
