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

//! Writing blocks back out as map text

use crate::block::{Block, SaveFlags};
use crate::entity::MapObject;
use crate::geometry::{Side, Solid, TextureFormat};
use crate::keyvalues::{KeyValue, KeyValues};
use quarry_types::Vector3;
use std::fmt::{self, Write};

impl Block {
    /// The block that would produce `object` when parsed.
    /// Only authored key/values are kept, so definition defaults don't leak into the output.
    pub fn from_map_object(object: &MapObject, save: SaveFlags) -> Block {
        let mut key_values = KeyValues::new();
        for (key, kv) in object.key_values.authored() {
            key_values.insert(key, kv.clone());
        }

        Block {
            kind: Default::default(),
            key_values,
            children: object
                .children
                .iter()
                .map(|child| Block::from_map_object(child, save))
                .collect(),
            solids: object.solids.clone(),
            save,
            definition: object.definition.clone(),
            line: 0,
        }
    }

    /// Write this block, and whatever of its contents its save flags allow.
    pub fn write<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "{{")?;

        if self.save.contains(SaveFlags::ENTITY) {
            for (key, KeyValue { value, .. }) in self.key_values.iter() {
                writeln!(out, "\"{}\" \"{}\"", key, value)?;
            }
        }

        if self.save.contains(SaveFlags::SOLIDS) {
            for solid in &self.solids {
                write_solid(out, solid)?;
            }
        }

        if self.save.contains(SaveFlags::CHILDREN) {
            for child in &self.children {
                child.write(out)?;
            }
        }

        writeln!(out, "}}")
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String can't fail
        let _ = self.write(&mut out);
        out
    }
}

fn write_solid<W: Write>(out: &mut W, solid: &Solid) -> fmt::Result {
    writeln!(out, "{{")?;
    for side in &solid.sides {
        write_side(out, side)?;
        writeln!(out)?;
    }
    writeln!(out, "}}")
}

/// One side line, in the format it was read in.
pub fn write_side<W: Write>(out: &mut W, side: &Side) -> fmt::Result {
    for point in side.points.iter() {
        write!(out, "{} ", Point(point))?;
    }
    if needs_quotes(&side.texture) {
        write!(out, "\"{}\"", side.texture)?;
    } else {
        write!(out, "{}", side.texture)?;
    }

    let p = &side.projection;
    match p.format {
        TextureFormat::Valve220 => write!(
            out,
            " [ {} {} ] [ {} {} ] {} {} {}",
            Axis(&p.basis_s),
            Num(p.offset.x),
            Axis(&p.basis_t),
            Num(p.offset.y),
            Num(p.rotation),
            Num(p.scale.x),
            Num(p.scale.y)
        )?,
        TextureFormat::Standard => write!(
            out,
            " {} {} {} {} {}",
            Num(p.offset.x),
            Num(p.offset.y),
            Num(p.rotation),
            Num(p.scale.x),
            Num(p.scale.y)
        )?,
    }

    for word in &side.extra {
        write!(out, " {}", word)?;
    }

    Ok(())
}

/// Texture names that wouldn't read back as a single word.
fn needs_quotes(texture: &str) -> bool {
    texture.is_empty()
        || texture.chars().any(char::is_whitespace)
        || texture == "{"
        || texture == "}"
        || texture.starts_with("//")
}

/// The shortest decimal that reads back as the same float, with `-0` written as `0`.
pub(crate) struct Num(pub(crate) f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

struct Axis<'a>(&'a Vector3);

impl fmt::Display for Axis<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", Num(self.0.x), Num(self.0.y), Num(self.0.z))
    }
}

/// `( x y z )`
struct Point<'a>(&'a Vector3);

impl fmt::Display for Point<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "( {} )", Axis(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_short() {
        assert_eq!(Num(64.0).to_string(), "64");
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(0.25).to_string(), "0.25");
        assert_eq!(Num(-1.5).to_string(), "-1.5");
    }

    #[test]
    fn odd_texture_names_are_quoted() {
        assert!(needs_quotes("my tex"));
        assert!(needs_quotes(""));
        assert!(needs_quotes("}"));
        assert!(!needs_quotes("{vinehang2b"));
        assert!(!needs_quotes("*water1"));
    }

    #[test]
    fn flags_filter_output() {
        let mut block = Block {
            kind: Default::default(),
            key_values: KeyValues::new(),
            children: vec![],
            solids: vec![Solid::default()],
            save: SaveFlags::ENTITY,
            definition: None,
            line: 0,
        };
        block
            .key_values
            .insert("classname", KeyValue::authored("worldspawn", None));

        assert_eq!(block.to_text(), "{\n\"classname\" \"worldspawn\"\n}\n");

        block.save = SaveFlags::SOLIDS;
        assert_eq!(block.to_text(), "{\n{\n}\n}\n");
    }
}
