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

//! Colours attached to vertices and entity classes.

use serde::{Deserialize, Serialize};
use std::convert::TryInto;

/// RGBA Colour (0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// 255, 255, 255, 255
    pub fn white() -> Rgba {
        Rgba::from_bytes([255, 255, 255, 255])
    }

    /// Interpret the given bytes as an RGBA colour.
    pub fn from_bytes(bytes: [u8; 4]) -> Rgba {
        Rgba {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: bytes[3],
        }
    }

    /// Convert a slice to an RGBA colour, or None if it isn't 4 bytes long.
    pub fn from_slice(slice: &[u8]) -> Option<Rgba> {
        slice.try_into().ok().map(Rgba::from_bytes)
    }

    /// Parse a whitespace separated `r g b` triplet, as written in entity definitions.
    /// Alpha is always opaque.
    pub fn parse_triplet(value: &str) -> Option<Rgba> {
        let mut parts = value.split_whitespace().map(|p| p.parse::<u8>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Rgba { r, g, b, a: 255 })
    }
}

impl Default for Rgba {
    fn default() -> Rgba {
        Rgba::white()
    }
}
