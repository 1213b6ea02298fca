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

//! Parsing, brush reconstruction and instance collapsing for Quake MAP files.
//!
//! A map is read in three stages: [`tokenizer`] splits the text, [`block`] recovers
//! the brace structure and key/values, and [`entity`] turns blocks into
//! [`MapObject`]s with reconstructed [`renderable`] geometry.
//! [`collapse`] flattens instances and [`serialize`] writes maps back out.

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate derive_builder;

pub mod block;
pub mod collapse;
pub mod definitions;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod keyvalues;
pub mod map;
pub mod renderable;
pub mod serialize;
pub mod textures;
pub mod tokenizer;

pub use block::{Block, BlockKind, SaveFlags};
pub use collapse::{
    CollapseOptions, CollapseOptionsBuilder, Collapser, FsMapResolver, InstanceTransform,
    MapResolver, MemoryMapResolver, NoMaps,
};
pub use definitions::{ClassType, Definition, DefinitionDictionary, OptionTemplate, ValueKind};
pub use entity::MapObject;
pub use error::{CollapseError, ParseError, Result};
pub use map::{LoadOptions, LoadOptionsBuilder, Map};
pub use textures::{FsResolver, LoadableImage, NoTextures, TextureResolver};
