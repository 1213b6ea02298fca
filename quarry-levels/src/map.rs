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

//! A whole map file

use crate::block::{Block, BlockKind, SaveFlags};
use crate::definitions::DefinitionDictionary;
use crate::entity::MapObject;
use crate::error::Result;
use crate::geometry::EPSILON;
use crate::textures::TextureResolver;
use crate::tokenizer::tokenize;
use log::debug;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Options for reading maps.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(setter(into), default)]
pub struct LoadOptions {
    /// How to interpret blocks.
    pub block_kind: BlockKind,

    /// Distance within which a point counts as lying on a plane.
    pub epsilon: f64,

    /// Size used for textures that can't be found.
    pub placeholder_size: (u32, u32),
}

impl Default for LoadOptions {
    fn default() -> LoadOptions {
        LoadOptions {
            block_kind: BlockKind::Quake,
            epsilon: EPSILON,
            placeholder_size: (64, 64),
        }
    }
}

/// A parsed map: its entities, and the definitions they were resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Top-level entities. Worldspawn is first by convention.
    pub objects: Vec<MapObject>,
    pub definitions: Arc<DefinitionDictionary>,
}

impl Map {
    /// Parse `text` with the default options.
    pub fn parse<R: TextureResolver>(
        text: &str,
        definitions: Arc<DefinitionDictionary>,
        textures: &mut R,
    ) -> Result<Map> {
        Map::parse_with(text, definitions, textures, &LoadOptions::default())
    }

    /// Parse `text` as a map file.
    pub fn parse_with<R: TextureResolver>(
        text: &str,
        definitions: Arc<DefinitionDictionary>,
        textures: &mut R,
        options: &LoadOptions,
    ) -> Result<Map> {
        let tokens = tokenize(text)?;
        let blocks = Block::parse_all(&tokens, options.block_kind, &definitions)?;
        debug!("Parsed {} tokens into {} blocks", tokens.len(), blocks.len());

        let objects = blocks
            .iter()
            .map(|block| MapObject::from_block(block, textures, options))
            .collect();

        Ok(Map {
            objects,
            definitions,
        })
    }

    /// Read and parse the map at `path`.
    pub fn load<P: AsRef<Path>, R: TextureResolver>(
        path: P,
        definitions: Arc<DefinitionDictionary>,
        textures: &mut R,
        options: &LoadOptions,
    ) -> Result<Map> {
        let text = fs::read_to_string(path)?;
        Map::parse_with(&text, definitions, textures, options)
    }

    pub fn worldspawn(&self) -> Option<&MapObject> {
        self.objects.iter().find(|o| o.is_worldspawn())
    }

    /// Number of entities, nested ones included.
    pub fn entity_count(&self) -> usize {
        self.objects.iter().map(MapObject::count).sum()
    }

    /// Every entity, depth first.
    pub fn iter_objects(&self) -> Objects<'_> {
        Objects {
            stack: self.objects.iter().rev().collect(),
        }
    }

    /// The first entity (at any depth) with the given targetname.
    pub fn find_by_targetname(&self, name: &str) -> Option<&MapObject> {
        self.iter_objects().find(|o| o.targetname() == Some(name))
    }

    /// Write the map back out as text.
    pub fn serialize(&self, save: SaveFlags) -> String {
        let mut out = String::new();
        for object in &self.objects {
            out.push_str(&Block::from_map_object(object, save).to_text());
        }
        out
    }
}

/// Depth first iterator over a map's entities.
#[derive(Debug, Clone)]
pub struct Objects<'a> {
    stack: Vec<&'a MapObject>,
}

impl<'a> Iterator for Objects<'a> {
    type Item = &'a MapObject;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
