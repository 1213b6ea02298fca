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

//! Finding the maps instances refer to

use crate::definitions::DefinitionDictionary;
use crate::error::{CollapseError, ParseError};
use crate::map::{LoadOptions, Map};
use crate::textures::TextureResolver;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// An object that can be used to get the map an instance's `file` key names.
pub trait MapResolver {
    fn resolve(&mut self, file: &str) -> Result<Map, CollapseError>;
}

/// Resolves nothing. Any instance with a `file` key is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMaps;

impl MapResolver for NoMaps {
    fn resolve(&mut self, file: &str) -> Result<Map, CollapseError> {
        Err(CollapseError::MissingMap {
            file: file.to_owned(),
        })
    }
}

/// Serves maps added to it, by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryMapResolver {
    maps: HashMap<String, Map>,
}

impl MemoryMapResolver {
    pub fn new() -> MemoryMapResolver {
        MemoryMapResolver::default()
    }

    pub fn insert(&mut self, file: impl Into<String>, map: Map) {
        self.maps.insert(normalize(&file.into()), map);
    }
}

impl MapResolver for MemoryMapResolver {
    fn resolve(&mut self, file: &str) -> Result<Map, CollapseError> {
        self.maps
            .get(&normalize(file))
            .cloned()
            .ok_or_else(|| CollapseError::MissingMap {
                file: file.to_owned(),
            })
    }
}

/// Reads and parses map files relative to a directory.
#[derive(Debug)]
pub struct FsMapResolver<T: TextureResolver> {
    root: PathBuf,
    definitions: Arc<DefinitionDictionary>,
    textures: T,
    options: LoadOptions,
}

impl<T: TextureResolver> FsMapResolver<T> {
    pub fn new(
        root: impl Into<PathBuf>,
        definitions: Arc<DefinitionDictionary>,
        textures: T,
        options: LoadOptions,
    ) -> FsMapResolver<T> {
        FsMapResolver {
            root: root.into(),
            definitions,
            textures,
            options,
        }
    }
}

impl<T: TextureResolver> MapResolver for FsMapResolver<T> {
    fn resolve(&mut self, file: &str) -> Result<Map, CollapseError> {
        let path = self.root.join(normalize(file));
        debug!("Loading instance map {:?}", path);

        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CollapseError::MissingMap {
                file: file.to_owned(),
            },
            _ => CollapseError::Io {
                file: file.to_owned(),
                source: e,
            },
        })?;

        Map::parse_with(
            &text,
            self.definitions.clone(),
            &mut self.textures,
            &self.options,
        )
        .map_err(|source: ParseError| CollapseError::Parse {
            file: file.to_owned(),
            source,
        })
    }
}

/// Instance paths are written with either slash.
pub fn normalize(file: &str) -> String {
    file.trim().replace('\\', "/")
}
