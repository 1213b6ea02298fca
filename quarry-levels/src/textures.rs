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

//! Looking up texture sizes by name
//!
//! Texture loading lives outside this crate. All the face generator needs is
//! each texture's size in pixels, for turning projections into coordinates.

use image::RgbaImage;
use log::warn;
use std::collections::HashMap;
use std::path::PathBuf;

/// File extensions [`FsResolver`] tries, in order.
const EXTENSIONS: &[&str] = &["png", "tga", "jpg", "jpeg", "bmp"];

/// Anything with a size in pixels.
pub trait LoadableImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

impl LoadableImage for RgbaImage {
    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }
}

/// The dimensions of a texture, without its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl LoadableImage for TextureSize {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// An object that can be used to resolve a texture by name
pub trait TextureResolver {
    type Image: LoadableImage;

    /// Get the given texture, or None if it's corrupt/not there.
    fn resolve(&mut self, name: &str) -> Option<Self::Image>;
}

/// Resolves nothing. Every face gets the placeholder size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextures;

impl TextureResolver for NoTextures {
    type Image = TextureSize;

    fn resolve(&mut self, _name: &str) -> Option<TextureSize> {
        None
    }
}

impl<I: LoadableImage + Clone> TextureResolver for HashMap<String, I> {
    type Image = I;

    fn resolve(&mut self, name: &str) -> Option<I> {
        self.get(name).cloned()
    }
}

/// Reads texture sizes from image files in a directory, `<root>/<name>.<ext>`.
#[derive(Debug, Clone)]
pub struct FsResolver {
    root: PathBuf,
    cache: HashMap<String, Option<TextureSize>>,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> FsResolver {
        FsResolver {
            root: root.into(),
            cache: HashMap::new(),
        }
    }
}

impl TextureResolver for FsResolver {
    type Image = TextureSize;

    fn resolve(&mut self, name: &str) -> Option<TextureSize> {
        if let Some(hit) = self.cache.get(name) {
            return *hit;
        }

        let found = EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
            .and_then(|path| match image::image_dimensions(&path) {
                Ok((width, height)) => Some(TextureSize { width, height }),
                Err(e) => {
                    warn!("Couldn't read texture {:?}: {}", path, e);
                    None
                }
            });

        self.cache.insert(name.to_owned(), found);
        found
    }
}
