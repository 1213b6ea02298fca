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

//! Entities, with their geometry rebuilt and definitions resolved

use crate::block::Block;
use crate::definitions::Definition;
use crate::geometry::Solid;
use crate::keyvalues::{KeyValue, KeyValues};
use crate::map::LoadOptions;
use crate::renderable::Renderable;
use crate::textures::TextureResolver;
use log::warn;
use quarry_types::{Aabb, Rgba, Vector3};
use std::sync::Arc;

/// A map entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub classname: Option<String>,

    /// Values from the file, plus defaults from the definition.
    pub key_values: KeyValues,

    /// None if the classname is missing or unknown.
    pub definition: Option<Arc<Definition>>,

    /// Nested entities, e.g. the contents of an instance.
    pub children: Vec<MapObject>,

    /// Kept for writing the entity back out.
    pub solids: Vec<Solid>,

    /// One per solid. Always empty for point entities.
    pub renderables: Vec<Renderable>,

    /// World position: `origin` for point entities, the centre of the geometry otherwise.
    pub position: Vector3,
}

impl MapObject {
    /// Build an entity (and its children) from a parsed block.
    pub fn from_block<R: TextureResolver>(
        block: &Block,
        textures: &mut R,
        options: &LoadOptions,
    ) -> MapObject {
        let classname = block.classname().map(str::to_owned);
        match (&classname, &block.definition) {
            (Some(classname), None) => {
                warn!("Unknown classname {} on line {}", classname, block.line)
            }
            (None, _) if block.line > 0 => warn!("Entity on line {} has no classname", block.line),
            _ => {}
        }

        let mut key_values = block.key_values.clone();
        if let Some(definition) = &block.definition {
            let mut defaults: Vec<_> = definition.key_vals_template.iter().collect();
            defaults.sort_by(|a, b| a.0.cmp(b.0));

            for (key, template) in defaults {
                if key_values.contains_key(key) {
                    continue;
                }
                if let Some(kv) = KeyValue::from_default(template) {
                    key_values.insert(key.clone(), kv);
                }
            }
        }

        let colour = block
            .definition
            .as_ref()
            .and_then(|d| d.colour)
            .unwrap_or_else(Rgba::white);
        let renderables = block
            .solids
            .iter()
            .map(|solid| Renderable::from_solid(solid, colour, textures, options))
            .collect();

        let children = block
            .children
            .iter()
            .map(|child| MapObject::from_block(child, textures, options))
            .collect();

        let mut object = MapObject {
            classname,
            key_values,
            definition: block.definition.clone(),
            children,
            solids: block.solids.clone(),
            renderables,
            position: Vector3::zeros(),
        };
        object.update_position();
        object
    }

    /// The current value of `key`, including definition defaults.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values.value(key)
    }

    /// Parse `key` as three whitespace separated numbers.
    pub fn get_vector(&self, key: &str) -> Option<Vector3> {
        parse_vector(self.get(key)?)
    }

    /// Set `key`, as if it had been written in the file.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if !self.key_values.contains_key(key) {
            let template = self.definition.as_ref().and_then(|d| d.template(key));
            self.key_values.insert(key, KeyValue::authored(value, template));
        } else {
            self.key_values.set_value(key, value);
        }
    }

    pub fn targetname(&self) -> Option<&str> {
        self.get("targetname")
    }

    pub fn is_instance(&self) -> bool {
        self.definition.as_ref().map_or(false, |d| d.is_instance())
    }

    pub fn is_brush_entity(&self) -> bool {
        !self.solids.is_empty()
    }

    pub fn is_worldspawn(&self) -> bool {
        self.classname.as_deref() == Some(crate::definitions::WORLDSPAWN)
    }

    /// Bounds of all this entity's geometry. Empty for point entities.
    pub fn bounds(&self) -> Aabb {
        self.renderables
            .iter()
            .fold(Aabb::empty(), |acc, r| acc + r.bounds())
    }

    /// Recompute `position` from geometry, or from `origin` if there isn't any.
    pub fn update_position(&mut self) {
        let bounds = self.bounds();
        self.position = if !bounds.is_empty() {
            bounds.center()
        } else {
            self.get_vector("origin").unwrap_or_else(Vector3::zeros)
        };
    }

    /// This entity and all its descendants.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(MapObject::count).sum::<usize>()
    }

    /// A copy of this entity without its children.
    pub fn without_children(&self) -> MapObject {
        MapObject {
            classname: self.classname.clone(),
            key_values: self.key_values.clone(),
            definition: self.definition.clone(),
            children: Vec::new(),
            solids: self.solids.clone(),
            renderables: self.renderables.clone(),
            position: self.position,
        }
    }
}

/// Parse `x y z`. None unless there are exactly three finite numbers.
pub fn parse_vector(value: &str) -> Option<Vector3> {
    let mut parts = value.split_whitespace().map(|p| p.parse::<f64>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() || !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return None;
    }

    Some(Vector3::new(x, y, z))
}
