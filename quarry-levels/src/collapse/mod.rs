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

//! Flattening instances into a single map
//!
//! Every instance entity is replaced by its contents (its children, plus the
//! map its `file` key names), renamed and moved into place. Nested instances
//! are collapsed first, so the outer instance's fixups and transform apply on
//! top of the inner ones. Everything else is flattened into the top level.

pub mod fixup;
pub mod resolver;
pub mod transform;

pub use self::resolver::{FsMapResolver, MapResolver, MemoryMapResolver, NoMaps};
pub use self::transform::InstanceTransform;

use self::fixup::FixupStyle;
use crate::entity::MapObject;
use crate::error::CollapseError;
use crate::map::Map;
use log::{debug, info};

/// `$variable value` pairs from one instance's `replaceNN` keys.
type Variables = Vec<(String, String)>;

/// Options for collapsing instances.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(setter(into), default)]
pub struct CollapseOptions {
    /// The number used for the first automatic fixup name.
    pub first_auto_id: u32,

    /// Automatic fixup names are this followed by a number.
    pub auto_prefix: String,

    /// Move the geometry of worldspawns from instance files into the first worldspawn.
    pub merge_worldspawn: bool,
}

impl Default for CollapseOptions {
    fn default() -> CollapseOptions {
        CollapseOptions {
            first_auto_id: 1,
            auto_prefix: "AutoInstance".to_string(),
            merge_worldspawn: true,
        }
    }
}

/// Collapses instances, loading referenced maps through `resolver`.
pub struct Collapser<'r, R: MapResolver> {
    resolver: &'r mut R,
    options: CollapseOptions,
    next_auto_id: u32,
    /// Files currently being expanded, outermost first.
    stack: Vec<String>,
    instances: usize,
}

impl<'r, R: MapResolver> Collapser<'r, R> {
    pub fn new(resolver: &'r mut R, options: CollapseOptions) -> Collapser<'r, R> {
        Collapser {
            resolver,
            next_auto_id: options.first_auto_id,
            options,
            stack: Vec::new(),
            instances: 0,
        }
    }

    /// Collapse `map` into a new map with no instances.
    pub fn collapse(&mut self, map: &Map) -> Result<Map, CollapseError> {
        self.run(map, Vec::new())
    }

    /// Collapse `map`, which was loaded from `name`. Instances that lead back to it are cycles.
    pub fn collapse_named(&mut self, map: &Map, name: &str) -> Result<Map, CollapseError> {
        self.run(map, vec![resolver::normalize(name)])
    }

    fn run(&mut self, map: &Map, stack: Vec<String>) -> Result<Map, CollapseError> {
        self.next_auto_id = self.options.first_auto_id;
        self.instances = 0;
        self.stack = stack;

        let mut objects = Vec::new();
        let flattened = map
            .objects
            .iter()
            .try_for_each(|object| self.flatten(object, &mut objects, &[]));
        self.stack.clear();
        flattened?;

        if self.options.merge_worldspawn {
            objects = merge_worldspawns(objects);
        }

        info!(
            "Collapsed {} instances: {} entities became {}",
            self.instances,
            map.entity_count(),
            objects.len()
        );

        Ok(Map {
            objects,
            definitions: map.definitions.clone(),
        })
    }

    /// Push `object`, and everything under it, onto `out` with instances expanded.
    /// `scopes` holds the variables of the instances `object` is inside, outermost first.
    fn flatten(
        &mut self,
        object: &MapObject,
        out: &mut Vec<MapObject>,
        scopes: &[Variables],
    ) -> Result<(), CollapseError> {
        if !object.is_instance() {
            out.push(object.without_children());
            for child in &object.children {
                self.flatten(child, out, scopes)?;
            }
            return Ok(());
        }

        // Enclosing variables reach this instance's own keys before it is expanded
        let mut instance = object.without_children();
        for variables in scopes.iter().rev() {
            fixup::replace_variables(&mut instance, variables);
        }

        let mut inner_scopes = scopes.to_vec();
        inner_scopes.push(fixup::variables(&instance));

        let mut contents = Vec::new();
        for child in &object.children {
            self.flatten(child, &mut contents, &inner_scopes)?;
        }

        if let Some(file) = instance.get("file").filter(|f| !f.trim().is_empty()) {
            let map = self.resolve(file)?;
            for inner in &map.objects {
                self.flatten(inner, &mut contents, &inner_scopes)?;
            }
            self.stack.pop();
        }

        self.place(&instance, &mut contents);
        self.instances += 1;
        debug!(
            "Instance {} expanded to {} entities",
            instance.targetname().unwrap_or("(unnamed)"),
            contents.len()
        );

        out.extend(contents);
        Ok(())
    }

    /// Load `file` and push it onto the stack. The caller pops it once done.
    fn resolve(&mut self, file: &str) -> Result<Map, CollapseError> {
        let name = resolver::normalize(file);
        if self.stack.contains(&name) {
            let mut chain = self.stack.clone();
            chain.push(name);
            return Err(CollapseError::Cycle { chain });
        }

        let map = self.resolver.resolve(file)?;
        self.stack.push(name);
        Ok(map)
    }

    /// Apply an instance's replacements, fixups and transform to its contents.
    fn place(&mut self, instance: &MapObject, contents: &mut [MapObject]) {
        let variables = fixup::variables(instance);
        let textures = fixup::texture_replacements(instance);
        let style = FixupStyle::from_key(instance.get("fixup_style"));
        let transform = InstanceTransform::from_object(instance);

        let fixup_name = match instance.get("fixup_name").filter(|n| !n.is_empty()) {
            Some(name) => name.to_owned(),
            None if style != FixupStyle::None => {
                let name = format!("{}{}", self.options.auto_prefix, self.next_auto_id);
                self.next_auto_id += 1;
                name
            }
            None => String::new(),
        };

        for object in contents.iter_mut() {
            fixup::replace_variables(object, &variables);
            fixup::replace_textures(object, &textures);
            fixup::fixup_names(object, &fixup_name, style);
            transform.apply(object);
        }
    }
}

impl Map {
    /// Collapse every instance with the default options.
    pub fn collapse<R: MapResolver>(&self, resolver: &mut R) -> Result<Map, CollapseError> {
        Collapser::new(resolver, CollapseOptions::default()).collapse(self)
    }
}

/// Move the geometry of every worldspawn after the first into the first.
fn merge_worldspawns(objects: Vec<MapObject>) -> Vec<MapObject> {
    let mut out: Vec<MapObject> = Vec::with_capacity(objects.len());
    let mut world: Option<usize> = None;

    for object in objects {
        if !object.is_worldspawn() {
            out.push(object);
            continue;
        }

        match world {
            Some(i) => {
                let target = &mut out[i];
                target.solids.extend(object.solids);
                target.renderables.extend(object.renderables);
                target.update_position();
            }
            None => {
                world = Some(out.len());
                out.push(object);
            }
        }
    }

    out
}
