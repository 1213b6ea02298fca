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

//! Entity class definitions, as loaded from an FGD or similar.
//!
//! Loading the definitions themselves happens elsewhere; this is the frozen,
//! read-only dictionary the parser consults to seed key/value defaults.

use log::warn;
use quarry_types::Rgba;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The classname used for instance entities by [`DefinitionDictionary::standard`].
pub const INSTANCE_CLASSNAME: &str = "func_instance";

/// The classname of the world entity.
pub const WORLDSPAWN: &str = "worldspawn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    /// Brush entities
    Solid,
    /// Point entities
    Point,
    /// Only used by other classes as a base
    Base,
}

/// What sort of value a key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Choices,
    Flags,
    TargetSource,
    TargetDestination,
    Vector,
    Colour,
}

impl Default for ValueKind {
    fn default() -> ValueKind {
        ValueKind::String
    }
}

/// The template for one key of a class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionTemplate {
    #[serde(default)]
    pub kind: ValueKind,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub description: String,
}

impl OptionTemplate {
    pub fn new(kind: ValueKind, default: Option<&str>) -> OptionTemplate {
        OptionTemplate {
            kind,
            default: default.map(str::to_owned),
            description: String::new(),
        }
    }
}

/// One entity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub classname: String,
    pub class_type: ClassType,

    #[serde(default)]
    pub description: String,

    /// Classes this one inherits keys from.
    #[serde(default)]
    pub bases: Vec<String>,

    #[serde(default)]
    pub key_vals_template: HashMap<String, OptionTemplate>,

    /// Colour used for this class's geometry.
    #[serde(default)]
    pub colour: Option<Rgba>,

    /// True if entities of this class are instances to be collapsed.
    #[serde(default)]
    pub instance: bool,
}

impl Definition {
    pub fn new(classname: impl Into<String>, class_type: ClassType) -> Definition {
        Definition {
            classname: classname.into(),
            class_type,
            description: String::new(),
            bases: Vec::new(),
            key_vals_template: HashMap::new(),
            colour: None,
            instance: false,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>, template: OptionTemplate) -> Definition {
        self.key_vals_template.insert(key.into(), template);
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Definition {
        self.bases.push(base.into());
        self
    }

    pub fn with_colour(mut self, colour: Rgba) -> Definition {
        self.colour = Some(colour);
        self
    }

    /// Mark this class as an instance.
    pub fn as_instance(mut self) -> Definition {
        self.instance = true;
        self
    }

    pub fn is_instance(&self) -> bool {
        self.instance
    }

    pub fn template(&self, key: &str) -> Option<&OptionTemplate> {
        self.key_vals_template.get(key)
    }
}

/// The definitions used to interpret a map, frozen once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionDictionary {
    definitions: HashMap<String, Arc<Definition>>,
}

impl DefinitionDictionary {
    /// Build a dictionary, resolving base classes.
    /// Keys defined on a class win over those it inherits. Later definitions
    /// replace earlier ones with the same classname.
    pub fn new<I: IntoIterator<Item = Definition>>(definitions: I) -> DefinitionDictionary {
        let raw: HashMap<String, Definition> = definitions
            .into_iter()
            .map(|d| (d.classname.clone(), d))
            .collect();

        let mut resolved = HashMap::with_capacity(raw.len());
        for name in raw.keys() {
            let mut visiting = HashSet::new();
            if let Some(def) = resolve(name, &raw, &mut visiting) {
                resolved.insert(name.clone(), Arc::new(def));
            }
        }

        DefinitionDictionary {
            definitions: resolved,
        }
    }

    /// `worldspawn` and the instance class.
    pub fn standard() -> DefinitionDictionary {
        DefinitionDictionary::new(standard_definitions())
    }

    /// Find the definition for `classname`.
    pub fn lookup(&self, classname: &str) -> Option<Arc<Definition>> {
        self.definitions.get(classname).cloned()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values().map(|d| d.as_ref())
    }
}

/// The definitions every dictionary made by [`DefinitionDictionary::standard`] has.
pub fn standard_definitions() -> Vec<Definition> {
    vec![
        Definition::new(WORLDSPAWN, ClassType::Solid),
        Definition::new(INSTANCE_CLASSNAME, ClassType::Point)
            .with_key("file", OptionTemplate::new(ValueKind::String, None))
            .with_key("fixup_name", OptionTemplate::new(ValueKind::String, None))
            .with_key(
                "fixup_style",
                OptionTemplate::new(ValueKind::Choices, Some("0")),
            )
            .with_key("origin", OptionTemplate::new(ValueKind::Vector, None))
            .with_key("angles", OptionTemplate::new(ValueKind::Vector, None))
            .as_instance(),
    ]
}

fn resolve(
    name: &str,
    raw: &HashMap<String, Definition>,
    visiting: &mut HashSet<String>,
) -> Option<Definition> {
    let def = raw.get(name)?;
    if !visiting.insert(name.to_owned()) {
        warn!("Definition {} inherits from itself", name);
        return None;
    }

    let mut out = def.clone();
    for base_name in &def.bases {
        let base = match resolve(base_name, raw, visiting) {
            Some(base) => base,
            None => {
                warn!("Definition {} has unknown base {}", name, base_name);
                continue;
            }
        };

        for (key, template) in base.key_vals_template {
            out.key_vals_template.entry(key).or_insert(template);
        }
        out.colour = out.colour.or(base.colour);
        out.instance |= base.instance;
    }

    visiting.remove(name);
    Some(out)
}
