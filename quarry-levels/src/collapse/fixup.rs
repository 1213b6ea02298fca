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

//! Renaming and substitution inside instance contents

use crate::entity::MapObject;

/// Keys holding an entity's own name, or a reference to another's.
pub const NAME_KEYS: &[&str] = &["targetname", "target", "killtarget", "parentname"];

/// How an instance's fixup name is combined with the names inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixupStyle {
    Prefix,
    Postfix,
    None,
}

impl FixupStyle {
    /// From the value of a `fixup_style` key. Anything unrecognised is a prefix.
    pub fn from_key(value: Option<&str>) -> FixupStyle {
        match value.map(str::trim) {
            Some("1") => FixupStyle::Postfix,
            Some("2") => FixupStyle::None,
            _ => FixupStyle::Prefix,
        }
    }
}

/// Rename an entity's names and name references.
/// Names starting with `@` are global and left alone, as are empty values.
pub fn fixup_names(object: &mut MapObject, fixup: &str, style: FixupStyle) {
    if style == FixupStyle::None {
        return;
    }

    for key in NAME_KEYS {
        let renamed = match object.get(key) {
            Some(name) if !name.is_empty() && !name.starts_with('@') => match style {
                FixupStyle::Prefix => format!("{}{}", fixup, name),
                FixupStyle::Postfix => format!("{}{}", name, fixup),
                FixupStyle::None => continue,
            },
            _ => continue,
        };

        object.set(key, renamed);
    }
}

/// The `$variable value` pairs from an instance's `replaceNN` keys, longest variable first.
pub fn variables(instance: &MapObject) -> Vec<(String, String)> {
    let mut out: Vec<_> = numbered(instance, "replace")
        .filter_map(|value| {
            let (var, with) = split_pair(value)?;
            if var.starts_with('$') {
                Some((var.to_owned(), with.to_owned()))
            } else {
                None
            }
        })
        .collect();

    out.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    out
}

/// The `old new` pairs from an instance's `texreplaceNN` keys.
pub fn texture_replacements(instance: &MapObject) -> Vec<(String, String)> {
    numbered(instance, "texreplace")
        .filter_map(split_pair)
        .map(|(old, new)| (old.to_owned(), new.to_owned()))
        .collect()
}

/// Substitute variables in every one of an entity's values.
pub fn replace_variables(object: &mut MapObject, variables: &[(String, String)]) {
    if variables.is_empty() {
        return;
    }

    for (_, kv) in object.key_values.iter_mut() {
        if !kv.value.contains('$') {
            continue;
        }

        let mut value = kv.value.clone();
        for (var, with) in variables {
            value = value.replace(var.as_str(), with);
        }
        if value != kv.value {
            kv.value = value;
            kv.authored = true;
        }
    }
}

/// Swap texture names on an entity's sides and polygons. Names match case-insensitively.
pub fn replace_textures(object: &mut MapObject, replacements: &[(String, String)]) {
    let lookup = |name: &str| {
        replacements
            .iter()
            .find(|(old, _)| old.eq_ignore_ascii_case(name))
            .map(|(_, new)| new.clone())
    };

    for side in object.solids.iter_mut().flat_map(|s| s.sides.iter_mut()) {
        if let Some(new) = lookup(&side.texture) {
            side.texture = new;
        }
    }

    for polygon in object.renderables.iter_mut().flat_map(|r| r.polygons.iter_mut()) {
        if let Some(new) = lookup(&polygon.texture) {
            polygon.texture = new;
        }
    }
}

/// Values of keys named `prefix` followed by digits.
fn numbered<'a>(instance: &'a MapObject, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    instance.key_values.iter().filter_map(move |(key, kv)| {
        let number = key.strip_prefix(prefix)?;
        if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
            Some(kv.value.as_str())
        } else {
            None
        }
    })
}

/// `first rest of the value`
fn split_pair(value: &str) -> Option<(&str, &str)> {
    let value = value.trim();
    let split = value.find(char::is_whitespace)?;
    Some((&value[..split], value[split..].trim_start()))
}
