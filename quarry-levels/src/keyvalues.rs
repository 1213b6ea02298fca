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

//! Ordered entity key/values

use crate::definitions::OptionTemplate;

/// One value of an entity, with whatever its class says about it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    /// The current value.
    pub value: String,

    /// Type and default from the entity's definition, if it has one for this key.
    pub template: Option<OptionTemplate>,

    /// False if this value only exists because of a definition default.
    /// Only authored values are written back out.
    pub authored: bool,
}

impl KeyValue {
    /// A value read from a file (or set by the user).
    pub fn authored(value: impl Into<String>, template: Option<&OptionTemplate>) -> KeyValue {
        KeyValue {
            value: value.into(),
            template: template.cloned(),
            authored: true,
        }
    }

    /// A value filled in from a definition's default.
    pub fn from_default(template: &OptionTemplate) -> Option<KeyValue> {
        template.default.as_ref().map(|default| KeyValue {
            value: default.clone(),
            template: Some(template.clone()),
            authored: false,
        })
    }
}

/// Key/values in insertion order, with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValues {
    entries: Vec<(String, KeyValue)>,
}

impl KeyValues {
    pub fn new() -> KeyValues {
        KeyValues::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&KeyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut KeyValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The current value of `key`, including defaults.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|kv| kv.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert `kv` under `key`. An existing entry is replaced where it stands.
    pub fn insert(&mut self, key: impl Into<String>, kv: KeyValue) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(existing) => *existing = kv,
            None => self.entries.push((key, kv)),
        }
    }

    /// Set the value of `key`, keeping any template it already has.
    /// The entry becomes authored.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        match self.get_mut(key) {
            Some(existing) => {
                existing.value = value.into();
                existing.authored = true;
            }
            None => self
                .entries
                .push((key.to_owned(), KeyValue::authored(value, None))),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<KeyValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut KeyValue)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Only the values that were read from a file or set explicitly.
    pub fn authored(&self) -> impl Iterator<Item = (&str, &KeyValue)> {
        self.iter().filter(|(_, v)| v.authored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_and_replacement() {
        let mut kvs = KeyValues::new();
        kvs.insert("classname", KeyValue::authored("light", None));
        kvs.insert("origin", KeyValue::authored("0 0 0", None));
        kvs.insert("classname", KeyValue::authored("light_spot", None));

        let keys: Vec<_> = kvs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["classname", "origin"]);
        assert_eq!(kvs.value("classname"), Some("light_spot"));
    }

    #[test]
    fn set_value_marks_authored() {
        let template = OptionTemplate {
            default: Some("300".into()),
            ..OptionTemplate::default()
        };
        let mut kvs = KeyValues::new();
        kvs.insert("light", KeyValue::from_default(&template).unwrap());
        assert_eq!(kvs.authored().count(), 0);

        kvs.set_value("light", "200");
        assert_eq!(kvs.authored().count(), 1);
        assert_eq!(kvs.get("light").unwrap().template, Some(template));
    }
}
