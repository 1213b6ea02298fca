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

#![allow(dead_code, unused_macros)]

use quarry_levels::{
    ClassType, Definition, DefinitionDictionary, Map, NoTextures, OptionTemplate, ValueKind,
};
use quarry_types::Rgba;
use std::sync::Arc;

macro_rules! map(
    { $($key:expr => $value:expr),* } => {
        {
            let mut m = ::std::collections::HashMap::new();
            $(
                m.insert($key, $value);
            )*
            m
        }
    };
);

/// A box brush in valve 220 format, from `min` to `max`.
pub fn box_brush(min: [i32; 3], max: [i32; 3], texture: &str) -> String {
    let [x1, y1, z1] = min;
    let [x2, y2, z2] = max;
    format!(
        "{{
( {x1} {y1} {z1} ) ( {x1} {y1p} {z1} ) ( {x1} {y1} {z1p} ) {t} [ 0 -1 0 0 ] [ 0 0 -1 0 ] 0 1 1
( {x1} {y1} {z1} ) ( {x1} {y1} {z1p} ) ( {x1p} {y1} {z1} ) {t} [ 1 0 0 0 ] [ 0 0 -1 0 ] 0 1 1
( {x1} {y1} {z1} ) ( {x1p} {y1} {z1} ) ( {x1} {y1p} {z1} ) {t} [ -1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1
( {x2} {y2} {z2} ) ( {x2} {y2p} {z2} ) ( {x2p} {y2} {z2} ) {t} [ 1 0 0 0 ] [ 0 -1 0 0 ] 0 1 1
( {x2} {y2} {z2} ) ( {x2p} {y2} {z2} ) ( {x2} {y2} {z2p} ) {t} [ -1 0 0 0 ] [ 0 0 -1 0 ] 0 1 1
( {x2} {y2} {z2} ) ( {x2} {y2} {z2p} ) ( {x2} {y2p} {z2} ) {t} [ 0 1 0 0 ] [ 0 0 -1 0 ] 0 1 1
}}
",
        x1 = x1,
        y1 = y1,
        z1 = z1,
        x1p = x1 + 1,
        y1p = y1 + 1,
        z1p = z1 + 1,
        x2 = x2,
        y2 = y2,
        z2 = z2,
        x2p = x2 + 1,
        y2p = y2 + 1,
        z2p = z2 + 1,
        t = texture
    )
}

/// The same box, with standard quake texture projections.
pub fn standard_box_brush(min: [i32; 3], max: [i32; 3], texture: &str) -> String {
    box_brush(min, max, texture)
        .lines()
        .map(|line| match line.find(" [") {
            Some(i) => format!("{} 0 0 0 1 1\n", &line[..i]),
            None => format!("{}\n", line),
        })
        .collect()
}

/// An entity block with the given key/values and brushes.
pub fn entity(pairs: &[(&str, &str)], brushes: &[String]) -> String {
    let mut out = String::from("{\n");
    for (k, v) in pairs {
        out.push_str(&format!("\"{}\" \"{}\"\n", k, v));
    }
    for brush in brushes {
        out.push_str(brush);
    }
    out.push_str("}\n");
    out
}

pub fn definitions() -> Arc<DefinitionDictionary> {
    let mut defs = quarry_levels::definitions::standard_definitions();
    defs.push(
        Definition::new("targetable", ClassType::Base)
            .with_key("targetname", OptionTemplate::new(ValueKind::TargetSource, None))
            .with_key("target", OptionTemplate::new(ValueKind::TargetDestination, None)),
    );
    defs.push(
        Definition::new("light", ClassType::Point)
            .with_base("targetable")
            .with_key("light", OptionTemplate::new(ValueKind::Integer, Some("300")))
            .with_colour(Rgba::from_bytes([255, 255, 0, 255])),
    );
    defs.push(
        Definition::new("func_door", ClassType::Solid)
            .with_base("targetable")
            .with_key("speed", OptionTemplate::new(ValueKind::Integer, Some("100")))
            .with_colour(Rgba::from_bytes([0, 128, 255, 255])),
    );
    defs.push(Definition::new("info_null", ClassType::Point).with_base("targetable"));

    Arc::new(DefinitionDictionary::new(defs))
}

pub fn parse(text: &str) -> Map {
    Map::parse(text, definitions(), &mut NoTextures).unwrap()
}
