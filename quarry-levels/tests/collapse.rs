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

#[macro_use]
mod helpers;
use helpers::*;

use approx::assert_relative_eq;
use quarry_levels::{
    CollapseError, CollapseOptionsBuilder, Collapser, Map, MapObject, MemoryMapResolver, NoMaps,
    SaveFlags,
};
use quarry_types::Vector3;

fn instance(pairs: &[(&str, &str)], contents: &[String]) -> String {
    let mut out = String::from("{\n\"classname\" \"func_instance\"\n");
    for (k, v) in pairs {
        out.push_str(&format!("\"{}\" \"{}\"\n", k, v));
    }
    for c in contents {
        out.push_str(c);
    }
    out.push_str("}\n");
    out
}

fn door(name: &str, target: &str) -> String {
    entity(
        &[("classname", "func_door"), ("targetname", name), ("target", target)],
        &[box_brush([-32, -288, 32], [32, -224, 96], "door")],
    )
}

fn world() -> String {
    entity(&[("classname", "worldspawn")], &[box_brush([-512, -512, -16], [512, 512, 0], "floor")])
}

fn find<'a>(map: &'a Map, name: &str) -> &'a MapObject {
    map.find_by_targetname(name)
        .unwrap_or_else(|| panic!("no entity named {}", name))
}

#[test]
fn instance_contents_are_translated() {
    let map = parse(&format!(
        "{}{}",
        world(),
        instance(&[("origin", "512 32 0"), ("fixup_style", "2")], &[door("door", "")])
    ));
    assert_relative_eq!(map.objects[1].children[0].position, Vector3::new(0.0, -256.0, 64.0));

    let collapsed = map.collapse(&mut NoMaps).unwrap();
    let door = find(&collapsed, "door");
    assert_relative_eq!(door.position, Vector3::new(512.0, -224.0, 64.0));
    assert_eq!(door.bounds().min(), Vector3::new(480.0, -256.0, 32.0));

    // Side planes moved with the geometry
    let solid = &door.solids[0];
    assert!(solid.contains(&Vector3::new(512.0, -224.0, 64.0), 1e-3));
    assert!(!solid.contains(&Vector3::new(0.0, -256.0, 64.0), 1e-3));

    // The source map is untouched
    assert_relative_eq!(
        map.objects[1].children[0].position,
        Vector3::new(0.0, -256.0, 64.0)
    );
}

#[test]
fn explicit_prefix() {
    let map = parse(&instance(
        &[("fixup_name", "APrefixFor-")],
        &[door("door", "button"), entity(&[("classname", "light"), ("targetname", "lamp")], &[])],
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    let door = find(&collapsed, "APrefixFor-door");
    assert_eq!(door.get("target"), Some("APrefixFor-button"));
    assert!(collapsed.find_by_targetname("APrefixFor-lamp").is_some());
}

#[test]
fn postfix_and_none() {
    let map = parse(&format!(
        "{}{}",
        instance(&[("fixup_name", "_a"), ("fixup_style", "1")], &[door("door", "")]),
        instance(&[("fixup_name", "_b"), ("fixup_style", "2")], &[door("gate", "")])
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    assert!(collapsed.find_by_targetname("door_a").is_some());
    assert!(collapsed.find_by_targetname("gate").is_some());
}

#[test]
fn global_names_are_untouched() {
    let map = parse(&instance(&[("fixup_name", "x_")], &[door("door", "@relay")]));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    assert_eq!(find(&collapsed, "x_door").get("target"), Some("@relay"));
}

#[test]
fn auto_names_per_invocation() {
    let contents = [
        door("door", ""),
        entity(&[("classname", "light"), ("targetname", "lamp")], &[]),
        entity(&[("classname", "info_null"), ("targetname", "spot")], &[]),
    ];
    let map = parse(&format!(
        "{}{}{}",
        world(),
        instance(&[], &contents),
        instance(&[("origin", "0 1024 0")], &contents)
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    for name in &["door", "lamp", "spot"] {
        assert!(collapsed.find_by_targetname(&format!("AutoInstance1{}", name)).is_some());
        assert!(collapsed.find_by_targetname(&format!("AutoInstance2{}", name)).is_some());
    }
}

#[test]
fn auto_name_options() {
    let map = parse(&instance(&[], &[door("door", "")]));
    let mut resolver = NoMaps;
    let options = CollapseOptionsBuilder::default()
        .first_auto_id(7u32)
        .auto_prefix("inst")
        .build()
        .unwrap();
    let collapsed = Collapser::new(&mut resolver, options).collapse(&map).unwrap();

    assert!(collapsed.find_by_targetname("inst7door").is_some());
}

#[test]
fn nested_instances_apply_inner_first() {
    let inner = instance(&[("fixup_name", "in-"), ("origin", "0 0 8")], &[door("door", "")]);
    let map = parse(&instance(&[("fixup_name", "out-"), ("origin", "8 0 0")], &[inner]));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    let door = find(&collapsed, "out-in-door");
    assert_relative_eq!(door.position, Vector3::new(8.0, -256.0, 72.0));
}

#[test]
fn collapsed_maps_have_no_instances() {
    let map = parse(&format!(
        "{}{}{}",
        world(),
        instance(&[("origin", "64 0 0")], &[door("a", "b"), instance(&[], &[door("c", "")])]),
        entity(&[("classname", "light"), ("origin", "0 0 64")], &[])
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    let non_instances = map.iter_objects().filter(|o| !o.is_instance()).count();
    assert_eq!(collapsed.entity_count(), non_instances);
    assert_eq!(collapsed.objects.len(), non_instances);
    assert!(collapsed.iter_objects().all(|o| !o.is_instance()));

    // Nothing left to do the second time round
    let again = collapsed.collapse(&mut NoMaps).unwrap();
    assert_eq!(again, collapsed);
}

#[test]
fn rotation_turns_contents() {
    let map = parse(&instance(
        &[("angles", "0 90 0"), ("fixup_style", "2")],
        &[
            door("door", ""),
            entity(&[("classname", "light"), ("targetname", "lamp"), ("origin", "64 0 0"), ("angle", "0")], &[]),
        ],
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    let door = find(&collapsed, "door");
    assert_relative_eq!(door.position, Vector3::new(256.0, 0.0, 64.0), epsilon = 1e-9);

    let lamp = find(&collapsed, "lamp");
    assert_eq!(lamp.get("origin"), Some("0 64 0"));
    assert_eq!(lamp.get("angle"), Some("90"));

    // Faces still face out
    let solid = &door.solids[0];
    for side in &solid.sides {
        assert!(side.plane.distance_to(&door.position) < 0.0);
    }
    assert_eq!(solid.faces(1e-3).len(), 6);
}

#[test]
fn texture_and_variable_replacement() {
    let map = parse(&instance(
        &[
            ("texreplace01", "door metal/plate"),
            ("replace01", "$brightness 200"),
            ("fixup_style", "2"),
        ],
        &[
            door("door", ""),
            entity(&[("classname", "light"), ("targetname", "lamp"), ("light", "$brightness")], &[]),
        ],
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    let door = find(&collapsed, "door");
    assert!(door.solids[0].sides.iter().all(|s| s.texture == "metal/plate"));
    assert!(door.renderables[0].polygons.iter().all(|p| p.texture == "metal/plate"));
    assert_eq!(find(&collapsed, "lamp").get("light"), Some("200"));
}

#[test]
fn file_instances_are_loaded() {
    let room = parse(&format!(
        "{}{}",
        entity(&[("classname", "worldspawn")], &[box_brush([0, 0, 0], [64, 64, 8], "room")]),
        door("door", "")
    ));
    let mut resolver = MemoryMapResolver::new();
    resolver.insert("instances/room.map", room);

    let map = parse(&format!(
        "{}{}",
        world(),
        instance(&[("file", "instances\\room.map"), ("origin", "0 0 128"), ("fixup_name", "r-")], &[])
    ));
    let collapsed = map.collapse(&mut resolver).unwrap();

    assert_eq!(collapsed.objects.len(), 2);
    let world = collapsed.worldspawn().unwrap();
    assert_eq!(world.solids.len(), 2);
    assert_eq!(world.bounds().max().z, 136.0);
    assert_relative_eq!(find(&collapsed, "r-door").position, Vector3::new(0.0, -256.0, 192.0));
}

#[test]
fn missing_files_are_errors() {
    let map = parse(&instance(&[("file", "nowhere.map")], &[]));
    assert!(matches!(
        map.collapse(&mut NoMaps),
        Err(CollapseError::MissingMap { file }) if file == "nowhere.map"
    ));
}

#[test]
fn instance_cycles_are_detected() {
    let a = parse(&instance(&[("file", "b.map")], &[]));
    let b = parse(&instance(&[("file", "a.map")], &[]));
    let mut resolver = MemoryMapResolver::new();
    resolver.insert("a.map", a.clone());
    resolver.insert("b.map", b);

    let options = Default::default();
    match Collapser::new(&mut resolver, options).collapse_named(&a, "a.map") {
        Err(CollapseError::Cycle { chain }) => assert_eq!(chain, vec!["a.map", "b.map", "a.map"]),
        other => panic!("expected a cycle, got {:?}", other.map(|m| m.entity_count())),
    }

    // Without the name, the cycle is found one step later
    assert!(matches!(
        a.collapse(&mut resolver),
        Err(CollapseError::Cycle { .. })
    ));
}

#[test]
fn outer_variables_reach_nested_instances() {
    let inner = instance(
        &[("origin", "$pos"), ("fixup_name", "$prefix")],
        &[entity(&[("classname", "light"), ("targetname", "lamp"), ("origin", "0 0 0")], &[])],
    );
    let map = parse(&instance(
        &[
            ("replace01", "$pos 64 0 0"),
            ("replace02", "$prefix upper-"),
            ("fixup_style", "2"),
        ],
        &[inner],
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    let lamp = find(&collapsed, "upper-lamp");
    assert_eq!(lamp.get("origin"), Some("64 0 0"));
    assert_relative_eq!(lamp.position, Vector3::new(64.0, 0.0, 0.0));
}

#[test]
fn scale_then_rotate_then_translate() {
    let map = parse(&instance(
        &[
            ("scale", "2 1 1"),
            ("angles", "0 90 0"),
            ("origin", "100 0 0"),
            ("fixup_style", "2"),
        ],
        &[entity(&[("classname", "light"), ("targetname", "lamp"), ("origin", "10 0 0")], &[])],
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    assert_eq!(find(&collapsed, "lamp").get("origin"), Some("100 20 0"));
}

#[test]
fn uniform_scale_grows_brushes() {
    let map = parse(&instance(&[("scale", "2"), ("fixup_style", "2")], &[door("door", "")]));
    let collapsed = map.collapse(&mut NoMaps).unwrap();

    let door = find(&collapsed, "door");
    assert_eq!(door.bounds().min(), Vector3::new(-64.0, -576.0, 64.0));
    assert_eq!(door.bounds().max(), Vector3::new(64.0, -448.0, 192.0));
    assert_eq!(door.solids[0].faces(1e-3).len(), 6);
}

#[test]
fn textures_stay_locked_to_moved_brushes() {
    let map = parse(&instance(
        &[
            ("scale", "2 1 1"),
            ("angles", "0 90 0"),
            ("origin", "100 0 0"),
            ("fixup_style", "2"),
        ],
        &[door("door", "")],
    ));
    let collapsed = map.collapse(&mut NoMaps).unwrap();
    let moved = &find(&collapsed, "door").renderables[0];

    // Coordinates carried through the transform match ones rebuilt from the written sides
    let reparsed = parse(&collapsed.serialize(SaveFlags::all()));
    let rebuilt = &find(&reparsed, "door").renderables[0];
    assert_eq!(rebuilt.vertices.len(), moved.vertices.len());

    for vertex in &moved.vertices {
        let matching = rebuilt
            .vertices
            .iter()
            .find(|v| {
                (v.position - vertex.position).norm() < 1e-6
                    && (v.normal - vertex.normal).norm() < 1e-6
            })
            .unwrap_or_else(|| panic!("no rebuilt vertex at {:?}", vertex.position));
        assert_relative_eq!(matching.tex, vertex.tex, epsilon = 1e-6);
    }
}
