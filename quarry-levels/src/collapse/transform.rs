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

//! Moving the contents of an instance into place

use crate::entity::{parse_vector, MapObject};
use crate::geometry::{Plane, Side, TextureFormat};
use crate::serialize::Num;
use log::warn;
use quarry_types::{Rotation3, Vector3};

/// Values this close to a whole number are snapped to it.
const SNAP_EPSILON: f64 = 1e-9;

/// Scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub scale: Vector3,
    pub rotation: Rotation3,
    pub translation: Vector3,
}

impl Default for InstanceTransform {
    fn default() -> InstanceTransform {
        InstanceTransform {
            scale: Vector3::repeat(1.0),
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }
}

impl InstanceTransform {
    /// Read the transform from an instance's `origin`, `angles` (or `angle`) and `scale` keys.
    pub fn from_object(object: &MapObject) -> InstanceTransform {
        let translation = object.get_vector("origin").unwrap_or_else(Vector3::zeros);

        let rotation = match object.get_vector("angles") {
            Some(angles) => rotation_from_angles(&angles),
            None => match object.get("angle").and_then(|a| a.trim().parse::<f64>().ok()) {
                Some(angle) => rotation_from_angles(&angle_to_angles(angle)),
                None => Rotation3::identity(),
            },
        };

        let scale = match object.get("scale") {
            Some(value) => parse_scale(value).unwrap_or_else(|| {
                warn!("Ignoring unreadable instance scale `{}`", value);
                Vector3::repeat(1.0)
            }),
            None => Vector3::repeat(1.0),
        };

        InstanceTransform {
            scale,
            rotation,
            translation,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translation == Vector3::zeros() && !self.rotates() && !self.scales()
    }

    fn rotates(&self) -> bool {
        self.rotation != Rotation3::identity()
    }

    fn scales(&self) -> bool {
        self.scale != Vector3::repeat(1.0)
    }

    /// True if this turns shapes inside out.
    pub fn mirrors(&self) -> bool {
        self.scale.x * self.scale.y * self.scale.z < 0.0
    }

    pub fn apply_point(&self, point: &Vector3) -> Vector3 {
        snap(self.rotation * point.component_mul(&self.scale) + self.translation)
    }

    /// Transform a surface normal. The result is unit length.
    pub fn apply_normal(&self, normal: &Vector3) -> Vector3 {
        (self.rotation * normal.component_div(&self.scale)).normalize()
    }

    /// Transform a texture axis. Returns the new axis, with the same length as the
    /// old one, and how much longer the transform made it.
    fn apply_axis(&self, axis: &Vector3) -> Option<(Vector3, f64)> {
        let moved = self.rotation * axis.component_div(&self.scale);
        let (len, old_len) = (moved.norm(), axis.norm());
        if len <= f64::EPSILON || old_len <= f64::EPSILON {
            return None;
        }

        Some((snap(moved * (old_len / len)), len / old_len))
    }

    /// Transform an entity in place: its geometry, `origin`, angles and position.
    pub fn apply(&self, object: &mut MapObject) {
        if self.is_identity() {
            return;
        }

        for solid in object.solids.iter_mut() {
            for side in solid.sides.iter_mut() {
                self.apply_side(side);
            }
        }

        for renderable in object.renderables.iter_mut() {
            for vertex in renderable.vertices.iter_mut() {
                vertex.position = self.apply_point(&vertex.position);
                vertex.normal = self.apply_normal(&vertex.normal);
            }
            for polygon in renderable.polygons.iter_mut() {
                polygon.normal = self.apply_normal(&polygon.normal);
                if let Some((s, _)) = self.apply_axis(&polygon.basis_s) {
                    polygon.basis_s = s;
                }
                if let Some((t, _)) = self.apply_axis(&polygon.basis_t) {
                    polygon.basis_t = t;
                }
                if self.mirrors() {
                    polygon.indices.reverse();
                }
            }
        }

        // Point entities without an origin are at the instance's origin
        let origin = match object.get_vector("origin") {
            Some(origin) => Some(origin),
            None if !object.is_brush_entity() => Some(Vector3::zeros()),
            None => None,
        };
        if let Some(origin) = origin {
            object.set("origin", format_vector(&self.apply_point(&origin)));
        }

        if self.rotates() {
            self.apply_angles(object);
        }

        object.update_position();
    }

    /// Move a side's points and keep its texture locked to it.
    pub fn apply_side(&self, side: &mut Side) {
        let mut points = [
            self.apply_point(&side.points[0]),
            self.apply_point(&side.points[1]),
            self.apply_point(&side.points[2]),
        ];
        if self.mirrors() {
            points.swap(1, 2);
        }
        side.points = points;
        side.plane = Plane::from_points(&points[0], &points[1], &points[2], Side::WINDING);

        let p = &mut side.projection;
        if let (Some((s, ks)), Some((t, kt))) = (self.apply_axis(&p.basis_s), self.apply_axis(&p.basis_t)) {
            p.basis_s = s;
            p.basis_t = t;
            p.scale.x /= ks;
            p.scale.y /= kt;
        }

        if p.scale.x != 0.0 {
            p.offset.x = snap_scalar(p.offset.x - self.translation.dot(&p.basis_s) / p.scale.x);
        }
        if p.scale.y != 0.0 {
            p.offset.y = snap_scalar(p.offset.y - self.translation.dot(&p.basis_t) / p.scale.y);
        }

        // Standard axes follow the plane, so they can't hold a rotated projection.
        if p.format == TextureFormat::Standard && (self.rotates() || self.scales()) {
            p.format = TextureFormat::Valve220;
        }
    }

    fn apply_angles(&self, object: &mut MapObject) {
        if let Some(angles) = object.get_vector("angles") {
            let composed = self.rotation * rotation_from_angles(&angles);
            object.set("angles", format_vector(&angles_from_rotation(&composed)));
        } else if let Some(angle) = object.get("angle").and_then(|a| a.trim().parse::<f64>().ok()) {
            let composed = self.rotation * rotation_from_angles(&angle_to_angles(angle));
            let angles = angles_from_rotation(&composed);
            if angles.x == 0.0 && angles.z == 0.0 {
                object.set("angle", Num(angles.y).to_string());
            } else {
                object.set("angles", format_vector(&angles));
            }
        }
    }
}

/// `pitch yaw roll` in degrees. Yaw turns about Z, pitch about Y, roll about X.
pub fn rotation_from_angles(angles: &Vector3) -> Rotation3 {
    Rotation3::from_euler_angles(
        angles.z.to_radians(),
        angles.x.to_radians(),
        angles.y.to_radians(),
    )
}

/// The inverse of [`rotation_from_angles`], snapped to whole degrees where close.
pub fn angles_from_rotation(rotation: &Rotation3) -> Vector3 {
    let (roll, pitch, yaw) = rotation.euler_angles();
    snap(Vector3::new(
        pitch.to_degrees(),
        yaw.to_degrees(),
        roll.to_degrees(),
    ))
}

/// A lone `angle` key is a yaw, except for the special values meaning straight up or down.
fn angle_to_angles(angle: f64) -> Vector3 {
    if angle == -1.0 {
        Vector3::new(-90.0, 0.0, 0.0)
    } else if angle == -2.0 {
        Vector3::new(90.0, 0.0, 0.0)
    } else {
        Vector3::new(0.0, angle, 0.0)
    }
}

/// One number for uniform scale, or three. Zero components are treated as 1.
fn parse_scale(value: &str) -> Option<Vector3> {
    let mut scale = match value.split_whitespace().count() {
        1 => Vector3::repeat(value.trim().parse::<f64>().ok().filter(|s| s.is_finite())?),
        _ => parse_vector(value)?,
    };

    for c in scale.iter_mut() {
        if *c == 0.0 {
            warn!("Instance scale `{}` has a zero component, using 1", value);
            *c = 1.0;
        }
    }

    Some(scale)
}

fn snap(v: Vector3) -> Vector3 {
    v.map(snap_scalar)
}

fn snap_scalar(x: f64) -> f64 {
    let rounded = x.round();
    if (x - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        x
    }
}

fn format_vector(v: &Vector3) -> String {
    format!("{} {} {}", Num(v.x), Num(v.y), Num(v.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn yaw_turns_x_into_y() {
        let transform = InstanceTransform {
            rotation: rotation_from_angles(&Vector3::new(0.0, 90.0, 0.0)),
            ..Default::default()
        };

        assert_eq!(
            transform.apply_point(&Vector3::new(1.0, 0.0, 0.0)),
            Vector3::new(0.0, 1.0, 0.0)
        );
    }

    #[test]
    fn angles_survive_conversion() {
        let angles = Vector3::new(30.0, 45.0, 10.0);
        assert_relative_eq!(
            angles_from_rotation(&rotation_from_angles(&angles)),
            angles,
            epsilon = 1e-9
        );
    }

    #[test]
    fn scale_forms() {
        assert_eq!(parse_scale("2"), Some(Vector3::repeat(2.0)));
        assert_eq!(parse_scale("1 -1 0"), Some(Vector3::new(1.0, -1.0, 1.0)));
        assert_eq!(parse_scale("big"), None);
    }

    #[test]
    fn mirroring_keeps_sides_facing_out() {
        use crate::geometry::TextureProjection;
        use quarry_types::Vector2;

        // Floor of a box, facing down
        let mut side = Side::new(
            [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            "floor",
            TextureProjection::valve(
                Vector3::x(),
                -Vector3::y(),
                Vector2::zeros(),
                0.0,
                Vector2::repeat(1.0),
            ),
        );
        assert_relative_eq!(side.plane.normal, Vector3::new(0.0, 0.0, -1.0));

        let transform = InstanceTransform {
            scale: Vector3::new(-1.0, 1.0, 1.0),
            ..Default::default()
        };
        transform.apply_side(&mut side);
        assert_relative_eq!(side.plane.normal, Vector3::new(0.0, 0.0, -1.0));
    }
}
