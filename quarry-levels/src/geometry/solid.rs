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

//! Convex brushes, and recovering their faces from bounding planes

use super::plane::{Plane, Winding};
use super::projection::TextureProjection;
use log::debug;
use quarry_types::{Aabb, Vector3};
use std::cmp::Ordering;

/// Bounding surface for a brush.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    /// The three points the plane was defined by, in file order.
    pub points: [Vector3; 3],
    pub plane: Plane,
    pub texture: String,
    pub projection: TextureProjection,
    /// Anything written after the scale on the side's line, e.g. quake 2 surface flags.
    pub extra: Vec<String>,
}

impl Side {
    /// Points in a map file wind so that this gives outward facing normals.
    pub const WINDING: Winding = Winding::CounterClockwise;

    pub fn new(
        points: [Vector3; 3],
        texture: impl Into<String>,
        projection: TextureProjection,
    ) -> Side {
        Side {
            plane: Plane::from_points(&points[0], &points[1], &points[2], Side::WINDING),
            points,
            texture: texture.into(),
            projection,
            extra: Vec::new(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.plane.is_degenerate()
    }
}

/// A convex volume bounded by the planes of its sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    pub sides: Vec<Side>,
}

/// The polygon one side of a solid contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Index into the solid's sides
    pub side: usize,
    /// Corners, counter-clockwise when seen from in front of the side.
    pub points: Vec<Vector3>,
}

impl Solid {
    pub fn new(sides: Vec<Side>) -> Solid {
        Solid { sides }
    }

    /// Rebuild the polygon for each side.
    ///
    /// Every triple of planes is intersected, and the point kept if it is on or
    /// behind every plane. Kept points are attached to each side they lie on, then
    /// sorted by angle around that side's normal. Sides which end up with fewer
    /// than 3 points (degenerate or redundant planes) have no face.
    pub fn faces(&self, epsilon: f64) -> Vec<Face> {
        let n = self.sides.len();
        let mut points: Vec<Vec<Vector3>> = vec![Vec::new(); n];

        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    let point = match Plane::intersect(
                        &self.sides[i].plane,
                        &self.sides[j].plane,
                        &self.sides[k].plane,
                    ) {
                        Some(p) => p,
                        None => continue,
                    };

                    if !self.contains(&point, epsilon) {
                        continue;
                    }

                    for (m, side) in self.sides.iter().enumerate() {
                        if !side.is_degenerate() && side.plane.distance_to(&point).abs() <= epsilon {
                            insert_unique(&mut points[m], point, epsilon);
                        }
                    }
                }
            }
        }

        points
            .into_iter()
            .enumerate()
            .filter_map(|(m, side_points)| {
                if side_points.len() < 3 {
                    debug!(
                        "Dropping side {} ({}) with {} points",
                        m,
                        self.sides[m].texture,
                        side_points.len()
                    );
                    return None;
                }

                Some(Face {
                    side: m,
                    points: sort_winding(&self.sides[m], side_points),
                })
            })
            .collect()
    }

    /// True if `point` is on or behind every (non-degenerate) side.
    pub fn contains(&self, point: &Vector3, epsilon: f64) -> bool {
        self.sides
            .iter()
            .filter(|s| !s.is_degenerate())
            .all(|s| s.plane.distance_to(point) <= epsilon)
    }

    /// Every distinct corner of the solid.
    pub fn vertices(&self, epsilon: f64) -> Vec<Vector3> {
        let mut out = Vec::new();
        for face in self.faces(epsilon) {
            for point in face.points {
                insert_unique(&mut out, point, epsilon);
            }
        }
        out
    }

    pub fn bounds(&self, epsilon: f64) -> Aabb {
        Aabb::from_points(self.vertices(epsilon))
    }
}

fn insert_unique(points: &mut Vec<Vector3>, point: Vector3, epsilon: f64) {
    if !points.iter().any(|p| (p - point).norm() <= epsilon) {
        points.push(point);
    }
}

/// Sort `points` counter-clockwise around the side's normal.
/// The direction from the side's first to second point is angle zero.
fn sort_winding(side: &Side, points: Vec<Vector3>) -> Vec<Vector3> {
    let normal = side.plane.normal;
    let center = points.iter().fold(Vector3::zeros(), |acc, p| acc + p) / points.len() as f64;

    let reference = side.points[1] - side.points[0];
    let u = (reference - normal * reference.dot(&normal)).normalize();
    let v = normal.cross(&u);

    let mut keyed: Vec<(f64, Vector3)> = points
        .into_iter()
        .map(|p| {
            let d = p - center;
            (d.dot(&v).atan2(d.dot(&u)), p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    keyed.into_iter().map(|(_, p)| p).collect()
}
