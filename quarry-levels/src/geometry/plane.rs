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

use quarry_types::Vector3;

/// Below this, three planes are treated as having no single intersection.
const DETERMINANT_EPSILON: f64 = 1e-9;

/// Which way round three points go, and so which side a plane faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// normal = (b - a) x (c - a)
    Clockwise,
    /// normal = -((b - a) x (c - a))
    CounterClockwise,
}

/// An infinite plane, `normal . x = dist`.
/// Points with `normal . x > dist` are in front of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Plane normal
    pub normal: Vector3,

    /// Distance from origin to plane along normal
    pub dist: f64,
}

impl Plane {
    pub fn new(normal: Vector3, dist: f64) -> Plane {
        Plane { normal, dist }
    }

    /// The plane through three points.
    ///
    /// Winding only flips the sign of the normal and distance, never where the plane is.
    /// Collinear or coincident points give a degenerate plane with a NaN normal,
    /// see [`Plane::is_degenerate`].
    pub fn from_points(a: &Vector3, b: &Vector3, c: &Vector3, winding: Winding) -> Plane {
        let cross = (b - a).cross(&(c - a));
        let len = cross.norm();
        if len <= f64::EPSILON {
            return Plane {
                normal: Vector3::repeat(f64::NAN),
                dist: f64::NAN,
            };
        }

        let normal = match winding {
            Winding::Clockwise => cross / len,
            Winding::CounterClockwise => -cross / len,
        };

        Plane {
            normal,
            dist: normal.dot(a),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.normal.iter().all(|c| c.is_finite()) && self.dist.is_finite())
    }

    /// Signed distance from the plane to `point`, positive in front.
    pub fn distance_to(&self, point: &Vector3) -> f64 {
        self.normal.dot(point) - self.dist
    }

    /// The same plane, facing the other way.
    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            dist: -self.dist,
        }
    }

    /// The single point where three planes meet.
    /// None if any two are parallel or coincident, or all three share a line.
    pub fn intersect(p1: &Plane, p2: &Plane, p3: &Plane) -> Option<Vector3> {
        let n23 = p2.normal.cross(&p3.normal);
        let det = p1.normal.dot(&n23);
        if !det.is_finite() || det.abs() < DETERMINANT_EPSILON {
            return None;
        }

        let n31 = p3.normal.cross(&p1.normal);
        let n12 = p1.normal.cross(&p2.normal);
        Some((n23 * p1.dist + n31 * p2.dist + n12 * p3.dist) / det)
    }
}
