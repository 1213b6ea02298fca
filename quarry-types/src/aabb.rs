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

//! Axis-aligned bounding boxes

use crate::Vector3;
use std::ops::{Add, Sub};

/// An axis-aligned bounding box.
///
/// Only the corners are stored. The centre is always derived from them, so
/// `center() == min + (max - min) / 2` holds at all times.
/// A box with no points in it is empty, and is the identity for union (`+`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Vector3,
    max: Vector3,
}

impl Aabb {
    /// A box containing nothing.
    pub fn empty() -> Aabb {
        Aabb {
            min: Vector3::repeat(f64::INFINITY),
            max: Vector3::repeat(f64::NEG_INFINITY),
        }
    }

    /// The box spanning two corners, in any order.
    pub fn from_corners(a: Vector3, b: Vector3) -> Aabb {
        Aabb {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// The smallest box containing every given point.
    pub fn from_points<I: IntoIterator<Item = Vector3>>(points: I) -> Aabb {
        let mut aabb = Aabb::empty();
        for point in points {
            aabb.grow(&point);
        }
        aabb
    }

    /// Extend this box to contain `point`.
    pub fn grow(&mut self, point: &Vector3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn min(&self) -> Vector3 {
        self.min
    }

    pub fn max(&self) -> Vector3 {
        self.max
    }

    /// Centre of the box. The zero vector if the box is empty.
    pub fn center(&self) -> Vector3 {
        if self.is_empty() {
            return Vector3::zeros();
        }

        self.min + (self.max - self.min) / 2.0
    }

    /// Size along each axis. The zero vector if the box is empty.
    pub fn size(&self) -> Vector3 {
        if self.is_empty() {
            return Vector3::zeros();
        }

        self.max - self.min
    }

    /// True if `point` is inside or on the boundary of this box.
    pub fn contains(&self, point: &Vector3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

impl Default for Aabb {
    fn default() -> Aabb {
        Aabb::empty()
    }
}

/// Union
impl Add for Aabb {
    type Output = Aabb;

    fn add(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }
}

/// Translation
impl Add<Vector3> for Aabb {
    type Output = Aabb;

    fn add(self, offset: Vector3) -> Aabb {
        if self.is_empty() {
            return self;
        }

        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

impl Sub<Vector3> for Aabb {
    type Output = Aabb;

    fn sub(self, offset: Vector3) -> Aabb {
        self + (-offset)
    }
}
