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

//! How textures are mapped onto brush faces

use quarry_types::{Vector2, Vector3};

/// How a side's texture projection is written in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// `tex xoff yoff rot xscale yscale`, with axes derived from the plane.
    Standard,
    /// `tex [ sx sy sz soff ] [ tx ty tz toff ] rot xscale yscale`
    Valve220,
}

/// Texture axes, offset, rotation and scale of one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureProjection {
    pub basis_s: Vector3,
    pub basis_t: Vector3,
    pub offset: Vector2,
    /// Degrees
    pub rotation: f64,
    pub scale: Vector2,
    pub format: TextureFormat,
}

/// From quake's qbsp. Each row is a plane normal followed by the s and t axes used for it.
const BASE_AXES: [[[f64; 3]; 3]; 6] = [
    [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]], // floor
    [[0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]], // ceiling
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]], // west wall
    [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]], // east wall
    [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]], // south wall
    [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]], // north wall
];

impl TextureProjection {
    /// An explicit Valve 220 projection.
    pub fn valve(
        basis_s: Vector3,
        basis_t: Vector3,
        offset: Vector2,
        rotation: f64,
        scale: Vector2,
    ) -> TextureProjection {
        TextureProjection {
            basis_s,
            basis_t,
            offset,
            rotation,
            scale,
            format: TextureFormat::Valve220,
        }
    }

    /// A standard quake projection. The axes come from whichever world axis the
    /// plane normal is closest to, rotated by `rotation` degrees.
    pub fn standard(
        normal: &Vector3,
        offset: Vector2,
        rotation: f64,
        scale: Vector2,
    ) -> TextureProjection {
        let (basis_s, basis_t) = standard_axes(normal, rotation);
        TextureProjection {
            basis_s,
            basis_t,
            offset,
            rotation,
            scale,
            format: TextureFormat::Standard,
        }
    }

    /// Texture coordinate of `point` on a `width` x `height` texture.
    pub fn texture_coordinate(&self, point: &Vector3, width: u32, height: u32) -> Vector2 {
        let scale_s = non_zero(self.scale.x);
        let scale_t = non_zero(self.scale.y);
        Vector2::new(
            (point.dot(&self.basis_s) / scale_s + self.offset.x) / width.max(1) as f64,
            (point.dot(&self.basis_t) / scale_t + self.offset.y) / height.max(1) as f64,
        )
    }
}

fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

/// The axis-aligned texture axes quake uses for a plane with this normal.
pub fn standard_axes(normal: &Vector3, rotation: f64) -> (Vector3, Vector3) {
    let mut best = 0;
    let mut best_dot = 0.0;
    for (i, axes) in BASE_AXES.iter().enumerate() {
        let dot = normal.dot(&Vector3::from(axes[0]));
        if dot > best_dot {
            best_dot = dot;
            best = i;
        }
    }

    let mut s = Vector3::from(BASE_AXES[best][1]);
    let mut t = Vector3::from(BASE_AXES[best][2]);

    let (sin, cos) = match rotation {
        r if r == 0.0 => (0.0, 1.0),
        r if r == 90.0 => (1.0, 0.0),
        r if r == 180.0 => (0.0, -1.0),
        r if r == 270.0 => (-1.0, 0.0),
        r => r.to_radians().sin_cos(),
    };

    let sv = major_axis(&s);
    let tv = major_axis(&t);
    rotate_axis(&mut s, sv, tv, sin, cos);
    rotate_axis(&mut t, sv, tv, sin, cos);

    (s, t)
}

fn rotate_axis(axis: &mut Vector3, sv: usize, tv: usize, sin: f64, cos: f64) {
    let ns = cos * axis[sv] - sin * axis[tv];
    let nt = sin * axis[sv] + cos * axis[tv];
    axis[sv] = ns;
    axis[tv] = nt;
}

fn major_axis(v: &Vector3) -> usize {
    if v.x != 0.0 {
        0
    } else if v.y != 0.0 {
        1
    } else {
        2
    }
}
