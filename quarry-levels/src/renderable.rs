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

//! Drawable polygons generated from solids

use crate::geometry::Solid;
use crate::map::LoadOptions;
use crate::textures::{LoadableImage, TextureResolver};
use log::debug;
use quarry_types::{Aabb, Rgba, Vector2, Vector3};

/// A vertex, used to describe a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    /// Normal of the face this vertex belongs to
    pub normal: Vector3,
    pub colour: Rgba,
    pub tex: Vector2,
}

/// One convex face, as indices into its renderable's vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub indices: Vec<u32>,
    pub normal: Vector3,
    pub texture: String,
    pub basis_s: Vector3,
    pub basis_t: Vector3,
}

/// The drawable geometry of one solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Renderable {
    pub vertices: Vec<Vertex>,
    pub polygons: Vec<Polygon>,
}

impl Renderable {
    /// Build the faces of `solid`. Each face gets its own vertices, so normals stay per-face.
    /// Textures `textures` doesn't know use the placeholder size from `options`.
    pub fn from_solid<R: TextureResolver>(
        solid: &Solid,
        colour: Rgba,
        textures: &mut R,
        options: &LoadOptions,
    ) -> Renderable {
        let mut renderable = Renderable::default();

        for face in solid.faces(options.epsilon) {
            let side = &solid.sides[face.side];
            let (width, height) = match textures.resolve(&side.texture) {
                Some(image) => (image.width(), image.height()),
                None => {
                    debug!("No texture {}, using placeholder size", side.texture);
                    options.placeholder_size
                }
            };

            let normal = face_normal(&face.points);
            let base = renderable.vertices.len() as u32;
            for point in face.points.iter() {
                renderable.vertices.push(Vertex {
                    position: *point,
                    normal,
                    colour,
                    tex: side.projection.texture_coordinate(point, width, height),
                });
            }

            renderable.polygons.push(Polygon {
                indices: (base..base + face.points.len() as u32).collect(),
                normal,
                texture: side.texture.clone(),
                basis_s: side.projection.basis_s,
                basis_t: side.projection.basis_t,
            });
        }

        renderable
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| v.position))
    }

    /// Each polygon as a triangle fan.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.polygons.iter().flat_map(|polygon| {
            let indices = &polygon.indices;
            (1..indices.len().saturating_sub(1))
                .map(move |i| [indices[0], indices[i], indices[i + 1]])
        })
    }

    /// The corner positions of one polygon, in order.
    pub fn polygon_points<'a>(&'a self, polygon: &'a Polygon) -> impl Iterator<Item = Vector3> + 'a {
        polygon
            .indices
            .iter()
            .map(move |&i| self.vertices[i as usize].position)
    }
}

/// Normalized cross product of the first two edges.
fn face_normal(points: &[Vector3]) -> Vector3 {
    (points[1] - points[0]).cross(&(points[2] - points[1])).normalize()
}
