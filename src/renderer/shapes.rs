//! Shape tessellation for 2D primitives
//!
//! [`MeshSurface`] turns every fill call into triangles so a frame ends up as
//! one flat vertex list, ready to upload and draw in a single call.

use glam::Vec2;
use std::f32::consts::TAU;

use super::Surface;
use super::vertex::{Color, Vertex};

/// Segments used for a full circle; partial arcs use a proportional share
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Generate vertices for an axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: Color) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a convex polygon as a triangle fan
pub fn polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let first = points[0];
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(first.x, first.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Generate vertices for a filled arc (pie slice) from `start` to `end`
pub fn arc(center: Vec2, radius: f32, start: f32, end: f32, color: Color) -> Vec<Vertex> {
    let sweep = end - start;
    if radius <= 0.0 || sweep == 0.0 {
        return Vec::new();
    }

    let segments = ((sweep.abs() / TAU) * CIRCLE_SEGMENTS as f32).ceil().max(1.0) as u32;
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = start + sweep * (i as f32 / segments as f32);
        let theta2 = start + sweep * ((i + 1) as f32 / segments as f32);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// CPU surface collecting triangles in pixel coordinates
#[derive(Debug, Clone)]
pub struct MeshSurface {
    size: Vec2,
    vertices: Vec<Vertex>,
}

impl MeshSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            vertices: Vec::new(),
        }
    }

    /// Triangles drawn since the last clear, in pixel coordinates
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl Surface for MeshSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, _color: Color) {
        self.vertices.clear();
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.vertices.extend(rect(pos, size, color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.vertices.extend(polygon(points, color));
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.vertices.extend(arc(center, radius, start, end, color));
    }
}
