//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering `rect`
pub fn quad(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (min, max) = (rect.min(), rect.max());
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let p1 = polar(center, radius, i, segments);
        let p2 = polar(center, radius, i + 1, segments);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let inner1 = polar(center, inner_radius, i, segments);
        let outer1 = polar(center, outer_radius, i, segments);
        let inner2 = polar(center, inner_radius, i + 1, segments);
        let outer2 = polar(center, outer_radius, i + 1, segments);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Darkness over `bounds` with a round hole at `center`.
///
/// A ring wide enough to reach the farthest corner; the viewport clips the rest.
pub fn mask_with_light(bounds: &Rect, center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let corners = [
        bounds.min(),
        bounds.max(),
        Vec2::new(bounds.min().x, bounds.max().y),
        Vec2::new(bounds.max().x, bounds.min().y),
    ];
    let reach = corners.iter().map(|c| c.distance(center)).fold(radius, f32::max);
    // Polygon edges sit inside the circle; push out so corners stay covered
    let outer = reach / (PI / segments as f32).cos() + 1.0;
    ring(center, radius, outer, color, segments)
}

fn polar(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * 2.0 * PI;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}
