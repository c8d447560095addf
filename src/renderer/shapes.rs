//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::draw_list::{Color, DrawList, Primitive, Stroke, colors};
use super::vertex::Vertex;

/// Segments used for the sphere disc
const DISC_SEGMENTS: u32 = 96;
/// Segments used for marker discs
const MARKER_SEGMENTS: u32 = 24;

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

#[inline]
fn rim(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + radius * Vec2::new(theta.cos(), theta.sin())
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let a = rim(center, radius, theta1);
        let b = rim(center, radius, theta2);

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Disc shaded from `inner` at `highlight` to `outer` on the rim.
///
/// Each rim slice gets a middle band so the gradient keeps its curvature
/// instead of reading as flat triangles.
pub fn gradient_disc(
    center: Vec2,
    radius: f32,
    highlight: Vec2,
    inner: Color,
    outer: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 9) as usize);
    let mid_color = lerp_color(inner, outer, 0.5);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let outer1 = rim(center, radius, theta1);
        let outer2 = rim(center, radius, theta2);
        let mid1 = highlight.lerp(outer1, 0.5);
        let mid2 = highlight.lerp(outer2, 0.5);

        vertices.push(Vertex::new(highlight.x, highlight.y, inner));
        vertices.push(Vertex::new(mid1.x, mid1.y, mid_color));
        vertices.push(Vertex::new(mid2.x, mid2.y, mid_color));

        vertices.push(Vertex::new(mid1.x, mid1.y, mid_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer));
        vertices.push(Vertex::new(mid2.x, mid2.y, mid_color));

        vertices.push(Vertex::new(mid2.x, mid2.y, mid_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer));
        vertices.push(Vertex::new(outer2.x, outer2.y, outer));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = rim(center, inner_radius, theta1);
        let outer1 = rim(center, outer_radius, theta1);
        let inner2 = rim(center, inner_radius, theta2);
        let outer2 = rim(center, outer_radius, theta2);

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

/// Thick polyline as one quad per segment
pub fn polyline(points: &[Vec2], stroke: Stroke, closed: bool) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = stroke.width * 0.5;
    let color = stroke.color;
    let mut vertices = Vec::with_capacity(points.len() * 6);

    let mut segment = |p1: Vec2, p2: Vec2| {
        let dir = (p2 - p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;

        vertices.push(Vertex::new(v1a.x, v1a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2a.x, v2a.y, color));

        vertices.push(Vertex::new(v2a.x, v2a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2b.x, v2b.y, color));
    };

    for pair in points.windows(2) {
        segment(pair[0], pair[1]);
    }
    if closed {
        segment(points[points.len() - 1], points[0]);
    }

    vertices
}

/// Tessellate a whole frame in painter's order
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for primitive in &list.primitives {
        match primitive {
            Primitive::Disc {
                center,
                radius,
                highlight,
                inner,
                outer,
            } => vertices.extend(gradient_disc(
                *center,
                *radius,
                *highlight,
                *inner,
                *outer,
                DISC_SEGMENTS,
            )),
            Primitive::Polyline {
                points,
                stroke,
                closed,
                ..
            } => vertices.extend(polyline(points, *stroke, *closed)),
            Primitive::Marker {
                center,
                radius,
                fill,
                ..
            } => {
                vertices.extend(circle(*center, *radius, *fill, MARKER_SEGMENTS));
                vertices.extend(ring(
                    *center,
                    *radius,
                    *radius + 1.5,
                    colors::MARKER_RING,
                    MARKER_SEGMENTS,
                ));
            }
            Primitive::Label { .. } => {}
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw_list::{MarkerKind, PathKind};

    #[test]
    fn circle_is_a_fan() {
        let v = circle(Vec2::ZERO, 10.0, colors::FOUND_MARKER, 8);
        assert_eq!(v.len(), 24);
        assert!(v.iter().all(|v| v.position[0].hypot(v.position[1]) <= 10.0 + 1e-4));
    }

    #[test]
    fn polyline_emits_quad_per_segment() {
        let pts = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let stroke = Stroke::new(colors::CURVE_IDLE, 2.0);
        assert_eq!(polyline(&pts, stroke, false).len(), 12);
        assert_eq!(polyline(&pts, stroke, true).len(), 18);
        assert!(polyline(&pts[..1], stroke, false).is_empty());
    }

    #[test]
    fn polyline_width_is_respected() {
        let pts = [Vec2::ZERO, Vec2::new(10.0, 0.0)];
        let v = polyline(&pts, Stroke::new(colors::CURVE_IDLE, 4.0), false);
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn gradient_disc_colors_run_inner_to_outer() {
        let v = gradient_disc(
            Vec2::ZERO,
            10.0,
            Vec2::new(-3.0, 0.0),
            colors::SPHERE_INNER,
            colors::SPHERE_OUTER,
            16,
        );
        assert_eq!(v.len(), 16 * 9);
        assert_eq!(v[0].color, colors::SPHERE_INNER);
        assert_eq!(v[4].color, colors::SPHERE_OUTER);
    }

    #[test]
    fn labels_are_not_tessellated() {
        let mut list = DrawList::new(200);
        list.push(Primitive::Label {
            anchor: Vec2::ZERO,
            text: "Tokyo".into(),
            color: colors::LABEL,
            bold: true,
        });
        assert!(tessellate(&list).is_empty());

        list.push(Primitive::Marker {
            kind: MarkerKind::Target,
            center: Vec2::ZERO,
            radius: 5.0,
            fill: colors::TARGET_MARKER,
        });
        list.push(Primitive::Polyline {
            points: vec![Vec2::ZERO, Vec2::ONE],
            stroke: Stroke::new(colors::OUTLINE, 0.8),
            closed: false,
            front: true,
            kind: PathKind::Outline,
        });
        let n = MARKER_SEGMENTS as usize;
        assert_eq!(tessellate(&list).len(), n * 3 + n * 6 + 6);
    }
}
