//! Stroke intersection for the eraser tool
//!
//! Committed lines are never rewritten. An eraser stroke is appended as its
//! own line and subtracts at render time; one that touches no painted line
//! would subtract nothing, so it is not recorded at all.

use crate::mask::{BrushLine, BrushMaskParameters};
use crate::transform::Point;

/// Two lines touch when any segment of one passes closer to a segment of the
/// other than the sum of the two half brush sizes. A single-point line is a
/// zero-length segment.
pub fn lines_intersect(a: &BrushLine, b: &BrushLine) -> bool {
    let threshold = (a.brush_size + b.brush_size) / 2.0;
    if !(threshold > 0.0) {
        return false;
    }
    let threshold_sq = threshold * threshold;

    segments(&a.points).any(|(p0, p1)| {
        segments(&b.points).any(|(q0, q1)| segment_distance_sq(p0, p1, q0, q1) < threshold_sq)
    })
}

fn segments(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let single = match points {
        [only] => Some((*only, *only)),
        _ => None,
    };
    single
        .into_iter()
        .chain(points.windows(2).map(|pair| (pair[0], pair[1])))
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn point_segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (ex, ey) = (a.x + t * dx - p.x, a.y + t * dy - p.y);
    ex * ex + ey * ey
}

fn segment_distance_sq(p0: Point, p1: Point, q0: Point, q1: Point) -> f64 {
    let d1 = cross(q0, q1, p0);
    let d2 = cross(q0, q1, p1);
    let d3 = cross(p0, p1, q0);
    let d4 = cross(p0, p1, q1);
    // Strict straddle on both sides; touching cases fall through to zero
    // endpoint distances below.
    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return 0.0;
    }
    point_segment_distance_sq(p0, q0, q1)
        .min(point_segment_distance_sq(p1, q0, q1))
        .min(point_segment_distance_sq(q0, p0, p1))
        .min(point_segment_distance_sq(q1, p0, p1))
}

/// Whether `eraser` would remove anything from `brush`.
pub fn erases_anything(brush: &BrushMaskParameters, eraser: &BrushLine) -> bool {
    brush
        .lines
        .iter()
        .filter(|line| !line.is_eraser())
        .any(|line| lines_intersect(line, eraser))
}
