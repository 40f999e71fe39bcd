//! Hit-testing and drag math for directly manipulated shapes
//!
//! All pointer math runs in render space against the drag-start snapshot;
//! results are mapped back to image space once per move.

use crate::core::InteractionConfig;
use crate::mask::{LinearMaskParameters, RadialMaskParameters, SubMaskParameters};
use crate::transform::{CoordinateMapper, Point};

/// Smallest radius a resize can produce, in render pixels
const MIN_RENDER_RADIUS: f64 = 1.0;

/// Which side of an ellipse's bounding box a resize handle sits on.
/// Components are -1, 0 or 1 in the shape's local (rotated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeAnchor {
    pub x: i8,
    pub y: i8,
}

impl ResizeAnchor {
    pub const TOP_LEFT: Self = Self { x: -1, y: -1 };
    pub const TOP: Self = Self { x: 0, y: -1 };
    pub const TOP_RIGHT: Self = Self { x: 1, y: -1 };
    pub const RIGHT: Self = Self { x: 1, y: 0 };
    pub const BOTTOM_RIGHT: Self = Self { x: 1, y: 1 };
    pub const BOTTOM: Self = Self { x: 0, y: 1 };
    pub const BOTTOM_LEFT: Self = Self { x: -1, y: 1 };
    pub const LEFT: Self = Self { x: -1, y: 0 };

    /// Corners first: they win when handles overlap on tiny shapes.
    pub const ALL: [Self; 8] = [
        Self::TOP_LEFT,
        Self::TOP_RIGHT,
        Self::BOTTOM_RIGHT,
        Self::BOTTOM_LEFT,
        Self::TOP,
        Self::RIGHT,
        Self::BOTTOM,
        Self::LEFT,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeHandle {
    RadialBody,
    RadialResize(ResizeAnchor),
    RadialRotate,
    LinearBody,
    LinearStart,
    LinearEnd,
}

/// One of the two band edges of a linear mask, on the positive or negative
/// side of the centre line's normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    Positive,
    Negative,
}

impl RangeEdge {
    fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Shape(ShapeHandle),
    Range(RangeEdge),
}

/// Render-space placement of a radial shape: the transform a drag applies
/// on top of the committed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialTransform {
    pub center: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees
    pub rotation: f64,
}

impl RadialTransform {
    /// Identity transform for `radial`: scale 1, its own centre and rotation.
    pub fn identity(radial: &RadialMaskParameters, mapper: &CoordinateMapper) -> Self {
        Self {
            center: mapper.image_to_render(radial.center()),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: radial.rotation,
        }
    }

    /// Fold the transform into new parameters. The scale is consumed here, so
    /// the next drag starts again from scale 1.
    pub fn commit(
        &self,
        radial: &RadialMaskParameters,
        mapper: &CoordinateMapper,
    ) -> RadialMaskParameters {
        RadialMaskParameters {
            radius_x: radial.radius_x * self.scale_x.abs(),
            radius_y: radial.radius_y * self.scale_y.abs(),
            rotation: self.rotation,
            ..radial.with_center(mapper.render_to_image(self.center))
        }
    }
}

struct RadialFrame {
    center: Point,
    rx: f64,
    ry: f64,
    angle: f64,
}

impl RadialFrame {
    fn new(radial: &RadialMaskParameters, mapper: &CoordinateMapper) -> Self {
        Self {
            center: mapper.image_to_render(radial.center()),
            rx: mapper.image_length_to_render(radial.radius_x),
            ry: mapper.image_length_to_render(radial.radius_y),
            angle: radial.rotation.to_radians(),
        }
    }

    fn to_local(&self, p: Point) -> Point {
        (p - self.center).rotated(-self.angle)
    }

    fn to_render(&self, local: Point) -> Point {
        local.rotated(self.angle) + self.center
    }

    fn anchor_position(&self, anchor: ResizeAnchor) -> Point {
        self.to_render(Point::new(
            f64::from(anchor.x) * self.rx,
            f64::from(anchor.y) * self.ry,
        ))
    }

    fn rotate_handle_position(&self, offset: f64) -> Point {
        self.to_render(Point::new(0.0, -(self.ry + offset)))
    }

    fn contains(&self, p: Point) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let q = self.to_local(p);
        (q.x / self.rx).powi(2) + (q.y / self.ry).powi(2) <= 1.0
    }
}

struct LinearFrame {
    mid: Point,
    axis: Point,
    normal: Point,
    half_len: f64,
    range: f64,
    start: Point,
    end: Point,
}

impl LinearFrame {
    fn new(linear: &LinearMaskParameters, mapper: &CoordinateMapper) -> Self {
        let start = mapper.image_to_render(linear.start());
        let end = mapper.image_to_render(linear.end());
        let angle = linear.axis_angle();
        let (sin, cos) = angle.sin_cos();
        Self {
            mid: mapper.image_to_render(linear.midpoint()),
            axis: Point::new(cos, sin),
            normal: Point::new(-sin, cos),
            half_len: start.distance_to(end) / 2.0,
            range: mapper.image_length_to_render(linear.range),
            start,
            end,
        }
    }

    /// (along axis, along normal)
    fn to_local(&self, p: Point) -> Point {
        let d = p - self.mid;
        Point::new(
            d.x * self.axis.x + d.y * self.axis.y,
            d.x * self.normal.x + d.y * self.normal.y,
        )
    }

    fn edge_anchor(&self, edge: RangeEdge) -> Point {
        self.mid + self.normal * (edge.sign() * self.range)
    }
}

/// Hit-test one shape. Handles are only offered for the active shape.
pub fn hit_test(
    parameters: &SubMaskParameters,
    mapper: &CoordinateMapper,
    p: Point,
    config: &InteractionConfig,
    with_handles: bool,
) -> Option<HandleHit> {
    match parameters {
        SubMaskParameters::Radial(radial) => {
            hit_test_radial(radial, mapper, p, config, with_handles)
        }
        SubMaskParameters::Linear(linear) => {
            hit_test_linear(linear, mapper, p, config, with_handles)
        }
        _ => None,
    }
}

fn hit_test_radial(
    radial: &RadialMaskParameters,
    mapper: &CoordinateMapper,
    p: Point,
    config: &InteractionConfig,
    with_handles: bool,
) -> Option<HandleHit> {
    let frame = RadialFrame::new(radial, mapper);
    let reach = f64::from(config.handle_hit_radius);

    if with_handles {
        if frame
            .rotate_handle_position(f64::from(config.rotate_handle_offset))
            .distance_to(p)
            <= reach
        {
            return Some(HandleHit::Shape(ShapeHandle::RadialRotate));
        }
        for anchor in ResizeAnchor::ALL {
            if frame.anchor_position(anchor).distance_to(p) <= reach {
                return Some(HandleHit::Shape(ShapeHandle::RadialResize(anchor)));
            }
        }
    }

    frame
        .contains(p)
        .then_some(HandleHit::Shape(ShapeHandle::RadialBody))
}

fn hit_test_linear(
    linear: &LinearMaskParameters,
    mapper: &CoordinateMapper,
    p: Point,
    config: &InteractionConfig,
    with_handles: bool,
) -> Option<HandleHit> {
    let frame = LinearFrame::new(linear, mapper);
    let reach = f64::from(config.handle_hit_radius);
    let tol = f64::from(config.line_hit_tolerance);
    let local = frame.to_local(p);
    let within_length = local.x.abs() <= frame.half_len + tol;

    if with_handles {
        if frame.start.distance_to(p) <= reach {
            return Some(HandleHit::Shape(ShapeHandle::LinearStart));
        }
        if frame.end.distance_to(p) <= reach {
            return Some(HandleHit::Shape(ShapeHandle::LinearEnd));
        }
        if within_length {
            if (local.y - frame.range).abs() <= tol {
                return Some(HandleHit::Range(RangeEdge::Positive));
            }
            if (local.y + frame.range).abs() <= tol {
                return Some(HandleHit::Range(RangeEdge::Negative));
            }
        }
    }

    (within_length && local.y.abs() <= tol).then_some(HandleHit::Shape(ShapeHandle::LinearBody))
}

/// New parameters for a shape drag, from the drag-start `snapshot`.
pub fn drag_shape(
    snapshot: &SubMaskParameters,
    handle: ShapeHandle,
    origin: Point,
    pointer: Point,
    mapper: &CoordinateMapper,
) -> Option<SubMaskParameters> {
    match (snapshot, handle) {
        (
            SubMaskParameters::Radial(radial),
            ShapeHandle::RadialBody | ShapeHandle::RadialResize(_) | ShapeHandle::RadialRotate,
        ) => {
            let transform = radial_transform(radial, handle, origin, pointer, mapper);
            Some(SubMaskParameters::Radial(transform.commit(radial, mapper)))
        }
        (
            SubMaskParameters::Linear(linear),
            ShapeHandle::LinearBody | ShapeHandle::LinearStart | ShapeHandle::LinearEnd,
        ) => Some(SubMaskParameters::Linear(drag_linear(
            linear, handle, origin, pointer, mapper,
        ))),
        _ => None,
    }
}

/// Transform produced by dragging `handle` from `origin` to `pointer`.
pub fn radial_transform(
    radial: &RadialMaskParameters,
    handle: ShapeHandle,
    origin: Point,
    pointer: Point,
    mapper: &CoordinateMapper,
) -> RadialTransform {
    let mut transform = RadialTransform::identity(radial, mapper);
    let frame = RadialFrame::new(radial, mapper);

    match handle {
        ShapeHandle::RadialBody => {
            transform.center = frame.center + (pointer - origin);
        }
        ShapeHandle::RadialRotate => {
            let d = pointer - frame.center;
            if d.length() > 0.0 {
                // The handle sits above the shape, so straight up is 0°.
                let degrees = d.y.atan2(d.x).to_degrees() + 90.0;
                transform.rotation = normalize_degrees(degrees);
            }
        }
        ShapeHandle::RadialResize(anchor) => {
            let q = frame.to_local(pointer);
            let mut local_center = Point::default();
            if anchor.x != 0 && frame.rx > 0.0 {
                let ax = f64::from(anchor.x);
                // Opposite edge stays put at -ax * rx.
                let new_rx = ((ax * q.x + frame.rx) / 2.0).max(MIN_RENDER_RADIUS);
                local_center.x = -ax * frame.rx + ax * new_rx;
                transform.scale_x = new_rx / frame.rx;
            }
            if anchor.y != 0 && frame.ry > 0.0 {
                let ay = f64::from(anchor.y);
                let new_ry = ((ay * q.y + frame.ry) / 2.0).max(MIN_RENDER_RADIUS);
                local_center.y = -ay * frame.ry + ay * new_ry;
                transform.scale_y = new_ry / frame.ry;
            }
            transform.center = frame.to_render(local_center);
        }
        _ => {}
    }

    transform
}

fn drag_linear(
    linear: &LinearMaskParameters,
    handle: ShapeHandle,
    origin: Point,
    pointer: Point,
    mapper: &CoordinateMapper,
) -> LinearMaskParameters {
    match handle {
        ShapeHandle::LinearStart => linear.with_start(mapper.render_to_image(pointer)),
        ShapeHandle::LinearEnd => linear.with_end(mapper.render_to_image(pointer)),
        ShapeHandle::LinearBody => {
            let delta = pointer - origin;
            linear.translated(Point::new(
                mapper.render_length_to_image(delta.x),
                mapper.render_length_to_image(delta.y),
            ))
        }
        _ => *linear,
    }
}

/// Drag a band edge. Only the component of the motion along the centre
/// line's normal is kept; `range = |local_y / scale|`.
pub fn drag_range(
    linear: &LinearMaskParameters,
    edge: RangeEdge,
    origin: Point,
    pointer: Point,
    mapper: &CoordinateMapper,
) -> LinearMaskParameters {
    let frame = LinearFrame::new(linear, mapper);
    let proposed = frame.edge_anchor(edge) + (pointer - origin);
    let local_y = frame.to_local(proposed).y;
    LinearMaskParameters {
        range: (local_y / mapper.scale()).abs(),
        ..*linear
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(scale: f64) -> CoordinateMapper {
        CoordinateMapper::new(scale, Point::new(100.0, 100.0)).unwrap()
    }

    fn radial() -> RadialMaskParameters {
        RadialMaskParameters {
            center_x: 300.0,
            center_y: 300.0,
            radius_x: 100.0,
            radius_y: 50.0,
            rotation: 0.0,
            feather: 0.5,
        }
    }

    fn horizontal_linear() -> LinearMaskParameters {
        LinearMaskParameters {
            start_x: 200.0,
            start_y: 300.0,
            end_x: 600.0,
            end_y: 300.0,
            range: 40.0,
        }
    }

    #[test]
    fn body_drag_moves_center_by_render_delta_over_scale() {
        let m = mapper(0.5);
        let out = drag_shape(
            &SubMaskParameters::Radial(radial()),
            ShapeHandle::RadialBody,
            Point::new(10.0, 10.0),
            Point::new(30.0, 0.0),
            &m,
        );
        let Some(SubMaskParameters::Radial(r)) = out else {
            panic!("radial drag should produce radial parameters");
        };
        assert!((r.center_x - 340.0).abs() < 1e-9);
        assert!((r.center_y - 280.0).abs() < 1e-9);
        assert_eq!(r.radius_x, 100.0);
    }

    #[test]
    fn right_edge_resize_keeps_left_edge() {
        let m = mapper(1.0);
        let r = radial();
        let frame = RadialFrame::new(&r, &m);
        let handle_pos = frame.anchor_position(ResizeAnchor::RIGHT);
        let t = radial_transform(
            &r,
            ShapeHandle::RadialResize(ResizeAnchor::RIGHT),
            handle_pos,
            handle_pos + Point::new(50.0, 0.0),
            &m,
        );
        assert!((t.scale_x - 1.25).abs() < 1e-9);
        assert_eq!(t.scale_y, 1.0);
        let committed = t.commit(&r, &m);
        assert!((committed.radius_x - 125.0).abs() < 1e-9);
        assert!((committed.center_x - 325.0).abs() < 1e-9);
        // Left edge: 325 - 125 == 300 - 100
        assert!((committed.center_x - committed.radius_x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn resize_never_flips_through_anchor() {
        let m = mapper(1.0);
        let r = radial();
        let t = radial_transform(
            &r,
            ShapeHandle::RadialResize(ResizeAnchor::BOTTOM_RIGHT),
            Point::new(0.0, 0.0),
            Point::new(-500.0, -500.0),
            &m,
        );
        let committed = t.commit(&r, &m);
        assert!(committed.radius_x > 0.0);
        assert!(committed.radius_y > 0.0);
    }

    #[test]
    fn repeated_moves_do_not_compound() {
        let m = mapper(1.0);
        let r = radial();
        let handle = ShapeHandle::RadialResize(ResizeAnchor::RIGHT);
        let origin = RadialFrame::new(&r, &m).anchor_position(ResizeAnchor::RIGHT);
        let target = origin + Point::new(20.0, 0.0);
        let once = drag_shape(&SubMaskParameters::Radial(r), handle, origin, target, &m);
        let twice = drag_shape(&SubMaskParameters::Radial(r), handle, origin, target, &m);
        assert_eq!(once, twice);
    }

    #[test]
    fn rotate_handle_sets_angle() {
        let m = mapper(1.0);
        let r = radial();
        let center = m.image_to_render(r.center());
        let t = radial_transform(
            &r,
            ShapeHandle::RadialRotate,
            Point::default(),
            center + Point::new(100.0, 0.0),
            &m,
        );
        assert!((t.rotation - 90.0).abs() < 1e-9);
        let up = radial_transform(
            &r,
            ShapeHandle::RadialRotate,
            Point::default(),
            center + Point::new(0.0, -100.0),
            &m,
        );
        assert!(up.rotation.abs() < 1e-9);
    }

    #[test]
    fn range_drag_ignores_motion_along_line() {
        // Horizontal centre line: falloff runs at 90°, so only vertical motion counts.
        let m = mapper(0.5);
        let linear = horizontal_linear();
        assert!((linear.falloff_angle_degrees() - 90.0).abs() < 1e-9);
        let out = drag_range(
            &linear,
            RangeEdge::Positive,
            Point::new(50.0, 50.0),
            Point::new(180.0, 50.0),
            &m,
        );
        assert!((out.range - linear.range).abs() < 1e-9);
    }

    #[test]
    fn range_drag_follows_normal_motion() {
        let m = mapper(0.5);
        let linear = horizontal_linear();
        let out = drag_range(
            &linear,
            RangeEdge::Positive,
            Point::new(50.0, 50.0),
            Point::new(77.0, 60.0),
            &m,
        );
        // 40 image px = 20 render px; +10 render px -> 30 render px = 60 image px
        assert!((out.range - 60.0).abs() < 1e-9);
        assert_eq!(out.start(), linear.start());
    }

    #[test]
    fn range_drag_past_centre_stays_positive() {
        let m = mapper(1.0);
        let linear = horizontal_linear();
        let out = drag_range(
            &linear,
            RangeEdge::Negative,
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            &m,
        );
        assert!((out.range - 60.0).abs() < 1e-9);
    }

    #[test]
    fn linear_body_drag_translates_both_endpoints() {
        let m = mapper(2.0);
        let Some(SubMaskParameters::Linear(out)) = drag_shape(
            &SubMaskParameters::Linear(horizontal_linear()),
            ShapeHandle::LinearBody,
            Point::new(0.0, 0.0),
            Point::new(20.0, -10.0),
            &m,
        ) else {
            panic!("linear drag should produce linear parameters");
        };
        assert_eq!(out.start(), Point::new(210.0, 295.0));
        assert_eq!(out.end(), Point::new(610.0, 295.0));
        assert_eq!(out.range, 40.0);
    }

    #[test]
    fn endpoint_drag_moves_one_end() {
        let m = mapper(1.0);
        let Some(SubMaskParameters::Linear(out)) = drag_shape(
            &SubMaskParameters::Linear(horizontal_linear()),
            ShapeHandle::LinearEnd,
            Point::new(500.0, 200.0),
            Point::new(520.0, 260.0),
            &m,
        ) else {
            panic!("linear drag should produce linear parameters");
        };
        assert_eq!(out.start(), horizontal_linear().start());
        assert_eq!(out.end(), Point::new(620.0, 360.0));
    }

    #[test]
    fn hit_test_prefers_handles_then_body() {
        let m = mapper(1.0);
        let config = InteractionConfig::default();
        let params = SubMaskParameters::Linear(horizontal_linear());
        // render: start (100, 200), end (500, 200), range 40
        assert_eq!(
            hit_test(&params, &m, Point::new(101.0, 201.0), &config, true),
            Some(HandleHit::Shape(ShapeHandle::LinearStart))
        );
        assert_eq!(
            hit_test(&params, &m, Point::new(300.0, 241.0), &config, true),
            Some(HandleHit::Range(RangeEdge::Positive))
        );
        assert_eq!(
            hit_test(&params, &m, Point::new(300.0, 160.0), &config, true),
            Some(HandleHit::Range(RangeEdge::Negative))
        );
        assert_eq!(
            hit_test(&params, &m, Point::new(300.0, 202.0), &config, true),
            Some(HandleHit::Shape(ShapeHandle::LinearBody))
        );
        assert_eq!(
            hit_test(&params, &m, Point::new(300.0, 241.0), &config, false),
            None
        );
        assert_eq!(hit_test(&params, &m, Point::new(300.0, 120.0), &config, true), None);
    }

    #[test]
    fn radial_hit_uses_rotated_ellipse() {
        let m = mapper(1.0);
        let config = InteractionConfig::default();
        let rotated = RadialMaskParameters {
            rotation: 90.0,
            ..radial()
        };
        let params = SubMaskParameters::Radial(rotated);
        // centre in render space is (200, 200); long axis is now vertical
        assert_eq!(
            hit_test(&params, &m, Point::new(200.0, 280.0), &config, false),
            Some(HandleHit::Shape(ShapeHandle::RadialBody))
        );
        assert_eq!(hit_test(&params, &m, Point::new(280.0, 200.0), &config, false), None);
    }

    #[test]
    fn normalizes_degrees_into_half_open_range() {
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
    }
}
