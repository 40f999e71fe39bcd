//! Orientation-aware geometry for the uncropped (crop-editing) view, and the
//! mapping from display space back to raw sensor space.

use serde::{Deserialize, Serialize};

use super::{Point, RenderGeometry, Size};

/// Coarse orientation in clockwise quarter turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    steps: u8,
}

impl Orientation {
    /// Any step count is accepted and reduced modulo 4.
    pub fn from_steps(steps: u8) -> Self {
        Self { steps: steps % 4 }
    }

    pub fn steps(&self) -> u8 {
        self.steps
    }

    /// 90° and 270° exchange width and height.
    pub fn swaps_axes(&self) -> bool {
        self.steps % 2 == 1
    }

    pub fn oriented_size(&self, size: Size) -> Size {
        if self.swaps_axes() {
            Size::new(size.height, size.width)
        } else {
            size
        }
    }

    /// Source pixel -> coarse-rotated pixel.
    pub fn apply(&self, p: Point, source: Size) -> Point {
        match self.steps {
            1 => Point::new(source.height - p.y, p.x),
            2 => Point::new(source.width - p.x, source.height - p.y),
            3 => Point::new(p.y, source.width - p.x),
            _ => p,
        }
    }

    /// Coarse-rotated pixel -> source pixel.
    pub fn invert(&self, p: Point, source: Size) -> Point {
        match self.steps {
            1 => Point::new(p.y, source.height - p.x),
            2 => Point::new(source.width - p.x, source.height - p.y),
            3 => Point::new(source.width - p.y, p.x),
            _ => p,
        }
    }
}

/// Fit geometry for the whole, uncropped image under an orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncroppedGeometry {
    pub orientation: Orientation,
    /// Image size after orientation
    pub effective_size: Size,
    pub render: RenderGeometry,
}

impl UncroppedGeometry {
    /// Scale is `min(viewport_w / effective_w, viewport_h / effective_h)`.
    pub fn fit(viewport: Size, image: Size, orientation: Orientation) -> Option<Self> {
        let effective_size = orientation.oriented_size(image);
        let render = RenderGeometry::fit(viewport, effective_size)?;
        Some(Self {
            orientation,
            effective_size,
            render,
        })
    }

    /// Viewport pixel -> oriented image pixel.
    pub fn viewport_to_image(&self, p: Point) -> Point {
        let r = self.render.viewport_to_render(p);
        Point::new(r.x / self.render.scale, r.y / self.render.scale)
    }

    pub fn image_to_viewport(&self, p: Point) -> Point {
        self.render
            .render_to_viewport(Point::new(p.x * self.render.scale, p.y * self.render.scale))
    }
}

/// Maps boxes drawn on the displayed (rotated, flipped, straightened) image
/// back into raw sensor coordinates, for services that work on the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMapping {
    /// Raw image dimensions before any orientation
    pub source_size: Size,
    pub orientation: Orientation,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Fine straightening angle in degrees
    pub rotation: f64,
}

impl SourceMapping {
    pub fn new(source_size: Size) -> Self {
        Self {
            source_size,
            orientation: Orientation::default(),
            flip_horizontal: false,
            flip_vertical: false,
            rotation: 0.0,
        }
    }

    fn oriented_size(&self) -> Size {
        self.orientation.oriented_size(self.source_size)
    }

    /// Sensor pixel -> display pixel (coarse rotation, flip, fine rotation).
    pub fn source_to_display(&self, p: Point) -> Point {
        let oriented = self.oriented_size();
        let mut q = self.orientation.apply(p, self.source_size);
        if self.flip_horizontal {
            q.x = oriented.width - q.x;
        }
        if self.flip_vertical {
            q.y = oriented.height - q.y;
        }
        let center = oriented.center();
        (q - center).rotated(self.rotation.to_radians()) + center
    }

    /// Display pixel -> sensor pixel.
    pub fn display_to_source(&self, p: Point) -> Point {
        let oriented = self.oriented_size();
        let center = oriented.center();
        let mut q = (p - center).rotated(-self.rotation.to_radians()) + center;
        if self.flip_horizontal {
            q.x = oriented.width - q.x;
        }
        if self.flip_vertical {
            q.y = oriented.height - q.y;
        }
        self.orientation.invert(q, self.source_size)
    }

    /// Axis-aligned sensor-space bounds of a display-space box.
    ///
    /// All four corners are mapped, since fine rotation turns the box.
    pub fn box_to_source(&self, start: Point, end: Point) -> (Point, Point) {
        let corners = [
            start,
            Point::new(start.x, end.y),
            end,
            Point::new(end.x, start.y),
        ]
        .map(|c| self.display_to_source(c));

        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in corners {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn quarter_turn_swaps_fit_axes() {
        let image = Size::new(6000.0, 4000.0);
        let viewport = Size::new(1000.0, 1000.0);

        let upright = UncroppedGeometry::fit(viewport, image, Orientation::from_steps(0)).unwrap();
        let turned = UncroppedGeometry::fit(viewport, image, Orientation::from_steps(1)).unwrap();

        assert!((upright.render.scale - 1000.0 / 6000.0).abs() < 1e-12);
        assert_eq!(turned.effective_size, Size::new(4000.0, 6000.0));
        assert!((turned.render.scale - 1000.0 / 6000.0).abs() < 1e-12);
        assert!((turned.render.width - 4000.0 / 6.0).abs() < 1e-9);
        assert!((turned.render.height - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn steps_wrap_modulo_four() {
        assert_eq!(Orientation::from_steps(5).steps(), 1);
        assert!(!Orientation::from_steps(2).swaps_axes());
        assert!(Orientation::from_steps(3).swaps_axes());
    }

    #[test]
    fn uncropped_viewport_mapping_round_trips() {
        let geometry = UncroppedGeometry::fit(
            Size::new(800.0, 600.0),
            Size::new(3000.0, 2000.0),
            Orientation::from_steps(3),
        )
        .unwrap();
        let p = Point::new(1234.0, 567.0);
        assert_close(geometry.viewport_to_image(geometry.image_to_viewport(p)), p);
    }

    #[test]
    fn orientation_apply_and_invert_are_inverse() {
        let source = Size::new(300.0, 200.0);
        let p = Point::new(40.0, 170.0);
        for steps in 0..4 {
            let o = Orientation::from_steps(steps);
            assert_close(o.invert(o.apply(p, source), source), p);
        }
    }

    #[test]
    fn quarter_turn_maps_top_left_to_top_right() {
        let source = Size::new(300.0, 200.0);
        let o = Orientation::from_steps(1);
        assert_close(o.apply(Point::new(0.0, 0.0), source), Point::new(200.0, 0.0));
        assert_close(o.invert(Point::new(200.0, 0.0), source), Point::new(0.0, 0.0));
    }

    #[test]
    fn display_to_source_inverts_full_chain() {
        let mapping = SourceMapping {
            source_size: Size::new(4000.0, 3000.0),
            orientation: Orientation::from_steps(1),
            flip_horizontal: true,
            flip_vertical: false,
            rotation: 12.5,
        };
        let p = Point::new(812.0, 2210.0);
        assert_close(mapping.display_to_source(mapping.source_to_display(p)), p);
    }

    #[test]
    fn box_without_transforms_is_unchanged() {
        let mapping = SourceMapping::new(Size::new(1000.0, 800.0));
        let (start, end) = mapping.box_to_source(Point::new(10.0, 20.0), Point::new(300.0, 400.0));
        assert_close(start, Point::new(10.0, 20.0));
        assert_close(end, Point::new(300.0, 400.0));
    }

    #[test]
    fn horizontal_flip_mirrors_box() {
        let mapping = SourceMapping {
            flip_horizontal: true,
            ..SourceMapping::new(Size::new(1000.0, 800.0))
        };
        let (start, end) = mapping.box_to_source(Point::new(10.0, 20.0), Point::new(300.0, 400.0));
        assert_close(start, Point::new(700.0, 20.0));
        assert_close(end, Point::new(990.0, 400.0));
    }

    #[test]
    fn fine_rotation_grows_bounds() {
        let mapping = SourceMapping {
            rotation: 45.0,
            ..SourceMapping::new(Size::new(1000.0, 1000.0))
        };
        let (start, end) =
            mapping.box_to_source(Point::new(400.0, 400.0), Point::new(600.0, 600.0));
        let width = end.x - start.x;
        assert!((width - 200.0 * std::f64::consts::SQRT_2).abs() < 1e-6);
    }
}
