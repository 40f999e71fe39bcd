use super::{CropRect, Point, RenderGeometry};

/// Maps between render space and absolute image space for one crop framing.
///
/// `image = render / scale + crop_origin`, `render = (image - crop_origin) * scale`.
/// A mapper only exists for a positive, finite scale, so callers holding one
/// never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    scale: f64,
    crop_origin: Point,
}

impl CoordinateMapper {
    pub fn new(scale: f64, crop_origin: Point) -> Option<Self> {
        if !scale.is_finite() || scale <= 0.0 || !crop_origin.is_finite() {
            return None;
        }
        Some(Self { scale, crop_origin })
    }

    /// Mapper for the current render geometry; `crop` of `None` means full frame.
    pub fn from_geometry(geometry: &RenderGeometry, crop: Option<&CropRect>) -> Option<Self> {
        let origin = crop.map(CropRect::origin).unwrap_or_default();
        Self::new(geometry.scale, origin)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn crop_origin(&self) -> Point {
        self.crop_origin
    }

    pub fn render_to_image(&self, p: Point) -> Point {
        Point::new(
            p.x / self.scale + self.crop_origin.x,
            p.y / self.scale + self.crop_origin.y,
        )
    }

    pub fn image_to_render(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.crop_origin.x) * self.scale,
            (p.y - self.crop_origin.y) * self.scale,
        )
    }

    /// Lengths (brush sizes, radii, range) carry no origin.
    pub fn render_length_to_image(&self, len: f64) -> f64 {
        len / self.scale
    }

    pub fn image_length_to_render(&self, len: f64) -> f64 {
        len * self.scale
    }
}
