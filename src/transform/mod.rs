//! Coordinate transforms between image space, crop space and render space
//!
//! - **Image space**: absolute pixels of the full, uncropped source image.
//! - **Render space**: canvas pixels of the displayed image, origin at the
//!   top-left corner of the (cropped, scaled) image.
//! - **Viewport space**: render space shifted by the centring offset.

mod mapper;
pub mod orientation;

pub use mapper::CoordinateMapper;
pub use orientation::{Orientation, SourceMapping, UncroppedGeometry};

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D point; the space it lives in is given by context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rotate about the origin by `radians` (counter-clockwise in a y-up frame,
    /// clockwise on screen).
    pub fn rotated(&self, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Width/height pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Crop rectangle in image space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The crop covering the whole image.
    pub fn full_frame(image: Size) -> Self {
        Self::new(0.0, 0.0, image.width, image.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the crop has the same dimensions as the image.
    ///
    /// Only the size matters: a same-size crop cannot be offset inside the image.
    pub fn is_full_frame(&self, image: Size) -> bool {
        self.width == image.width && self.height == image.height
    }
}

/// Derived placement of the displayed image inside the viewport.
///
/// Recomputed whenever the viewport, zoom or crop changes; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderGeometry {
    /// Render pixels per (post-crop, post-orientation) image pixel
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Rendered image width in render pixels
    pub width: f64,
    /// Rendered image height in render pixels
    pub height: f64,
}

impl RenderGeometry {
    /// Fit `content` (image pixels) into `viewport` (render pixels), centred.
    ///
    /// Returns `None` for zero-size inputs instead of a NaN scale.
    pub fn fit(viewport: Size, content: Size) -> Option<Self> {
        if viewport.is_degenerate() || content.is_degenerate() {
            return None;
        }
        let scale = (viewport.width / content.width).min(viewport.height / content.height);
        Self::with_scale(viewport, content, scale)
    }

    /// Place `content` at an explicit `scale` (zoomed view), centred in `viewport`.
    pub fn with_scale(viewport: Size, content: Size, scale: f64) -> Option<Self> {
        if content.is_degenerate() || !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let width = content.width * scale;
        let height = content.height * scale;
        Some(Self {
            scale,
            offset_x: (viewport.width - width) / 2.0,
            offset_y: (viewport.height - height) / 2.0,
            width,
            height,
        })
    }

    /// Viewport pixel -> render pixel (removes the centring offset).
    pub fn viewport_to_render(&self, p: Point) -> Point {
        Point::new(p.x - self.offset_x, p.y - self.offset_y)
    }

    pub fn render_to_viewport(&self, p: Point) -> Point {
        Point::new(p.x + self.offset_x, p.y + self.offset_y)
    }

    /// Image dimensions as seen by the user: render size divided by scale.
    pub fn logical_size(&self) -> Option<Size> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return None;
        }
        Some(Size::new(self.width / self.scale, self.height / self.scale))
    }

    pub fn render_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
