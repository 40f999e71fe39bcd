//! Crop reprojection
//!
//! Maps image-centred geometry into the crop the user is looking at: a point
//! at offset `d` from the image centre lands at offset `d * ratio` from the
//! crop centre, where `ratio = crop size / image size` per axis.

use super::types::{LinearMaskParameters, RadialMaskParameters, SubMaskParameters};
use crate::transform::{CropRect, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropReprojection {
    ratio_x: f64,
    ratio_y: f64,
    crop_center: Point,
    image_center: Point,
}

impl CropReprojection {
    /// `None` when there is nothing to do: degenerate sizes, or a crop that
    /// spans the full frame.
    pub fn new(crop: &CropRect, image: Size) -> Option<Self> {
        if image.is_degenerate() || crop.size().is_degenerate() {
            return None;
        }
        if crop.is_full_frame(image) {
            return None;
        }
        Some(Self {
            ratio_x: crop.width / image.width,
            ratio_y: crop.height / image.height,
            crop_center: crop.center(),
            image_center: image.center(),
        })
    }

    pub fn ratio(&self) -> (f64, f64) {
        (self.ratio_x, self.ratio_y)
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.crop_center.x + (p.x - self.image_center.x) * self.ratio_x,
            self.crop_center.y + (p.y - self.image_center.y) * self.ratio_y,
        )
    }

    /// Rewrite linear/radial geometry; every other variant is returned as is.
    pub fn apply(&self, parameters: &SubMaskParameters) -> SubMaskParameters {
        match parameters {
            SubMaskParameters::Linear(linear) => {
                let start = self.map_point(linear.start());
                let end = self.map_point(linear.end());
                SubMaskParameters::Linear(LinearMaskParameters {
                    start_x: start.x,
                    start_y: start.y,
                    end_x: end.x,
                    end_y: end.y,
                    range: linear.range,
                })
            }
            SubMaskParameters::Radial(radial) => {
                let center = self.map_point(radial.center());
                SubMaskParameters::Radial(RadialMaskParameters {
                    center_x: center.x,
                    center_y: center.y,
                    radius_x: radial.radius_x * self.ratio_x,
                    radius_y: radial.radius_y * self.ratio_y,
                    ..*radial
                })
            }
            other => other.clone(),
        }
    }
}

/// One-shot helper: reproject `parameters` for `crop`, or return them unchanged.
pub fn reproject_for_crop(
    parameters: &SubMaskParameters,
    crop: &CropRect,
    image: Size,
) -> SubMaskParameters {
    match CropReprojection::new(crop, image) {
        Some(reprojection) => reprojection.apply(parameters),
        None => parameters.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::types::{BrushLine, BrushMaskParameters, BrushTool, SubMaskKind};

    const IMAGE: Size = Size::new(1000.0, 1000.0);

    fn radial(center_x: f64, center_y: f64, r: f64) -> SubMaskParameters {
        SubMaskParameters::Radial(RadialMaskParameters {
            center_x,
            center_y,
            radius_x: r,
            radius_y: r * 0.5,
            rotation: 30.0,
            feather: 0.5,
        })
    }

    #[test]
    fn full_frame_crop_is_identity() {
        let crop = CropRect::full_frame(IMAGE);
        let linear = SubMaskParameters::Linear(LinearMaskParameters {
            start_x: 10.0,
            start_y: 20.0,
            end_x: 900.0,
            end_y: 800.0,
            range: 50.0,
        });
        let r = radial(123.0, 456.0, 78.0);
        assert_eq!(reproject_for_crop(&linear, &crop, IMAGE), linear);
        assert_eq!(reproject_for_crop(&r, &crop, IMAGE), r);
        assert!(CropReprojection::new(&crop, IMAGE).is_none());
    }

    #[test]
    fn radius_scales_by_ratio() {
        let crop = CropRect::new(100.0, 0.0, 400.0, 800.0);
        let reprojection = CropReprojection::new(&crop, IMAGE).unwrap();
        assert_eq!(reprojection.ratio(), (0.4, 0.8));
        let SubMaskParameters::Radial(out) = reprojection.apply(&radial(500.0, 500.0, 200.0))
        else {
            panic!("radial stays radial");
        };
        assert!((out.radius_x - 80.0).abs() < 1e-9);
        assert!((out.radius_y - 80.0).abs() < 1e-9);
        assert_eq!(out.rotation, 30.0);
        assert_eq!(out.feather, 0.5);
    }

    #[test]
    fn recentres_radial_into_crop() {
        let crop = CropRect::new(250.0, 250.0, 500.0, 500.0);
        let SubMaskParameters::Radial(out) =
            reproject_for_crop(&radial(700.0, 300.0, 100.0), &crop, IMAGE)
        else {
            panic!("radial stays radial");
        };
        assert!((out.center_x - (500.0 + (700.0 - 500.0) * 0.5)).abs() < 1e-9);
        assert!((out.center_y - (500.0 + (300.0 - 500.0) * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn linear_endpoints_scale_per_axis() {
        let crop = CropRect::new(0.0, 500.0, 500.0, 250.0);
        let input = SubMaskParameters::Linear(LinearMaskParameters {
            start_x: 250.0,
            start_y: 500.0,
            end_x: 750.0,
            end_y: 900.0,
            range: 40.0,
        });
        let SubMaskParameters::Linear(out) = reproject_for_crop(&input, &crop, IMAGE) else {
            panic!("linear stays linear");
        };
        // crop centre (250, 625), ratios (0.5, 0.25)
        assert!((out.start_x - 125.0).abs() < 1e-9);
        assert!((out.start_y - 625.0).abs() < 1e-9);
        assert!((out.end_x - 375.0).abs() < 1e-9);
        assert!((out.end_y - 725.0).abs() < 1e-9);
        assert_eq!(out.range, 40.0);
    }

    #[test]
    fn brush_and_boxes_are_untouched() {
        let crop = CropRect::new(250.0, 250.0, 500.0, 500.0);
        let brush = SubMaskParameters::Brush(BrushMaskParameters {
            lines: vec![BrushLine {
                tool: BrushTool::Brush,
                brush_size: 10.0,
                feather: Some(0.5),
                points: vec![Point::new(1.0, 2.0)],
            }],
        });
        let subject = SubMaskParameters::default_for(SubMaskKind::AiSubject)
            .with_selection_box(Point::new(10.0, 10.0), Point::new(90.0, 90.0));
        assert_eq!(reproject_for_crop(&brush, &crop, IMAGE), brush);
        assert_eq!(reproject_for_crop(&subject, &crop, IMAGE), subject);
    }

    #[test]
    fn degenerate_inputs_skip() {
        let crop = CropRect::new(0.0, 0.0, 0.0, 100.0);
        let r = radial(1.0, 2.0, 3.0);
        assert_eq!(reproject_for_crop(&r, &crop, IMAGE), r);
        let ok_crop = CropRect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(reproject_for_crop(&r, &ok_crop, Size::new(0.0, 0.0)), r);
    }
}
