//! Variant parameter records for sub-masks
//!
//! Every coordinate here is absolute, uncropped image space.

use serde::{Deserialize, Serialize};

use crate::transform::{Point, Size};

/// Variant tag, serialized as the record's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubMaskKind {
    Linear,
    Radial,
    Brush,
    AiSubject,
    AiForeground,
    AiSky,
    QuickErase,
}

impl SubMaskKind {
    /// Kinds drawn by dragging out a selection rectangle.
    pub fn is_box_selector(&self) -> bool {
        matches!(self, Self::AiSubject | Self::QuickErase)
    }

    /// Kinds whose stored geometry follows crop changes.
    pub fn is_reprojected(&self) -> bool {
        matches!(self, Self::Linear | Self::Radial)
    }
}

/// Whether a sub-mask adds to or removes from the container's region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskMode {
    #[default]
    Additive,
    Subtractive,
}

/// Gradient along a centre line; the falloff band extends `range` pixels to
/// either side of the line, measured along its normal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinearMaskParameters {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub range: f64,
}

impl LinearMaskParameters {
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start_x + self.end_x) / 2.0,
            (self.start_y + self.end_y) / 2.0,
        )
    }

    /// Direction of the centre line, radians.
    pub fn axis_angle(&self) -> f64 {
        (self.end_y - self.start_y).atan2(self.end_x - self.start_x)
    }

    /// Direction the gradient fades in, degrees. A horizontal line fades
    /// vertically, at 90°.
    pub fn falloff_angle_degrees(&self) -> f64 {
        (self.axis_angle() + std::f64::consts::FRAC_PI_2).to_degrees()
    }

    pub fn with_start(self, p: Point) -> Self {
        Self {
            start_x: p.x,
            start_y: p.y,
            ..self
        }
    }

    pub fn with_end(self, p: Point) -> Self {
        Self {
            end_x: p.x,
            end_y: p.y,
            ..self
        }
    }

    pub fn translated(self, delta: Point) -> Self {
        Self {
            start_x: self.start_x + delta.x,
            start_y: self.start_y + delta.y,
            end_x: self.end_x + delta.x,
            end_y: self.end_y + delta.y,
            range: self.range,
        }
    }
}

/// Rotated ellipse with a normalized feather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialMaskParameters {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Degrees
    pub rotation: f64,
    /// 0.0 - 1.0
    pub feather: f64,
}

impl Default for RadialMaskParameters {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            radius_x: 0.0,
            radius_y: 0.0,
            rotation: 0.0,
            feather: 0.5,
        }
    }
}

impl RadialMaskParameters {
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    pub fn with_center(self, p: Point) -> Self {
        Self {
            center_x: p.x,
            center_y: p.y,
            ..self
        }
    }
}

/// Tool a brush line was recorded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushTool {
    #[default]
    Brush,
    Eraser,
}

/// One committed stroke.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrushLine {
    pub tool: BrushTool,
    /// Image-space diameter
    pub brush_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feather: Option<f64>,
    pub points: Vec<Point>,
}

impl BrushLine {
    pub fn is_eraser(&self) -> bool {
        self.tool == BrushTool::Eraser
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrushMaskParameters {
    pub lines: Vec<BrushLine>,
}

/// Normalized grow/feather refinement shared by the AI variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiRefinement {
    pub grow: f64,
    pub feather: f64,
}

impl AiRefinement {
    /// Slider percentages (0 - 100) -> stored values, scaled by `multiplier`
    /// (1.0 when absent).
    pub fn from_percent(grow: f64, feather: f64, multiplier: Option<f64>) -> Self {
        let m = multiplier.unwrap_or(1.0);
        Self {
            grow: grow / 100.0 * m,
            feather: feather / 100.0 * m,
        }
    }
}

pub const DEFAULT_AI_FEATHER_PERCENT: f64 = 25.0;

/// Segmentation input box plus the service's returned mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiSubjectMaskParameters {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub grow: f64,
    pub feather: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_data_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_horizontal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_vertical: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_steps: Option<u8>,
}

impl Default for AiSubjectMaskParameters {
    fn default() -> Self {
        let refinement = AiRefinement::from_percent(0.0, DEFAULT_AI_FEATHER_PERCENT, None);
        Self {
            start_x: 0.0,
            start_y: 0.0,
            end_x: 0.0,
            end_y: 0.0,
            grow: refinement.grow,
            feather: refinement.feather,
            mask_data_base64: None,
            rotation: None,
            flip_horizontal: None,
            flip_vertical: None,
            orientation_steps: None,
        }
    }
}

/// Whole-image AI result (foreground, sky).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiRegionMaskParameters {
    pub grow: f64,
    pub feather: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_data_base64: Option<String>,
}

impl Default for AiRegionMaskParameters {
    fn default() -> Self {
        let refinement = AiRefinement::from_percent(0.0, DEFAULT_AI_FEATHER_PERCENT, None);
        Self {
            grow: refinement.grow,
            feather: refinement.feather,
            mask_data_base64: None,
        }
    }
}

/// Selection rectangle for box-driven tools without their own result payload.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxSelectionParameters {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

/// Closed set of sub-mask shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum SubMaskParameters {
    Linear(LinearMaskParameters),
    Radial(RadialMaskParameters),
    Brush(BrushMaskParameters),
    AiSubject(AiSubjectMaskParameters),
    AiForeground(AiRegionMaskParameters),
    AiSky(AiRegionMaskParameters),
    QuickErase(BoxSelectionParameters),
}

impl SubMaskParameters {
    pub fn kind(&self) -> SubMaskKind {
        match self {
            Self::Linear(_) => SubMaskKind::Linear,
            Self::Radial(_) => SubMaskKind::Radial,
            Self::Brush(_) => SubMaskKind::Brush,
            Self::AiSubject(_) => SubMaskKind::AiSubject,
            Self::AiForeground(_) => SubMaskKind::AiForeground,
            Self::AiSky(_) => SubMaskKind::AiSky,
            Self::QuickErase(_) => SubMaskKind::QuickErase,
        }
    }

    /// The variant's default record, used to fill missing persisted fields.
    pub fn default_for(kind: SubMaskKind) -> Self {
        match kind {
            SubMaskKind::Linear => Self::Linear(LinearMaskParameters::default()),
            SubMaskKind::Radial => Self::Radial(RadialMaskParameters::default()),
            SubMaskKind::Brush => Self::Brush(BrushMaskParameters::default()),
            SubMaskKind::AiSubject => Self::AiSubject(AiSubjectMaskParameters::default()),
            SubMaskKind::AiForeground => Self::AiForeground(AiRegionMaskParameters::default()),
            SubMaskKind::AiSky => Self::AiSky(AiRegionMaskParameters::default()),
            SubMaskKind::QuickErase => Self::QuickErase(BoxSelectionParameters::default()),
        }
    }

    /// Placement for a freshly created shape on a full image of `image` size.
    pub fn seed(kind: SubMaskKind, image: Size) -> Self {
        let center = image.center();
        let short_side = image.width.min(image.height);
        match kind {
            SubMaskKind::Radial => Self::Radial(RadialMaskParameters {
                center_x: center.x,
                center_y: center.y,
                radius_x: short_side / 4.0,
                radius_y: short_side / 4.0,
                ..RadialMaskParameters::default()
            }),
            SubMaskKind::Linear => Self::Linear(LinearMaskParameters {
                start_x: image.width * 0.25,
                start_y: center.y,
                end_x: image.width * 0.75,
                end_y: center.y,
                range: short_side / 10.0,
            }),
            other => Self::default_for(other),
        }
    }

    /// Image-space rectangle for box-driven variants.
    pub fn selection_box(&self) -> Option<(Point, Point)> {
        match self {
            Self::AiSubject(p) => Some((
                Point::new(p.start_x, p.start_y),
                Point::new(p.end_x, p.end_y),
            )),
            Self::QuickErase(p) => Some((
                Point::new(p.start_x, p.start_y),
                Point::new(p.end_x, p.end_y),
            )),
            _ => None,
        }
    }

    /// Store a new selection box, keeping the rest of the record.
    pub fn with_selection_box(&self, start: Point, end: Point) -> Self {
        match self {
            Self::AiSubject(p) => Self::AiSubject(AiSubjectMaskParameters {
                start_x: start.x,
                start_y: start.y,
                end_x: end.x,
                end_y: end.y,
                ..p.clone()
            }),
            Self::QuickErase(_) => Self::QuickErase(BoxSelectionParameters {
                start_x: start.x,
                start_y: start.y,
                end_x: end.x,
                end_y: end.y,
            }),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_feather_defaults_to_half() {
        let SubMaskParameters::Radial(radial) =
            SubMaskParameters::seed(SubMaskKind::Radial, Size::new(1000.0, 800.0))
        else {
            panic!("radial seed should be radial");
        };
        assert_eq!(radial.feather, 0.5);
        assert_eq!(radial.center(), Point::new(500.0, 400.0));
        assert_eq!(radial.radius_x, 200.0);
    }

    #[test]
    fn ai_variants_default_feather_is_quarter() {
        let SubMaskParameters::AiForeground(fg) =
            SubMaskParameters::seed(SubMaskKind::AiForeground, Size::new(10.0, 10.0))
        else {
            panic!("foreground seed should be foreground");
        };
        assert!((fg.feather - 0.25).abs() < 1e-12);
        assert_eq!(fg.grow, 0.0);
        assert!((AiSubjectMaskParameters::default().feather - 0.25).abs() < 1e-12);
    }

    #[test]
    fn refinement_applies_multiplier() {
        let r = AiRefinement::from_percent(50.0, 20.0, Some(2.0));
        assert!((r.grow - 1.0).abs() < 1e-12);
        assert!((r.feather - 0.4).abs() < 1e-12);
        let plain = AiRefinement::from_percent(50.0, 20.0, None);
        assert!((plain.grow - 0.5).abs() < 1e-12);
    }

    #[test]
    fn horizontal_line_falls_off_vertically() {
        let linear = LinearMaskParameters {
            start_x: 0.0,
            start_y: 50.0,
            end_x: 100.0,
            end_y: 50.0,
            range: 10.0,
        };
        assert!((linear.falloff_angle_degrees() - 90.0).abs() < 1e-9);
        assert_eq!(linear.midpoint(), Point::new(50.0, 50.0));
    }

    #[test]
    fn box_selectors_are_tagged() {
        assert!(SubMaskKind::AiSubject.is_box_selector());
        assert!(SubMaskKind::QuickErase.is_box_selector());
        assert!(!SubMaskKind::Brush.is_box_selector());
        assert!(SubMaskKind::Radial.is_reprojected());
        assert!(!SubMaskKind::Brush.is_reprojected());
    }

    #[test]
    fn with_selection_box_keeps_refinement() {
        let params = SubMaskParameters::default_for(SubMaskKind::AiSubject)
            .with_selection_box(Point::new(1.0, 2.0), Point::new(30.0, 40.0));
        let SubMaskParameters::AiSubject(subject) = &params else {
            panic!("kind should be preserved");
        };
        assert!((subject.feather - 0.25).abs() < 1e-12);
        assert_eq!(
            params.selection_box(),
            Some((Point::new(1.0, 2.0), Point::new(30.0, 40.0)))
        );
    }
}
