//! Interactive mask editing
//!
//! [`CanvasController`] turns render-space pointer events into
//! [`CanvasAction`]s: selection changes and mask edits for the host to apply.
//! Box-driven tools hand their rectangle to a [`SelectionSink`].

mod controller;
pub mod eraser;
pub mod handles;
mod state;

pub use controller::{CanvasAction, CanvasContext, CanvasController};
pub use handles::{HandleHit, RadialTransform, RangeEdge, ResizeAnchor, ShapeHandle};
pub use state::InteractionState;

use crate::core::BrushDefaults;
use crate::mask::{BrushTool, SubMaskId, SubMaskKind};
use crate::transform::Point;

/// Live brush settings. `size` is in render pixels and is converted to image
/// pixels when a stroke is committed; `feather` is stored as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    pub size: f64,
    pub feather: f64,
    pub tool: BrushTool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self::from(&BrushDefaults::default())
    }
}

impl From<&BrushDefaults> for BrushSettings {
    fn from(defaults: &BrushDefaults) -> Self {
        Self {
            size: f64::from(defaults.size),
            feather: f64::from(defaults.feather),
            tool: BrushTool::Brush,
        }
    }
}

/// A committed selection rectangle, in image space, for the external
/// segmentation or inpainting service.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    pub kind: SubMaskKind,
    pub target: SubMaskId,
    pub start: Point,
    pub end: Point,
}

/// Receives committed selection rectangles. The result comes back later as a
/// regular parameter update on `target`.
pub trait SelectionSink {
    fn request(&mut self, request: SelectionRequest);
}

impl<F> SelectionSink for F
where
    F: FnMut(SelectionRequest),
{
    fn request(&mut self, request: SelectionRequest) {
        self(request)
    }
}
