//! Pointer interaction states

use super::handles::{RangeEdge, ShapeHandle};
use crate::mask::{BrushTool, LinearMaskParameters, SubMaskId, SubMaskParameters};
use crate::transform::Point;

/// Exactly one interaction is in flight at a time.
///
/// Drawing states buffer render-space points until release. Drag states keep
/// the drag-start `origin` and a `snapshot` of the parameters so each move is
/// computed from the same base.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    DrawingFreehand {
        target: SubMaskId,
        tool: BrushTool,
        points: Vec<Point>,
    },
    DrawingBox {
        target: SubMaskId,
        points: Vec<Point>,
    },
    DraggingShape {
        target: SubMaskId,
        handle: ShapeHandle,
        origin: Point,
        snapshot: SubMaskParameters,
    },
    DraggingRangeHandle {
        target: SubMaskId,
        edge: RangeEdge,
        origin: Point,
        snapshot: LinearMaskParameters,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::DrawingFreehand { .. } | Self::DrawingBox { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::DraggingShape { .. } | Self::DraggingRangeHandle { .. }
        )
    }

    /// Sub-mask the in-flight interaction edits.
    pub fn target(&self) -> Option<&SubMaskId> {
        match self {
            Self::Idle => None,
            Self::DrawingFreehand { target, .. }
            | Self::DrawingBox { target, .. }
            | Self::DraggingShape { target, .. }
            | Self::DraggingRangeHandle { target, .. } => Some(target),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DrawingFreehand { .. } => "drawing-freehand",
            Self::DrawingBox { .. } => "drawing-box",
            Self::DraggingShape { .. } => "dragging-shape",
            Self::DraggingRangeHandle { .. } => "dragging-range",
        }
    }
}
