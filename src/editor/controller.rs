//! Pointer event state machine

use super::eraser;
use super::handles::{self, HandleHit};
use super::state::InteractionState;
use super::{BrushSettings, SelectionRequest, SelectionSink};
use crate::core::{CanvasConfig, InteractionConfig};
use crate::mask::{
    BrushLine, BrushTool, MaskContainer, MaskEdit, SubMask, SubMaskId, SubMaskKind,
    SubMaskParameters,
};
use crate::transform::{CoordinateMapper, Point};

/// What the host should do after a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    None,
    /// Make this sub-mask the active one
    Select(SubMaskId),
    /// Clear the active sub-mask
    Deselect,
    /// Apply to the open container
    Edit(MaskEdit),
}

/// Per-event view of host state.
///
/// `mapper` is `None` while the render scale is degenerate; every geometry
/// path is then a no-op.
#[derive(Debug, Clone, Copy)]
pub struct CanvasContext<'a> {
    pub container: &'a MaskContainer,
    pub active: Option<&'a SubMaskId>,
    pub mapper: Option<CoordinateMapper>,
}

impl<'a> CanvasContext<'a> {
    pub fn new(
        container: &'a MaskContainer,
        active: Option<&'a SubMaskId>,
        mapper: Option<CoordinateMapper>,
    ) -> Self {
        Self {
            container,
            active,
            mapper,
        }
    }

    fn active_sub_mask(&self) -> Option<&'a SubMask> {
        self.container.sub_mask(self.active?)
    }
}

#[derive(Debug, Clone)]
pub struct CanvasController {
    state: InteractionState,
    brush: BrushSettings,
    interaction: InteractionConfig,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            brush: BrushSettings::from(&config.brush),
            interaction: config.interaction.clone(),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = brush;
    }

    /// Render-space points of the stroke being drawn, for live preview.
    pub fn live_stroke(&self) -> Option<&[Point]> {
        match &self.state {
            InteractionState::DrawingFreehand { points, .. } => Some(points),
            _ => None,
        }
    }

    /// Render-space rectangle of the box being drawn, for live preview.
    pub fn live_box(&self) -> Option<(Point, Point)> {
        match &self.state {
            InteractionState::DrawingBox { points, .. } => bounding_box(points),
            _ => None,
        }
    }

    fn transition(&mut self, next: InteractionState) {
        tracing::debug!(
            "Canvas interaction {} -> {}",
            self.state.name(),
            next.name()
        );
        self.state = next;
    }

    fn take_state(&mut self) -> InteractionState {
        let state = std::mem::take(&mut self.state);
        if !state.is_idle() {
            tracing::debug!("Canvas interaction {} -> idle", state.name());
        }
        state
    }

    pub fn pointer_down(&mut self, ctx: &CanvasContext<'_>, pos: Option<Point>) -> CanvasAction {
        let Some(pos) = pos.filter(Point::is_finite) else {
            return CanvasAction::None;
        };
        if !self.state.is_idle() {
            tracing::debug!("Ignoring pointer-down while {}", self.state.name());
            return CanvasAction::None;
        }

        if let Some(active) = ctx.active_sub_mask() {
            let kind = active.kind();
            if kind == SubMaskKind::Brush {
                self.transition(InteractionState::DrawingFreehand {
                    target: active.id.clone(),
                    tool: self.brush.tool,
                    points: vec![pos],
                });
                return CanvasAction::None;
            }
            if kind.is_box_selector() {
                self.transition(InteractionState::DrawingBox {
                    target: active.id.clone(),
                    points: vec![pos],
                });
                return CanvasAction::None;
            }
        }

        let Some(mapper) = ctx.mapper else {
            return CanvasAction::None;
        };

        let Some((target, hit, snapshot)) = self.find_hit(ctx, &mapper, pos) else {
            return CanvasAction::Deselect;
        };

        let selects_new = ctx.active != Some(&target);
        let next = match hit {
            HandleHit::Shape(handle) => InteractionState::DraggingShape {
                target: target.clone(),
                handle,
                origin: pos,
                snapshot,
            },
            HandleHit::Range(edge) => {
                let SubMaskParameters::Linear(linear) = snapshot else {
                    return CanvasAction::None;
                };
                InteractionState::DraggingRangeHandle {
                    target: target.clone(),
                    edge,
                    origin: pos,
                    snapshot: linear,
                }
            }
        };
        self.transition(next);

        if selects_new {
            CanvasAction::Select(target)
        } else {
            CanvasAction::None
        }
    }

    pub fn pointer_move(&mut self, ctx: &CanvasContext<'_>, pos: Option<Point>) -> CanvasAction {
        let Some(pos) = pos.filter(Point::is_finite) else {
            return CanvasAction::None;
        };
        if let InteractionState::DrawingFreehand { points, .. }
        | InteractionState::DrawingBox { points, .. } = &mut self.state
        {
            points.push(pos);
            return CanvasAction::None;
        }
        match ctx.mapper {
            Some(mapper) => drag_action(&self.state, &mapper, pos),
            None => CanvasAction::None,
        }
    }

    pub fn pointer_up(
        &mut self,
        ctx: &CanvasContext<'_>,
        pos: Option<Point>,
        sink: &mut dyn SelectionSink,
    ) -> CanvasAction {
        let pos = pos.filter(Point::is_finite);
        let state = self.take_state();

        match state {
            InteractionState::Idle => CanvasAction::None,
            InteractionState::DrawingFreehand {
                target,
                tool,
                mut points,
            } => {
                if let Some(p) = pos {
                    if points.last() != Some(&p) {
                        points.push(p);
                    }
                }
                self.commit_stroke(ctx, target, tool, points)
            }
            InteractionState::DrawingBox { target, mut points } => {
                points.extend(pos);
                commit_box(ctx, target, &points, sink)
            }
            dragging => match (ctx.mapper, pos) {
                (Some(mapper), Some(p)) => drag_action(&dragging, &mapper, p),
                _ => CanvasAction::None,
            },
        }
    }

    /// Pointer left the canvas or was cancelled. Drags end with their last
    /// emitted value; drawing buffers are dropped.
    pub fn pointer_leave(&mut self) -> CanvasAction {
        let state = self.take_state();
        if state.is_drawing() {
            tracing::debug!("Dropped unfinished {} buffer", state.name());
        }
        CanvasAction::None
    }

    fn find_hit(
        &self,
        ctx: &CanvasContext<'_>,
        mapper: &CoordinateMapper,
        p: Point,
    ) -> Option<(SubMaskId, HandleHit, SubMaskParameters)> {
        if let Some(active) = ctx.active_sub_mask().filter(|s| s.visible) {
            if let Some(hit) =
                handles::hit_test(&active.parameters, mapper, p, &self.interaction, true)
            {
                return Some((active.id.clone(), hit, active.parameters.clone()));
            }
        }

        // Topmost first.
        ctx.container
            .sub_masks()
            .rev()
            .filter(|s| s.visible && ctx.active != Some(&s.id))
            .find_map(|s| {
                handles::hit_test(&s.parameters, mapper, p, &self.interaction, false)
                    .map(|hit| (s.id.clone(), hit, s.parameters.clone()))
            })
    }

    fn commit_stroke(
        &self,
        ctx: &CanvasContext<'_>,
        target: SubMaskId,
        tool: BrushTool,
        points: Vec<Point>,
    ) -> CanvasAction {
        let Some(mapper) = ctx.mapper else {
            return CanvasAction::None;
        };
        let line = BrushLine {
            tool,
            brush_size: mapper.render_length_to_image(self.brush.size),
            feather: Some(self.brush.feather),
            points: points
                .into_iter()
                .map(|p| mapper.render_to_image(p))
                .collect(),
        };

        if line.is_eraser() {
            let erases = match ctx.container.sub_mask(&target).map(|s| &s.parameters) {
                Some(SubMaskParameters::Brush(brush)) => eraser::erases_anything(brush, &line),
                _ => false,
            };
            if !erases {
                tracing::debug!("Eraser stroke on {} touched no painted line", target);
                return CanvasAction::None;
            }
        }

        CanvasAction::Edit(MaskEdit::AppendLine {
            sub_mask: target,
            line,
        })
    }
}

fn drag_action(state: &InteractionState, mapper: &CoordinateMapper, pos: Point) -> CanvasAction {
    match state {
        InteractionState::DraggingShape {
            target,
            handle,
            origin,
            snapshot,
        } => match handles::drag_shape(snapshot, *handle, *origin, pos, mapper) {
            Some(parameters) => CanvasAction::Edit(MaskEdit::UpdateParameters {
                sub_mask: target.clone(),
                parameters,
            }),
            None => CanvasAction::None,
        },
        InteractionState::DraggingRangeHandle {
            target,
            edge,
            origin,
            snapshot,
        } => CanvasAction::Edit(MaskEdit::UpdateParameters {
            sub_mask: target.clone(),
            parameters: SubMaskParameters::Linear(handles::drag_range(
                snapshot, *edge, *origin, pos, mapper,
            )),
        }),
        _ => CanvasAction::None,
    }
}

fn commit_box(
    ctx: &CanvasContext<'_>,
    target: SubMaskId,
    points: &[Point],
    sink: &mut dyn SelectionSink,
) -> CanvasAction {
    let Some(mapper) = ctx.mapper else {
        return CanvasAction::None;
    };
    let Some((min, max)) = bounding_box(points) else {
        return CanvasAction::None;
    };
    let area = (max.x - min.x) * (max.y - min.y);
    if !(area > 0.0) {
        tracing::debug!("Discarding zero-area selection box on {}", target);
        return CanvasAction::None;
    }
    let Some(sub) = ctx.container.sub_mask(&target) else {
        return CanvasAction::None;
    };

    let start = mapper.render_to_image(min);
    let end = mapper.render_to_image(max);
    sink.request(SelectionRequest {
        kind: sub.kind(),
        target: target.clone(),
        start,
        end,
    });

    CanvasAction::Edit(MaskEdit::UpdateParameters {
        sub_mask: target,
        parameters: sub.parameters.with_selection_box(start, end),
    })
}

fn bounding_box(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(min, max), p| {
        (
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}
