//! Mask containers, the sub-mask arena, and immutable edits
//!
//! Every mutation returns a new value; the host swaps it into its state store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{MaskContainerRecord, SubMaskRecord, DEFAULT_OPACITY};
use super::reproject::CropReprojection;
use super::types::{BrushLine, MaskMode, SubMaskKind, SubMaskParameters};
use super::{MaskId, SubMaskId};
use crate::core::CanvasError;
use crate::transform::{CropRect, Size};

/// One parametric shape contributing to a container's region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SubMaskRecord", into = "SubMaskRecord")]
pub struct SubMask {
    pub id: SubMaskId,
    pub mode: MaskMode,
    pub visible: bool,
    pub parameters: SubMaskParameters,
}

impl SubMask {
    pub fn new(parameters: SubMaskParameters) -> Self {
        Self {
            id: SubMaskId::generate(),
            mode: MaskMode::Additive,
            visible: true,
            parameters,
        }
    }

    pub fn kind(&self) -> SubMaskKind {
        self.parameters.kind()
    }
}

/// A change produced by interactive editing.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskEdit {
    /// Replace a sub-mask's parameter record (drag updates, box commits)
    UpdateParameters {
        sub_mask: SubMaskId,
        parameters: SubMaskParameters,
    },
    /// Append a committed stroke to a brush sub-mask
    AppendLine { sub_mask: SubMaskId, line: BrushLine },
}

impl MaskEdit {
    pub fn sub_mask(&self) -> &SubMaskId {
        match self {
            Self::UpdateParameters { sub_mask, .. } | Self::AppendLine { sub_mask, .. } => {
                sub_mask
            }
        }
    }
}

/// A named local adjustment: ordered sub-masks sharing one adjustment bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MaskContainerRecord", into = "MaskContainerRecord")]
pub struct MaskContainer {
    pub id: MaskId,
    pub name: String,
    pub visible: bool,
    pub invert: bool,
    /// Percent, 0 - 100
    pub opacity: f64,
    /// Opaque adjustment parameters consumed by the processing backend
    pub adjustments: Value,
    pub(crate) sub_masks: IndexMap<SubMaskId, SubMask>,
}

impl MaskContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MaskId::generate(),
            name: name.into(),
            visible: true,
            invert: false,
            opacity: DEFAULT_OPACITY,
            adjustments: Value::Object(Default::default()),
            sub_masks: IndexMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.sub_masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_masks.is_empty()
    }

    pub fn sub_mask(&self, id: &SubMaskId) -> Option<&SubMask> {
        self.sub_masks.get(id)
    }

    pub fn contains(&self, id: &SubMaskId) -> bool {
        self.sub_masks.contains_key(id)
    }

    /// Sub-masks in display order.
    pub fn sub_masks(&self) -> impl DoubleEndedIterator<Item = &SubMask> + '_ {
        self.sub_masks.values()
    }

    pub fn index_of(&self, id: &SubMaskId) -> Option<usize> {
        self.sub_masks.get_index_of(id)
    }

    /// Append `sub`, or replace the sub-mask with the same id in place.
    pub fn with_sub_mask(&self, sub: SubMask) -> Self {
        let mut next = self.clone();
        next.sub_masks.insert(sub.id.clone(), sub);
        next
    }

    /// Create a sub-mask of `kind` seeded for an `image`-sized photo.
    ///
    /// When a non-full-frame `crop` is active, the seeded linear/radial
    /// geometry is reprojected once so it appears where the user is looking.
    pub fn with_new_sub_mask(
        &self,
        kind: SubMaskKind,
        image: Size,
        crop: Option<&CropRect>,
    ) -> (Self, SubMaskId) {
        let mut parameters = SubMaskParameters::seed(kind, image);
        if let Some(reprojection) = crop.and_then(|c| CropReprojection::new(c, image)) {
            parameters = reprojection.apply(&parameters);
        }
        let sub = SubMask::new(parameters);
        let id = sub.id.clone();
        tracing::debug!("Adding {:?} sub-mask {} to {}", kind, id, self.id);
        (self.with_sub_mask(sub), id)
    }

    /// Remove a sub-mask, keeping the order of the rest.
    pub fn without_sub_mask(&self, id: &SubMaskId) -> Self {
        let mut next = self.clone();
        next.sub_masks.shift_remove(id);
        next
    }

    /// Replace a sub-mask's parameters. A record of a different kind is ignored.
    pub fn with_parameters(&self, id: &SubMaskId, parameters: SubMaskParameters) -> Self {
        self.map_sub_mask(id, |sub| {
            if sub.kind() == parameters.kind() {
                sub.parameters = parameters;
            } else {
                tracing::warn!(
                    "Ignoring {:?} parameters for {:?} sub-mask {}",
                    parameters.kind(),
                    sub.kind(),
                    sub.id
                );
            }
        })
    }

    pub fn with_sub_mask_mode(&self, id: &SubMaskId, mode: MaskMode) -> Self {
        self.map_sub_mask(id, |sub| sub.mode = mode)
    }

    pub fn with_sub_mask_visible(&self, id: &SubMaskId, visible: bool) -> Self {
        self.map_sub_mask(id, |sub| sub.visible = visible)
    }

    /// Move a sub-mask to `index` (clamped to the last position).
    pub fn with_sub_mask_moved(&self, id: &SubMaskId, index: usize) -> Self {
        let mut next = self.clone();
        if let Some(from) = next.sub_masks.get_index_of(id) {
            let to = index.min(next.sub_masks.len() - 1);
            next.sub_masks.move_index(from, to);
        }
        next
    }

    pub fn with_opacity(&self, opacity: f64) -> Self {
        let mut next = self.clone();
        if opacity.is_finite() {
            next.opacity = opacity.clamp(0.0, 100.0);
        }
        next
    }

    pub fn with_invert(&self, invert: bool) -> Self {
        Self {
            invert,
            ..self.clone()
        }
    }

    pub fn with_visible(&self, visible: bool) -> Self {
        Self {
            visible,
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_adjustments(&self, adjustments: Value) -> Self {
        Self {
            adjustments,
            ..self.clone()
        }
    }

    /// Apply an interactive edit. Edits aimed at missing sub-masks, or at
    /// the wrong kind, leave the container unchanged.
    pub fn apply(&self, edit: &MaskEdit) -> Self {
        match edit {
            MaskEdit::UpdateParameters {
                sub_mask,
                parameters,
            } => self.with_parameters(sub_mask, parameters.clone()),
            MaskEdit::AppendLine { sub_mask, line } => self.map_sub_mask(sub_mask, |sub| {
                if let SubMaskParameters::Brush(brush) = &mut sub.parameters {
                    brush.lines.push(line.clone());
                }
            }),
        }
    }

    fn map_sub_mask(&self, id: &SubMaskId, f: impl FnOnce(&mut SubMask)) -> Self {
        let mut next = self.clone();
        match next.sub_masks.get_mut(id) {
            Some(sub) => f(sub),
            None => tracing::debug!("Sub-mask {} not found in {}", id, self.id),
        }
        next
    }
}

/// All mask containers of one image, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MaskContainer>", into = "Vec<MaskContainer>")]
pub struct MaskStack {
    containers: IndexMap<MaskId, MaskContainer>,
}

impl From<Vec<MaskContainer>> for MaskStack {
    fn from(list: Vec<MaskContainer>) -> Self {
        let mut containers = IndexMap::with_capacity(list.len());
        for mut container in list {
            if containers.contains_key(&container.id) {
                container.id = MaskId::generate();
            }
            containers.insert(container.id.clone(), container);
        }
        Self { containers }
    }
}

impl From<MaskStack> for Vec<MaskContainer> {
    fn from(stack: MaskStack) -> Self {
        stack.containers.into_values().collect()
    }
}

impl MaskStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn container(&self, id: &MaskId) -> Option<&MaskContainer> {
        self.containers.get(id)
    }

    pub fn containers(&self) -> impl DoubleEndedIterator<Item = &MaskContainer> + '_ {
        self.containers.values()
    }

    /// Append `container`, or replace the one with the same id in place.
    pub fn with_container(&self, container: MaskContainer) -> Self {
        let mut next = self.clone();
        next.containers.insert(container.id.clone(), container);
        next
    }

    pub fn without_container(&self, id: &MaskId) -> Self {
        let mut next = self.clone();
        next.containers.shift_remove(id);
        next
    }

    /// Rebuild one container through `f`.
    pub fn with_container_updated(
        &self,
        id: &MaskId,
        f: impl FnOnce(&MaskContainer) -> MaskContainer,
    ) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.containers.get_mut(id) {
            let mut updated = f(slot);
            updated.id = id.clone();
            *slot = updated;
        }
        next
    }

    pub fn with_container_moved(&self, id: &MaskId, index: usize) -> Self {
        let mut next = self.clone();
        if let Some(from) = next.containers.get_index_of(id) {
            let to = index.min(next.containers.len() - 1);
            next.containers.move_index(from, to);
        }
        next
    }
}
