//! Mask geometry model
//!
//! A [`MaskStack`] holds named [`MaskContainer`]s; each container holds an
//! ordered arena of [`SubMask`]s keyed by [`SubMaskId`]. Geometry is stored in
//! absolute image space, so only crop reprojection ever rewrites it.

mod container;
mod record;
pub mod reproject;
mod types;

pub use container::{MaskContainer, MaskEdit, MaskStack, SubMask};
pub use record::{normalize_sub_mask, MaskContainerRecord, SubMaskRecord};
pub use reproject::{reproject_for_crop, CropReprojection};
pub use types::{
    AiRefinement, AiRegionMaskParameters, AiSubjectMaskParameters, BoxSelectionParameters,
    BrushLine, BrushMaskParameters, BrushTool, LinearMaskParameters, MaskMode,
    RadialMaskParameters, SubMaskKind, SubMaskParameters,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Mask container identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskId(String);

impl MaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sub-mask identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubMaskId(String);

impl SubMaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubMaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SubMaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The host-held active pointer: which container is open and which of its
/// sub-masks shows transform handles. Stored as ids, resolved on each use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub container: Option<MaskId>,
    pub sub_mask: Option<SubMaskId>,
}

impl Selection {
    pub fn select_container(&self, id: MaskId) -> Self {
        Self {
            container: Some(id),
            sub_mask: None,
        }
    }

    pub fn select_sub_mask(&self, id: Option<SubMaskId>) -> Self {
        Self {
            container: self.container.clone(),
            sub_mask: id,
        }
    }

    /// Resolve the open container in `stack`.
    pub fn active_container<'a>(&self, stack: &'a MaskStack) -> Option<&'a MaskContainer> {
        stack.container(self.container.as_ref()?)
    }

    /// Resolve the active sub-mask in `stack`.
    pub fn active_sub_mask<'a>(&self, stack: &'a MaskStack) -> Option<&'a SubMask> {
        self.active_container(stack)?
            .sub_mask(self.sub_mask.as_ref()?)
    }

    /// Drop ids that no longer resolve after deletions.
    pub fn reconciled(&self, stack: &MaskStack) -> Self {
        let Some(container) = self.active_container(stack) else {
            return Self::default();
        };
        let sub_mask = self
            .sub_mask
            .as_ref()
            .filter(|id| container.contains(id))
            .cloned();
        Self {
            container: Some(container.id.clone()),
            sub_mask,
        }
    }
}
