//! Persisted record shapes and the normalization pass
//!
//! Records coming from the host's state store may be partial: older versions
//! omitted `mode`/`visible`, and some parameter fields. Loading never rejects
//! such a record; gaps are filled with defaults here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::container::{MaskContainer, SubMask};
use super::types::{MaskMode, SubMaskKind, SubMaskParameters};
use super::{MaskId, SubMaskId};

pub const DEFAULT_OPACITY: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubMaskId>,
    #[serde(rename = "type")]
    pub kind: SubMaskKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MaskMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default)]
    pub parameters: Value,
}

fn parse_parameters<T>(
    kind: SubMaskKind,
    value: Value,
    wrap: fn(T) -> SubMaskParameters,
) -> SubMaskParameters
where
    T: serde::de::DeserializeOwned,
{
    if value.is_null() {
        return SubMaskParameters::default_for(kind);
    }
    match serde_json::from_value::<T>(value) {
        Ok(params) => wrap(params),
        Err(e) => {
            tracing::warn!("Repairing malformed {:?} parameters with defaults: {}", kind, e);
            SubMaskParameters::default_for(kind)
        }
    }
}

/// Fill any missing field of a persisted sub-mask.
pub fn normalize_sub_mask(record: SubMaskRecord) -> SubMask {
    let kind = record.kind;
    let value = record.parameters;
    let parameters = match kind {
        SubMaskKind::Linear => parse_parameters(kind, value, SubMaskParameters::Linear),
        SubMaskKind::Radial => parse_parameters(kind, value, SubMaskParameters::Radial),
        SubMaskKind::Brush => parse_parameters(kind, value, SubMaskParameters::Brush),
        SubMaskKind::AiSubject => parse_parameters(kind, value, SubMaskParameters::AiSubject),
        SubMaskKind::AiForeground => {
            parse_parameters(kind, value, SubMaskParameters::AiForeground)
        }
        SubMaskKind::AiSky => parse_parameters(kind, value, SubMaskParameters::AiSky),
        SubMaskKind::QuickErase => parse_parameters(kind, value, SubMaskParameters::QuickErase),
    };

    SubMask {
        id: record.id.unwrap_or_else(SubMaskId::generate),
        mode: record.mode.unwrap_or_default(),
        visible: record.visible.unwrap_or(true),
        parameters,
    }
}

fn parameters_to_value(parameters: &SubMaskParameters) -> Value {
    let result = match parameters {
        SubMaskParameters::Linear(p) => serde_json::to_value(p),
        SubMaskParameters::Radial(p) => serde_json::to_value(p),
        SubMaskParameters::Brush(p) => serde_json::to_value(p),
        SubMaskParameters::AiSubject(p) => serde_json::to_value(p),
        SubMaskParameters::AiForeground(p) | SubMaskParameters::AiSky(p) => {
            serde_json::to_value(p)
        }
        SubMaskParameters::QuickErase(p) => serde_json::to_value(p),
    };
    // Plain structs of numbers/strings always serialize.
    result.unwrap_or(Value::Null)
}

impl From<SubMaskRecord> for SubMask {
    fn from(record: SubMaskRecord) -> Self {
        normalize_sub_mask(record)
    }
}

impl From<SubMask> for SubMaskRecord {
    fn from(sub: SubMask) -> Self {
        Self {
            id: Some(sub.id),
            kind: sub.parameters.kind(),
            mode: Some(sub.mode),
            visible: Some(sub.visible),
            parameters: parameters_to_value(&sub.parameters),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskContainerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub adjustments: Value,
    #[serde(default)]
    pub sub_masks: Vec<SubMask>,
}

impl From<MaskContainerRecord> for MaskContainer {
    fn from(record: MaskContainerRecord) -> Self {
        let mut sub_masks = IndexMap::with_capacity(record.sub_masks.len());
        for mut sub in record.sub_masks {
            if sub_masks.contains_key(&sub.id) {
                let fresh = SubMaskId::generate();
                tracing::warn!("Duplicate sub-mask id {}, reassigned to {}", sub.id, fresh);
                sub.id = fresh;
            }
            sub_masks.insert(sub.id.clone(), sub);
        }

        let opacity = match record.opacity {
            Some(o) if o.is_finite() => o.clamp(0.0, 100.0),
            _ => DEFAULT_OPACITY,
        };

        MaskContainer {
            id: record.id.unwrap_or_else(MaskId::generate),
            name: record.name.unwrap_or_default(),
            visible: record.visible.unwrap_or(true),
            invert: record.invert.unwrap_or(false),
            opacity,
            adjustments: record.adjustments,
            sub_masks,
        }
    }
}

impl From<MaskContainer> for MaskContainerRecord {
    fn from(container: MaskContainer) -> Self {
        Self {
            id: Some(container.id),
            name: Some(container.name),
            visible: Some(container.visible),
            invert: Some(container.invert),
            opacity: Some(container.opacity),
            adjustments: container.adjustments,
            sub_masks: container.sub_masks.into_values().collect(),
        }
    }
}
