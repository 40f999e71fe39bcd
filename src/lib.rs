//! Maskcanvas - interactive mask geometry for a non-destructive RAW editor
//!
//! Parametric sub-masks live in image space; pointer input arrives in render
//! space. This crate owns the mapping between the two, the editing state
//! machine, crop reprojection and the white-balance picker. Rendering the
//! masks and running the segmentation models is left to the host.

pub mod core;
pub mod editor;
pub mod mask;
pub mod preview;
pub mod transform;
pub mod white_balance;

pub use crate::core::{CanvasConfig, CanvasError};
pub use editor::{CanvasAction, CanvasContext, CanvasController};
pub use mask::{MaskContainer, MaskEdit, MaskStack, Selection, SubMask, SubMaskParameters};
pub use transform::{CoordinateMapper, CropRect, Point, RenderGeometry, Size};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Calling it again is harmless.
pub fn init_logging() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maskcanvas=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("Maskcanvas logging initialized");
    }
}
