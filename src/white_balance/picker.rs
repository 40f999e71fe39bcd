//! Async white-balance picker over the preview decode

use super::{pick_white_balance, WhiteBalance};
use crate::core::WhiteBalanceConfig;
use crate::preview::{DecodeOutcome, PreviewLoader, PreviewTicket};
use crate::transform::{Point, RenderGeometry};

/// Completion signal fired after a successful pick.
pub trait PickerListener {
    fn picked(&self);
}

impl<F> PickerListener for F
where
    F: Fn(),
{
    fn picked(&self) {
        self()
    }
}

#[derive(Debug, Clone)]
pub struct WhiteBalancePicker {
    loader: PreviewLoader,
    config: WhiteBalanceConfig,
}

impl WhiteBalancePicker {
    pub fn new(loader: PreviewLoader, config: WhiteBalanceConfig) -> Self {
        Self { loader, config }
    }

    pub fn config(&self) -> &WhiteBalanceConfig {
        &self.config
    }

    /// Decode `preview` under the host's `ticket` for that image and sample
    /// it at `click` (render space). Picking never issues a ticket of its own,
    /// so only a newer image request can supersede it.
    ///
    /// Returns `None`, leaving `current` as the caller's value, when the
    /// decode fails or is superseded, or when the click misses the image.
    pub async fn pick<L>(
        &self,
        ticket: PreviewTicket,
        preview: Vec<u8>,
        click: Point,
        geometry: &RenderGeometry,
        current: WhiteBalance,
        listener: &L,
    ) -> Option<WhiteBalance>
    where
        L: PickerListener + ?Sized,
    {
        let logical = geometry.logical_size()?;
        let logical_click = Point::new(click.x / geometry.scale, click.y / geometry.scale);

        let image = match self.loader.decode_with(ticket, preview).await {
            Ok(DecodeOutcome::Ready { image, .. }) => image,
            Ok(DecodeOutcome::Stale { ticket }) => {
                tracing::debug!(
                    "White-balance pick dropped, preview {} is stale",
                    ticket.generation()
                );
                return None;
            }
            Err(e) => {
                tracing::warn!("White-balance pick skipped, preview decode failed: {}", e);
                return None;
            }
        };

        let picked = pick_white_balance(&image, logical_click, logical, current, &self.config);
        match picked {
            Some(wb) => {
                tracing::debug!(
                    "Picked white balance temperature={:.2} tint={:.2}",
                    wb.temperature,
                    wb.tint
                );
                listener.picked();
            }
            None => tracing::debug!("White-balance click outside the image"),
        }
        picked
    }
}
