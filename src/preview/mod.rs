//! Async preview decode and display-layer swapping
//!
//! Every decode request takes a [`PreviewTicket`] from a monotonically
//! increasing generation counter. A completion is only used if its ticket is
//! still the latest one issued; anything older is reported as
//! [`DecodeOutcome::Stale`] and dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::RgbImage;
use parking_lot::RwLock;

use crate::core::CanvasError;

/// Generation tag of one decode request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewTicket(u64);

impl PreviewTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum DecodeOutcome {
    Ready {
        ticket: PreviewTicket,
        image: Arc<RgbImage>,
    },
    /// A newer request was issued while this one was decoding.
    Stale { ticket: PreviewTicket },
}

impl DecodeOutcome {
    pub fn ticket(&self) -> PreviewTicket {
        match self {
            Self::Ready { ticket, .. } | Self::Stale { ticket } => *ticket,
        }
    }

    pub fn into_image(self) -> Option<Arc<RgbImage>> {
        match self {
            Self::Ready { image, .. } => Some(image),
            Self::Stale { .. } => None,
        }
    }
}

/// Decodes encoded preview bytes off the async runtime.
///
/// Cloning shares the generation counter, so any clone can supersede
/// requests issued through another.
#[derive(Debug, Clone, Default)]
pub struct PreviewLoader {
    generation: Arc<AtomicU64>,
}

impl PreviewLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn begin(&self) -> PreviewTicket {
        PreviewTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn latest(&self) -> PreviewTicket {
        PreviewTicket(self.generation.load(Ordering::Acquire))
    }

    pub fn is_current(&self, ticket: PreviewTicket) -> bool {
        self.latest() == ticket
    }

    /// Start a request and decode `bytes` under it.
    pub async fn decode(&self, bytes: Vec<u8>) -> Result<DecodeOutcome, CanvasError> {
        let ticket = self.begin();
        self.decode_with(ticket, bytes).await
    }

    /// Decode `bytes` under an already issued `ticket`.
    pub async fn decode_with(
        &self,
        ticket: PreviewTicket,
        bytes: Vec<u8>,
    ) -> Result<DecodeOutcome, CanvasError> {
        let image = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes).map(|decoded| decoded.to_rgb8())
        })
        .await??;

        if !self.is_current(ticket) {
            tracing::debug!(
                "Dropping stale preview decode {} (latest {})",
                ticket.generation(),
                self.latest().generation()
            );
            return Ok(DecodeOutcome::Stale { ticket });
        }

        tracing::debug!(
            "Decoded preview {} ({}x{})",
            ticket.generation(),
            image.width(),
            image.height()
        );
        Ok(DecodeOutcome::Ready {
            ticket,
            image: Arc::new(image),
        })
    }
}

#[derive(Debug, Default)]
struct LayerState {
    ticket: Option<PreviewTicket>,
    image: Option<Arc<RgbImage>>,
}

/// The preview currently on screen. Readers never observe a layer older than
/// one already installed.
#[derive(Debug, Default)]
pub struct DisplayLayers {
    state: RwLock<LayerState>,
}

impl DisplayLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a decoded layer if its ticket is still the loader's latest.
    /// Returns whether the swap happened.
    pub fn install(&self, loader: &PreviewLoader, outcome: DecodeOutcome) -> bool {
        let DecodeOutcome::Ready { ticket, image } = outcome else {
            return false;
        };
        if !loader.is_current(ticket) {
            tracing::debug!("Not installing superseded preview {}", ticket.generation());
            return false;
        }

        let mut state = self.state.write();
        if state.ticket.is_some_and(|installed| installed >= ticket) {
            return false;
        }
        state.ticket = Some(ticket);
        state.image = Some(image);
        true
    }

    pub fn current(&self) -> Option<Arc<RgbImage>> {
        self.state.read().image.clone()
    }

    pub fn ticket(&self) -> Option<PreviewTicket> {
        self.state.read().ticket
    }

    pub fn clear(&self) {
        let mut state = self.state.write();
        state.ticket = None;
        state.image = None;
    }
}
