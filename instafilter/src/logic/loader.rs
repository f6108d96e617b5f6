//! Cancellable photo decoding.
//!
//! Each load gets an increasing id and its own cancellation token. Starting a
//! new load cancels the previous token so a slow, stale decode can never
//! overwrite a newer selection.

use anyhow::{Context, Result};
use image::RgbaImage;
use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct ImageLoader {
    next_id: u64,
    current: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct PendingImage {
    id: u64,
    token: CancellationToken,
    task: JoinHandle<Result<RgbaImage>>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes` on the blocking pool. Must be called inside a tokio runtime.
    pub fn load(&mut self, bytes: Vec<u8>) -> PendingImage {
        self.cancel();

        self.next_id += 1;
        let id = self.next_id;
        let token = CancellationToken::new();
        self.current = Some(token.clone());

        debug!("selection {id}: decoding {} bytes", bytes.len());
        let task = tokio::task::spawn_blocking(move || decode(&bytes));

        PendingImage { id, token, task }
    }

    /// Cancels the load in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

impl PendingImage {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for the decode. `None` when superseded or when decoding failed.
    pub async fn wait(self) -> Option<RgbaImage> {
        let PendingImage { id, token, task } = self;

        tokio::select! {
            biased;

            _ = token.cancelled() => {
                debug!("selection {id} superseded");
                None
            }
            res = task => match res {
                Ok(Ok(image)) => Some(image),
                Ok(Err(e)) => {
                    warn!("selection {id}: {e:?}");
                    None
                }
                Err(e) => {
                    warn!("selection {id}: decode task failed: {e}");
                    None
                }
            }
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).with_context(|| "decode image failed")?;
    Ok(image.to_rgba8())
}
