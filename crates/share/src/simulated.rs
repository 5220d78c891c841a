//! Simulated posting backend

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tracing::info;

use crate::{PostBackend, PostError, PostReceipt, PostRequest};

/// Round-trip delay of the simulated service
pub const SIMULATED_DELAY: Duration = Duration::from_secs(2);

/// Backend that waits, logs the post, and always succeeds
pub struct SimulatedPost {
    delay: Duration,
    cancelled: Arc<AtomicBool>,
    posting: Arc<AtomicBool>,
    next_id: AtomicU64,
}

impl Default for SimulatedPost {
    fn default() -> Self {
        Self::new(SIMULATED_DELAY)
    }
}

impl SimulatedPost {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            cancelled: Arc::new(AtomicBool::new(false)),
            posting: Arc::new(AtomicBool::new(false)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Flag another task can set to cancel the post in flight
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl PostBackend for SimulatedPost {
    async fn post(&mut self, request: PostRequest) -> Result<PostReceipt, PostError> {
        self.cancelled.store(false, Ordering::SeqCst);
        self.posting.store(true, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.posting.store(false, Ordering::SeqCst);

        if self.cancelled.load(Ordering::SeqCst) {
            return Err(PostError::Cancelled);
        }

        let post_id = format!("sim-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        info!(
            "Posted {:?} by {:?} as {} ({} bytes of image data)",
            request.metadata.title,
            request.metadata.artist,
            post_id,
            request.image_data_uri.len()
        );

        Ok(PostReceipt {
            post_id,
            metadata: request.metadata,
        })
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_posting(&self) -> bool {
        self.posting.load(Ordering::SeqCst)
    }
}
