//! Background encoding of cell images into autosave payloads
//!
//! Encoding a large image is slow, so it runs on tokio's blocking pool.
//! Each job carries the [`AutosaveToken`] of the image it encodes; results
//! are handed back to the grid, which drops them if the cell has moved on
//! to another image in the meantime.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::codec::ImageCodec;
use crate::grid::{AutosaveToken, CollageGrid};

/// One finished encode: the token it was requested under and the payload,
/// or `None` if encoding failed.
pub type EncodedPayload = (AutosaveToken, Option<String>);

/// Runs image encodes off the caller's thread.
pub struct AutosaveEncoder<C: ImageCodec> {
    codec: Arc<C>,
    pending: HashSet<AutosaveToken>,
    tasks: JoinSet<EncodedPayload>,
}

impl<C> AutosaveEncoder<C>
where
    C: ImageCodec + Send + Sync + 'static,
    C::Image: Send + 'static,
{
    /// Creates an encoder around a shared codec.
    pub fn new(codec: Arc<C>) -> Self {
        Self {
            codec,
            pending: HashSet::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Returns true while any encode is in flight.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of encodes in flight.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if `token` is being encoded.
    #[must_use]
    pub fn is_pending(&self, token: AutosaveToken) -> bool {
        self.pending.contains(&token)
    }

    /// Starts encoding `image` under `token`.
    ///
    /// Returns false if the same token is already in flight. Must be called
    /// from within a tokio runtime.
    pub fn submit(&mut self, token: AutosaveToken, image: C::Image) -> bool {
        if !self.pending.insert(token) {
            return false;
        }
        let codec = Arc::clone(&self.codec);
        self.tasks.spawn_blocking(move || {
            let payload = codec.encode(&image);
            if payload.is_none() {
                tracing::warn!(cell_id = %token.cell, generation = token.generation, "Background encode failed");
            }
            (token, payload)
        });
        tracing::trace!(cell_id = %token.cell, generation = token.generation, "Queued background encode");
        true
    }

    /// Submits every image in `grid` that lacks a cached payload.
    ///
    /// Returns how many new encodes were started.
    pub fn schedule(&mut self, grid: &CollageGrid<C::Image>) -> usize {
        grid.pending_encodes()
            .into_iter()
            .filter(|(token, image)| self.submit(*token, image.clone()))
            .count()
    }

    /// Waits for the next finished encode, or `None` when nothing is in flight.
    pub async fn next_result(&mut self) -> Option<EncodedPayload> {
        loop {
            match self.tasks.join_next().await? {
                Ok((token, payload)) => {
                    self.pending.remove(&token);
                    return Some((token, payload));
                }
                Err(e) => {
                    // The token of a panicked job is lost; forget all
                    // tokens once the set is empty so has_pending recovers.
                    tracing::error!(error = %e, "Background encode task failed");
                    if self.tasks.is_empty() {
                        self.pending.clear();
                    }
                }
            }
        }
    }

    /// Waits for every in-flight encode and offers the results to `grid`.
    ///
    /// Returns how many payloads the grid accepted.
    pub async fn drain_into(&mut self, grid: &mut CollageGrid<C::Image>) -> usize {
        let mut accepted = 0;
        while let Some((token, payload)) = self.next_result().await {
            if grid.accept_encoded_payload(token, payload) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Cancels all in-flight encodes.
    pub fn abort_all(&mut self) {
        self.tasks.abort_all();
        self.pending.clear();
    }
}

impl<C: ImageCodec> std::fmt::Debug for AutosaveEncoder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveEncoder")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
