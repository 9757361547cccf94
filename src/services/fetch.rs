//! Per-region fetch state for views.
//!
//! Every view region (search grid, movie metadata, similar movies, watch providers)
//! owns one [`FetchSlot`]. Starting a fetch bumps the slot's generation and hands out a
//! [`FetchTicket`]; a result is applied only when its ticket still matches, so a
//! response for a superseded key can never overwrite a newer one.
//!
//! Retry policy: none. A failed fetch is surfaced once, as-is, to the region that
//! issued it. Nothing is re-requested until the key changes or the page is reloaded.
//!
//! Page renders bound each fetch by a render deadline ([`within_deadline`]). A fetch
//! that misses it leaves its region `Loading`, and the browser loads that region on
//! its own afterwards.

use std::{future::Future, time::Duration};

use serde::Serialize;

use crate::error::AppError;

/// Failure of a view-side fetch, rendered inline in the region that issued it
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_decode() {
            FetchError::Decode(e.without_url().to_string())
        } else {
            FetchError::Transport(e.without_url().to_string())
        }
    }
}

impl From<AppError> for FetchError {
    fn from(e: AppError) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// Awaits `fetch`, giving up after `deadline`.
///
/// `None` means the deadline passed first; the fetch is dropped. Without a deadline
/// the fetch always completes.
pub async fn within_deadline<F>(deadline: Option<Duration>, fetch: F) -> Option<F::Output>
where
    F: Future,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fetch).await.ok(),
        None => Some(fetch.await),
    }
}

/// Render state of one region
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LoadState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Handle for one in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be handed back to `FetchSlot::resolve`"]
pub struct FetchTicket {
    generation: u64,
}

/// Latest-request-wins holder for one region's state
#[derive(Debug, Clone)]
pub struct FetchSlot<T> {
    generation: u64,
    state: LoadState<T>,
}

// Serialized as its current state only; the generation is bookkeeping.
impl<T: Serialize> Serialize for FetchSlot<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state.serialize(serializer)
    }
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchSlot<T> {
    /// A fresh slot starts out loading
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: LoadState::Loading,
        }
    }

    /// Marks the region as loading and invalidates every outstanding ticket
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies a result if `ticket` is still current.
    ///
    /// Returns `false` and drops the result when a newer fetch has begun since.
    /// `prefix` is prepended to error messages (localized context such as
    /// "Error fetching movie details: ").
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        result: Result<T, FetchError>,
        prefix: &str,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale fetch result"
            );
            return false;
        }

        self.state = match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => LoadState::Failed(format!("{}{}", prefix, e)),
        };
        true
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_loading() {
        let slot: FetchSlot<u32> = FetchSlot::new();
        assert!(slot.state().is_loading());
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn test_current_ticket_applies() {
        let mut slot = FetchSlot::new();
        let ticket = slot.begin();
        assert!(slot.resolve(ticket, Ok(7), ""));
        assert_eq!(slot.state().ready(), Some(&7));
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let mut slot = FetchSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        // The newer request resolves first, then the older one straggles in.
        assert!(slot.resolve(second, Ok("new"), ""));
        assert!(!slot.resolve(first, Ok("old"), ""));
        assert_eq!(slot.state().ready(), Some(&"new"));
    }

    #[test]
    fn test_stale_ticket_does_not_clear_loading() {
        let mut slot: FetchSlot<&str> = FetchSlot::new();
        let first = slot.begin();
        let _second = slot.begin();

        assert!(!slot.resolve(first, Err(FetchError::Status(500)), ""));
        assert!(slot.state().is_loading());
    }

    #[test]
    fn test_error_message_built_from_status() {
        let mut slot: FetchSlot<()> = FetchSlot::new();
        let ticket = slot.begin();
        slot.resolve(
            ticket,
            Err(FetchError::Status(404)),
            "Error fetching movie details: ",
        );
        assert_eq!(
            slot.state().error(),
            Some("Error fetching movie details: HTTP error! status: 404")
        );
    }

    #[test]
    fn test_begin_resets_to_loading() {
        let mut slot = FetchSlot::new();
        let ticket = slot.begin();
        slot.resolve(ticket, Ok(1), "");
        let _ = slot.begin();
        assert!(slot.state().is_loading());
    }

    #[tokio::test]
    async fn test_within_deadline() {
        let fast = within_deadline(Some(Duration::from_millis(200)), async { 1 }).await;
        assert_eq!(fast, Some(1));

        let slow = within_deadline(Some(Duration::from_millis(20)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            2
        })
        .await;
        assert_eq!(slow, None);

        assert_eq!(within_deadline(None, async { 3 }).await, Some(3));
    }

    #[test]
    fn test_serialized_shape() {
        let mut slot = FetchSlot::new();
        let ticket = slot.begin();
        slot.resolve(ticket, Ok(vec![1, 2]), "");
        assert_eq!(
            serde_json::to_value(&slot).unwrap(),
            serde_json::json!({"state": "ready", "value": [1, 2]})
        );

        let loading: FetchSlot<u8> = FetchSlot::new();
        assert_eq!(
            serde_json::to_value(&loading).unwrap(),
            serde_json::json!({"state": "loading"})
        );
    }
}
