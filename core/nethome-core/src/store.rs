//! Event backend capability.
//!
//! The controller only ever creates one event and then rewrites it; the
//! backend (a calendar service, a local journal, an in-memory fake) is
//! opaque behind this trait.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event write, used for both create and update. The backend receives
/// the full desired state every time; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWrite {
    pub title: String,
    pub color_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Narrow surface the controller drives. Backend failures surface verbatim
/// as [`crate::Error::Store`]; the controller leaves its state untouched and
/// retries the same decision on the next tick.
pub trait EventStore {
    /// Creates a new event, returning the backend-assigned id.
    fn create(&mut self, event: &EventWrite) -> Result<String>;

    /// Rewrites an existing event, returning its id. Backends may reissue a
    /// different id; callers must adopt the returned one.
    fn update(&mut self, event_id: &str, event: &EventWrite) -> Result<String>;
}
