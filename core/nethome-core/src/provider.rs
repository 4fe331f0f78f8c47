//! Presence source capability.

use crate::error::Result;

/// A source of presence samples, polled once per controller tick.
///
/// Returns the ordered sequence of configured identity names currently
/// detected. Implementations must not cache: every call reflects a fresh
/// read of the underlying source.
pub trait PresenceProvider {
    fn present(&self) -> Result<Vec<String>>;
}
