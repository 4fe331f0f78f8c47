//! # nethome-core
//!
//! Core library for nethome: detects whether configured devices are on the
//! local network by scanning the kernel neighbor/ARP table, and debounces
//! those periodic presence samples into a single in-flight event.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Clients can wrap with async if needed.
//! - **Not thread-safe**: A controller instance is driven by one tick at a time;
//!   clients provide their own synchronization if they move it across threads.
//! - **Capability injection**: The presence source and the event backend are
//!   narrow traits (`PresenceProvider`, `EventStore`) so the controller can be
//!   tested with in-memory fakes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nethome_core::{ArpProvider, IdentityMap, PresenceController};
//!
//! let provider = ArpProvider::new("/proc/net/arp", identities);
//! let mut controller = PresenceController::new(provider, store, config, predicate);
//! controller.tick()?;
//! ```

// Public modules
pub mod arp;
pub mod config;
pub mod controller;
pub mod error;
pub mod provider;
pub mod store;

// Re-export commonly used items at crate root
pub use arp::{parse_neighbor_table, ArpProvider};
pub use config::IdentityMap;
pub use controller::{ActiveEvent, ControllerConfig, PresenceController, TickOutcome};
pub use error::{Error, Result};
pub use provider::PresenceProvider;
pub use store::{EventStore, EventWrite};
