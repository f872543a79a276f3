//! Core systems for SimpleUI.
//!
//! This crate provides the foundational pieces shared by the SimpleUI view
//! toolkit:
//!
//! - **Signal/Slot System**: Typed observer lists with registration-order firing
//! - **Errors**: The non-fatal error taxonomy used by reconciliation
//! - **Logging**: `tracing` targets and span names
//!
//! # Signal/Slot Example
//!
//! ```
//! use simpleui_core::Signal;
//!
//! let selection_changed = Signal::<bool>::new();
//!
//! let conn_id = selection_changed.connect(|selected| {
//!     println!("selected: {}", selected);
//! });
//!
//! selection_changed.emit(true);
//! selection_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{Error, Result};
pub use signal::{ConnectionGuard, ConnectionId, Signal, SignalEmitter};
