#![forbid(unsafe_code)]

//! SiteWise annotation history.
//!
//! Snapshot-based undo/redo for the PDF annotation canvas. The crate owns a
//! [`Document`] of items and records a full snapshot before every committed
//! change, so undo and redo are plain swaps.
//!
//! - **Atomic mutations**: [`HistoryManager::add`], [`update`](HistoryManager::update),
//!   [`remove`](HistoryManager::remove) and the z-order operations each
//!   commit one undo step.
//! - **Batches**: [`start_batch`](HistoryManager::start_batch) /
//!   [`end_batch`](HistoryManager::end_batch), the [`batch`](HistoryManager::batch)
//!   closure, or a [`Gesture`] guard group a drag into one step.
//! - **Persistence**: [`serialize`](HistoryManager::serialize) and
//!   [`load`](HistoryManager::load) move the current document (not its
//!   history) to and from JSON.
//!
//! # Quick Start
//!
//! ```
//! use sitewise_history::{HistoryConfig, HistoryManager, RawItem};
//!
//! let mut history = HistoryManager::new(HistoryConfig::default());
//! history.add(RawItem::new("a").with("x", 0))?;
//!
//! history.start_batch();
//! history.update("a", |item| item.with("x", 10))?;
//! history.update("a", |item| item.with("x", 20))?;
//! history.end_batch();
//!
//! assert!(history.undo()?);
//! let x = history.get("a").and_then(|i| i.get("x")).and_then(|v| v.as_i64());
//! assert_eq!(x, Some(0));
//! # Ok::<(), sitewise_history::HistoryError>(())
//! ```
//!
//! The library emits `tracing` events under the `sitewise.history` target
//! and never installs a subscriber.

pub mod config;
pub mod document;
pub mod error;
pub mod gesture;
pub mod history;
pub mod item;
pub mod snapshot_store;

pub use config::HistoryConfig;
pub use document::Document;
pub use error::{ConfigError, HistoryError, Result};
pub use gesture::Gesture;
pub use history::HistoryManager;
pub use item::{Annotation, HistoryItem, Point, RawItem, Shape, Style};
pub use snapshot_store::SnapshotStore;
