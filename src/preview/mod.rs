//! Background preview streaming.
//!
//! A [`PreviewProducer`] walks a font list in chunks; a [`PreviewWorker`]
//! runs it on its own thread, renders each item with a [`BlockRenderer`] and
//! forwards it to the UI thread over a channel, followed by exactly one
//! `Finished` event.

pub mod producer;
pub mod render;
pub mod worker;

use std::sync::Arc;

pub use producer::{CancelToken, PreviewItem, PreviewProducer};
pub use render::{BlockImage, BlockRenderer};
pub use worker::{PreviewEvent, PreviewWorker};

/// Callback a worker uses to wake the UI thread (e.g. `egui::Context::request_repaint`).
pub type Notifier = Arc<dyn Fn() + Send + Sync>;
