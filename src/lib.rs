// Library exports for testing and potential library use
//
// # Threading model
//
// fontpeek runs one UI thread plus at most one background thread per
// logical operation:
//
//   - `font_loader`: system font discovery or folder registration
//   - `preview`: the chunked preview producer, which also shapes and
//     rasterizes each block so face data is never read on the UI thread
//
// Workers never touch UI state. They send results over `std::sync::mpsc`
// and wake the UI through a repaint callback; the UI thread polls once per
// frame (`PreviewController::poll`). Every request carries a generation
// number and results from a superseded generation are dropped.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod assets;
pub mod cli;
pub mod clipboard;
pub mod controller;
pub mod filter;
pub mod font_loader;
pub mod logging;
pub mod panel;
pub mod preview;
pub mod ui_constants;
