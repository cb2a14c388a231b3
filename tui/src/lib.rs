//! Dex TUI - Terminal surface for dex
//!
//! A full-screen terminal UI that renders the state of a
//! [`dex_core::LookupController`]: the input box, the animated sprite, and
//! the toast stack for warnings and errors.
//!
//! # Architecture
//!
//! - **App**: Event loop, key handling, and layout
//! - **Widgets**: Sprite panel and toast list
//! - **Toast**: Toast lifetimes and stacking
//! - **Theme**: Colours

pub mod app;
pub mod theme;
pub mod toast;
pub mod widgets;

pub use app::App;
