//! Dex Core - Headless Creature Lookup
//!
//! This crate holds all of dex's behaviour, independent of any UI framework:
//! look a creature up by name or number, animate its front and back sprites,
//! and play its cry. The terminal surface in `dex-tui` is a thin renderer on
//! top of it.
//!
//! # Architecture
//!
//! ```text
//!   surface loop ──update_name / load──▶ LookupController ──spawn──▶ DataClient
//!        ▲                                │     ▲                      │
//!        │ poll / update(delta)           │     └──── completion ◀─────┘
//!        │                                ├──▶ NotificationSink (warn / error)
//!        └──── render state ◀─────────────┴──▶ AudioPlayer (cry)
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use dex_core::{
//!     ChannelSink, LookupConfig, LookupController, PokeApiClient, SilentPlayer,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PokeApiClient::new(dex_core::DEFAULT_API_URL, std::time::Duration::from_secs(15))?;
//!     let (sink, mut notifications) = ChannelSink::new(16);
//!     let mut controller =
//!         LookupController::new(client, sink, SilentPlayer, LookupConfig::default());
//!
//!     controller.update_name("Pikachu");
//!     controller.load();
//!     controller.settle().await;
//!     println!("{}", controller.current_frame());
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`controller`]: The lookup controller and its render state
//! - [`record`]: Typed creature record and frame derivation
//! - [`client`]: Data service trait and the PokeAPI client
//! - [`animation`]: Frame sequence and fixed-interval frame timer
//! - [`notify`]: Notification sink trait and implementations
//! - [`audio`]: Audio player trait and implementations
//! - [`config`]: TOML/env/CLI configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod audio;
pub mod client;
pub mod config;
pub mod controller;
pub mod notify;
pub mod record;

pub use animation::{current_frame, FrameSequence, FrameTimer, DEFAULT_FRAME_INTERVAL};
pub use audio::{AudioPlayer, CommandPlayer, SilentPlayer, DEFAULT_PLAYER_COMMAND};
pub use client::{DataClient, FetchError, PokeApiClient, DEFAULT_API_URL};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, DexConfig, DexToml,
};
pub use controller::{LoadOutcome, LookupConfig, LookupController, LookupSnapshot};
pub use notify::{ChannelSink, Notification, NotificationSink, Severity};
pub use record::{CreatureRecord, Cries, Sprites};
