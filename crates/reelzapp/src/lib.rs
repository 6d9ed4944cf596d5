//! # Reelz Architecture
//!
//! Reelz is a **UI-agnostic short-video sharing library**. Users register, upload
//! video metadata, watch, like, comment and follow. All state lives in a local
//! key/value store of JSON documents; there is no server.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (the `reelz` crate)                              │
//! │  - Parses arguments, renders output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Resolves the session, carries media limits               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, read-modify-write, counter upkeep            │
//! │  - Returns CmdResult or page views                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait over named JSON collections              │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes plain arguments and returns plain types. It
//! never prints and never exits. Diagnostics go through `tracing`; the client
//! decides whether and where to show them.
//!
//! ## Known Limitation
//!
//! Passwords are stored and compared in plain text. The store is a local
//! profile, not an account system.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod media;
pub mod model;
pub mod session;
pub mod store;
