// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only activity log for the Clipcast bot.
//!
//! Every session writes user-scoped events here; the `/logs` command reads
//! them back, newest first, rendered into transport-sized chunks. The store
//! is line-delimited TSV and append-only -- no entry is ever mutated or
//! deleted.

pub mod chunk;
pub mod entry;
pub mod store;

pub use chunk::{ChunkIter, LOG_HEADER, render_chunks};
pub use entry::{ActivityEvent, LogEntry, LogLevel, user_token};
pub use store::{ActivityStore, FileStore, MemoryStore};
