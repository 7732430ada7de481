// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the seams between the conversational core and its
//! external collaborators.

pub mod channel;
pub mod publisher;
pub mod source;

pub use channel::{ChannelAdapter, ReplySink};
pub use publisher::Publisher;
pub use source::VideoSource;
