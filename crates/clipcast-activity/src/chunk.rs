// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chunked rendering of log entries for transport-size-limited delivery.
//!
//! Partitions newest-first entries into Markdown-fenced blocks, each within
//! `max_chars`, never splitting an entry across blocks. The iterator is
//! pure over its input slice: calling [`render_chunks`] again with the same
//! entries yields identical chunks.

/// Header line shown at the top of the first chunk.
pub const LOG_HEADER: &str = "--- Your Activity Log ---";

const FENCE_OPEN: &str = "```\n";
const FENCE_CLOSE: &str = "```";

/// Returns a lazy iterator of fenced text blocks over `entries`.
///
/// Each block is at most `max_chars` characters including the fences and,
/// on the first block, the header. An entry longer than the remaining
/// budget of an empty block is emitted alone in its own (oversized) block
/// rather than split.
pub fn render_chunks(entries: &[String], max_chars: usize) -> ChunkIter<'_> {
    ChunkIter {
        entries,
        idx: 0,
        first: true,
        max_chars,
    }
}

/// Iterator produced by [`render_chunks`].
pub struct ChunkIter<'a> {
    entries: &'a [String],
    idx: usize,
    first: bool,
    max_chars: usize,
}

impl Iterator for ChunkIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.idx >= self.entries.len() {
            return None;
        }

        let mut chunk = String::from(FENCE_OPEN);
        if self.first {
            chunk.push_str(LOG_HEADER);
            chunk.push('\n');
        }
        self.first = false;

        let mut added = 0;
        while self.idx < self.entries.len() {
            let entry = &self.entries[self.idx];
            let projected = chunk.len() + entry.len() + 1 + FENCE_CLOSE.len();
            if projected > self.max_chars && added > 0 {
                break;
            }
            chunk.push_str(entry);
            chunk.push('\n');
            self.idx += 1;
            added += 1;
            // An oversized single entry fills the whole block.
            if chunk.len() + FENCE_CLOSE.len() >= self.max_chars {
                break;
            }
        }

        chunk.push_str(FENCE_CLOSE);
        Some(chunk)
    }
}

/// Strips the fences and header from concatenated chunks, recovering the
/// entry lines in order. Used by the round-trip tests.
#[cfg(test)]
fn strip_framing(chunks: &[String]) -> Vec<String> {
    let mut entries = Vec::new();
    for chunk in chunks {
        for line in chunk.lines() {
            if line == FENCE_CLOSE || line == "```" || line == LOG_HEADER || line.is_empty() {
                continue;
            }
            entries.push(line.to_string());
        }
    }
    entries
}
