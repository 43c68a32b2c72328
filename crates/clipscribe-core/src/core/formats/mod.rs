//! Caption Format Module
//!
//! Emits the WebVTT subtitle track and parses the line-oriented import
//! formats:
//! - `vtt.rs`      - WebVTT track emission
//! - `autocaps.rs` - auto-transcript XML import (timed-text elements)
//! - `blocks.rs`   - time-coded text-block import
//! - `plain.rs`    - plain newline-delimited text import
//!
//! The canonical document codec lives in [`crate::core::document`]; each
//! importer here produces caption lines, and the caller supplies the video
//! reference separately.

mod autocaps;
mod blocks;
mod plain;
mod vtt;

pub use autocaps::parse_auto_transcript;
pub use blocks::parse_timed_blocks;
pub use plain::parse_plain_text;
pub use vtt::{export_vtt, format_cue_time};
