//! Transcript Module
//!
//! The caption data model: individual caption lines with timing, speakers,
//! and cue-presentation hints, the ordered transcript aggregate, and the
//! per-speaker presentation preset store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Transcript Model                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  models.rs     - CaptionLine, LineContent, CueHints, Transcript │
//! │  presets.rs    - SpeakerPresetStore (session-scoped)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod models;
mod presets;

pub use models::{
    parse_percent_field, parse_time_field, split_speakers, CaptionLine, CueAlign, CueHints,
    LineContent, Segment, Transcript,
};
pub use presets::SpeakerPresetStore;
