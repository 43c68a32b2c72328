//! Speaker Preset Store
//!
//! Remembers the last-used cue-presentation hints per speaker name and
//! backfills blank fields when settings are populated or committed.
//! Session-scoped: the store is discarded when a new video is loaded.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{CueHints, Transcript};

/// Per-speaker registry of last-used presentation hints.
#[derive(Clone, Debug, Default)]
pub struct SpeakerPresetStore {
    presets: HashMap<String, CueHints>,
}

impl SpeakerPresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a committed settings change for a speaker. Only fields that
    /// were non-blank in the commit update the preset; blank fields leave
    /// the previously stored values in place.
    pub fn record(&mut self, speaker: &str, committed: &CueHints) {
        if speaker.is_empty() || committed.is_empty() {
            return;
        }
        let entry = self.presets.entry(speaker.to_string()).or_default();
        if committed.position.is_some() {
            entry.position = committed.position;
        }
        if committed.line.is_some() {
            entry.line = committed.line;
        }
        if committed.size.is_some() {
            entry.size = committed.size;
        }
        if committed.align.is_some() {
            entry.align = committed.align;
        }
        debug!(speaker, "Updated speaker preset");
    }

    /// Fills the blank fields of `partial` from the stored preset for
    /// `speaker`. Explicitly provided values are never overwritten.
    pub fn backfill(&self, speaker: &str, partial: &CueHints) -> CueHints {
        let mut filled = *partial;
        if let Some(preset) = self.presets.get(speaker) {
            filled.position = filled.position.or(preset.position);
            filled.line = filled.line.or(preset.line);
            filled.size = filled.size.or(preset.size);
            filled.align = filled.align.or(preset.align);
        }
        filled
    }

    /// Seeds presets from an imported transcript: lines are replayed in
    /// order, so the effective preset for a speaker comes from the *last*
    /// line mentioning them.
    pub fn seed_from(&mut self, transcript: &Transcript) {
        for line in &transcript.lines {
            if line.hints.is_empty() {
                continue;
            }
            for speaker in &line.speakers {
                self.record(speaker, &line.hints);
            }
        }
    }

    /// Stored preset for a speaker, if any field has been recorded.
    pub fn preset(&self, speaker: &str) -> Option<&CueHints> {
        self.presets.get(speaker)
    }

    /// Per-speaker view of stored fields, sorted by name, for display.
    /// Speakers with no stored fields are omitted.
    pub fn grouped_view(&self) -> BTreeMap<String, CueHints> {
        self.presets
            .iter()
            .filter(|(_, hints)| !hints.is_empty())
            .map(|(name, hints)| (name.clone(), *hints))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::{CaptionLine, CueAlign};
    use crate::core::video::VideoRef;

    fn hints(position: Option<u32>, line: Option<u32>) -> CueHints {
        CueHints {
            position,
            line,
            ..CueHints::default()
        }
    }

    #[test]
    fn test_backfill_fills_only_blanks() {
        let mut store = SpeakerPresetStore::new();
        store.record("Alice", &hints(Some(10), Some(20)));

        let partial = hints(None, Some(99));
        let filled = store.backfill("Alice", &partial);
        assert_eq!(filled.position, Some(10));
        assert_eq!(filled.line, Some(99));
    }

    #[test]
    fn test_backfill_without_preset_is_identity() {
        let store = SpeakerPresetStore::new();
        let partial = hints(Some(5), None);
        assert_eq!(store.backfill("Nobody", &partial), partial);
    }

    #[test]
    fn test_record_merges_per_field() {
        let mut store = SpeakerPresetStore::new();
        store.record("Alice", &hints(Some(10), None));
        store.record("Alice", &hints(None, Some(20)));

        let preset = store.preset("Alice").unwrap();
        assert_eq!(preset.position, Some(10));
        assert_eq!(preset.line, Some(20));
    }

    #[test]
    fn test_record_ignores_blank_commits() {
        let mut store = SpeakerPresetStore::new();
        store.record("Alice", &CueHints::default());
        store.record("", &hints(Some(1), None));
        assert!(store.grouped_view().is_empty());
    }

    #[test]
    fn test_seed_from_keeps_last_mention() {
        let video = VideoRef::Youtube {
            id: "dQw4w9WgXcQ".to_string(),
        };
        let mut transcript = crate::core::transcript::Transcript::new(video);
        transcript.add_line(
            CaptionLine::text("early")
                .with_speakers("Alice")
                .with_hints(hints(Some(10), None)),
        );
        transcript.add_line(
            CaptionLine::text("late")
                .with_speakers("Alice")
                .with_hints(hints(Some(40), None)),
        );
        // no hints carried, must not disturb the preset
        transcript.add_line(CaptionLine::text("bare").with_speakers("Alice"));

        let mut store = SpeakerPresetStore::new();
        store.seed_from(&transcript);
        assert_eq!(store.preset("Alice").unwrap().position, Some(40));
    }

    #[test]
    fn test_grouped_view_sorted_and_filtered() {
        let mut store = SpeakerPresetStore::new();
        store.record("Zoe", &hints(Some(1), None));
        store.record(
            "Alice",
            &CueHints {
                align: Some(CueAlign::End),
                ..CueHints::default()
            },
        );

        let view = store.grouped_view();
        let names: Vec<&String> = view.keys().collect();
        assert_eq!(names, vec!["Alice", "Zoe"]);
        assert_eq!(view["Alice"].align, Some(CueAlign::End));
        assert_eq!(view["Alice"].position, None);
    }
}
