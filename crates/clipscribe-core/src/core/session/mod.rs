//! Editing Session Module
//!
//! Session-scoped context object owning the active transcript, the speaker
//! preset store, and the derived-speaker change key. The editing-surface
//! adapter drives the session through explicit methods — there are no
//! ambient event subscriptions — and every mutation path goes through the
//! caption line's own setters.
//!
//! Starting a new session (new video, new import) replaces this state
//! wholesale; nothing is merged and nothing persists across sessions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    document::{serialize_transcript, CanonicalDocument},
    formats::export_vtt,
    transcript::{
        parse_percent_field, parse_time_field, split_speakers, CaptionLine, CueAlign, CueHints,
        LineContent, SpeakerPresetStore, Transcript,
    },
    CoreError, CoreResult, LineId, TimeSec,
};

// =============================================================================
// Adapter DTOs
// =============================================================================

/// Raw form values submitted for one line by the editing-surface adapter.
/// Blank strings mean "unset"; validation happens inside the session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsForm {
    /// Comma list of speaker names
    pub speaker: String,
    /// Start time in seconds
    pub start: String,
    /// End time in seconds
    pub end: String,
    /// Cue position percentage
    pub position: String,
    /// Cue line percentage
    pub line: String,
    /// Cue size percentage
    pub size: String,
    /// Cue alignment: start, middle, or end
    pub align: String,
    /// Continuation flag
    pub continuation: bool,
}

/// Output of a rebuild: the canonical document, the subtitle-track text, and
/// the new speaker list when it differs from the previous rebuild.
#[derive(Clone, Debug)]
pub struct RebuildOutput {
    pub document: CanonicalDocument,
    pub track_text: String,
    /// Set only when the derived speaker set changed
    pub speakers_changed: Option<Vec<String>>,
}

/// Fully parsed settings, produced before any mutation so a commit is
/// all-or-nothing.
struct ParsedSettings {
    speakers: Vec<String>,
    start: Option<TimeSec>,
    end: Option<TimeSec>,
    provided: CueHints,
}

fn parse_settings(form: &SettingsForm) -> CoreResult<ParsedSettings> {
    Ok(ParsedSettings {
        speakers: split_speakers(&form.speaker),
        start: parse_time_field(&form.start)?,
        end: parse_time_field(&form.end)?,
        provided: CueHints {
            position: parse_percent_field(&form.position),
            line: parse_percent_field(&form.line),
            size: parse_percent_field(&form.size),
            align: CueAlign::parse(&form.align)?,
        },
    })
}

// =============================================================================
// Editing Session
// =============================================================================

/// Owner of all session-scoped editing state.
#[derive(Debug)]
pub struct EditingSession {
    transcript: Transcript,
    presets: SpeakerPresetStore,
    /// Sorted-joined speaker list from the last rebuild
    speaker_key: String,
}

impl EditingSession {
    /// Starts a session over an imported transcript, seeding speaker presets
    /// from the existing caption data.
    pub fn new(transcript: Transcript) -> CoreResult<Self> {
        if transcript.is_empty() {
            return Err(CoreError::PreconditionError(
                "Transcript has no caption lines to edit".to_string(),
            ));
        }

        let mut presets = SpeakerPresetStore::new();
        presets.seed_from(&transcript);
        debug!(lines = transcript.len(), "Started editing session");

        Ok(Self {
            transcript,
            presets,
            speaker_key: String::new(),
        })
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn presets(&self) -> &SpeakerPresetStore {
        &self.presets
    }

    /// Line IDs in playback order, for the adapter to key its rows by.
    pub fn line_ids(&self) -> Vec<LineId> {
        self.transcript.lines.iter().map(|l| l.id.clone()).collect()
    }

    // -------------------------------------------------------------------------
    // Line content (driven by the adapter's materialized line list)
    // -------------------------------------------------------------------------

    /// Appends a new line and returns its ID.
    pub fn push_line(&mut self, content: impl Into<LineContent>) -> LineId {
        let line = CaptionLine::new(content);
        let id = line.id.clone();
        self.transcript.add_line(line);
        id
    }

    /// Replaces a line's text content.
    pub fn update_line_content(
        &mut self,
        line_id: &str,
        content: impl Into<LineContent>,
    ) -> CoreResult<()> {
        let line = self
            .transcript
            .line_mut(line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        line.content = content.into();
        Ok(())
    }

    /// Removes a line; its settings association goes with it.
    pub fn remove_line(&mut self, line_id: &str) -> CoreResult<()> {
        self.transcript
            .remove_line(line_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    /// Commits a settings form against one line: every field is validated
    /// first, then all fields are applied together. A validation failure
    /// leaves the line untouched.
    ///
    /// Committed non-blank hint values become the speaker's new preset;
    /// blank hint fields are backfilled from the presets of the named
    /// speakers in order.
    pub fn apply_settings(&mut self, line_id: &str, form: &SettingsForm) -> CoreResult<RebuildOutput> {
        let parsed = parse_settings(form)?;
        if self.transcript.line(line_id).is_none() {
            return Err(CoreError::LineNotFound(line_id.to_string()));
        }

        for speaker in &parsed.speakers {
            self.presets.record(speaker, &parsed.provided);
        }

        let mut effective = parsed.provided;
        for speaker in &parsed.speakers {
            effective = self.presets.backfill(speaker, &effective);
        }

        if let Some(line) = self.transcript.line_mut(line_id) {
            line.speakers = parsed.speakers;
            line.start = parsed.start;
            line.end = parsed.end;
            line.hints = effective;
            line.continuation = form.continuation;
        }

        debug!(line_id, "Applied settings commit");
        Ok(self.rebuild())
    }

    /// Form population for a selected line: current values, with blank hint
    /// fields backfilled from the named speakers' presets.
    pub fn on_line_selected(&self, line_id: &str) -> CoreResult<SettingsForm> {
        let line = self
            .transcript
            .line(line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;

        let mut hints = line.hints;
        for speaker in &line.speakers {
            hints = self.presets.backfill(speaker, &hints);
        }

        Ok(SettingsForm {
            speaker: line.speaker_list(),
            start: line.start.map(|v| v.to_string()).unwrap_or_default(),
            end: line.end.map(|v| v.to_string()).unwrap_or_default(),
            position: hints.position.map(|v| v.to_string()).unwrap_or_default(),
            line: hints.line.map(|v| v.to_string()).unwrap_or_default(),
            size: hints.size.map(|v| v.to_string()).unwrap_or_default(),
            align: hints
                .align
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
            continuation: line.continuation,
        })
    }

    // -------------------------------------------------------------------------
    // Rebuild
    // -------------------------------------------------------------------------

    /// Refreshes the canonical document and the subtitle track, signaling
    /// the new speaker list only when the derived set changed.
    pub fn rebuild(&mut self) -> RebuildOutput {
        let document = serialize_transcript(&self.transcript);
        let track_text = export_vtt(&self.transcript);

        let speakers = self.transcript.speakers();
        let key = speakers.join(",");
        let speakers_changed = if key != self.speaker_key {
            self.speaker_key = key;
            Some(speakers)
        } else {
            None
        };

        RebuildOutput {
            document,
            track_text,
            speakers_changed,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
