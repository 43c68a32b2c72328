//! Caption Data Models
//!
//! Defines the caption line and transcript structures.
//!
//! # Overview
//!
//! A [`Transcript`] is an ordered sequence of [`CaptionLine`]s plus the video
//! reference and language tag. Line order is playback order and is preserved
//! through every transform. Each line owns its own field validation: raw form
//! input goes through the `set_*` methods, which normalize or reject it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{video::VideoRef, CoreError, CoreResult, LineId, TimeSec};

// =============================================================================
// Field Parsing
// =============================================================================

fn float_prefix_regex() -> &'static Regex {
    static FLOAT_PREFIX: OnceLock<Regex> = OnceLock::new();
    FLOAT_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)").expect("Failed to compile float prefix regex")
    })
}

fn plain_seconds_regex() -> &'static Regex {
    static PLAIN_SECONDS: OnceLock<Regex> = OnceLock::new();
    PLAIN_SECONDS
        .get_or_init(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("Failed to compile seconds regex"))
}

/// Parses the longest leading float of a raw field value, like a lenient
/// form-input scanner. Returns `None` when the input has no leading numeral.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    float_prefix_regex()
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parses a raw start/end form value into optional seconds.
///
/// Empty input, or input with no leading numeral at all, clears the field.
/// Input that starts numeric but is not a plain non-negative decimal numeral
/// (e.g. `"12px"`, `"-5"`) is rejected.
pub fn parse_time_field(raw: &str) -> CoreResult<Option<TimeSec>> {
    let trimmed = raw.trim();
    if parse_float_prefix(trimmed).is_none() {
        return Ok(None);
    }
    if !plain_seconds_regex().is_match(trimmed) {
        return Err(CoreError::ValidationError(format!(
            "Invalid time value: {raw}"
        )));
    }
    trimmed
        .parse::<TimeSec>()
        .map(Some)
        .map_err(|_| CoreError::ValidationError(format!("Invalid time value: {raw}")))
}

/// Parses a raw position/line/size form value into an optional percentage.
///
/// Unparseable input clears the field; negative values clamp to 0 and
/// fractional values truncate toward zero.
pub fn parse_percent_field(raw: &str) -> Option<u32> {
    let value = parse_float_prefix(raw.trim())?;
    Some(value.max(0.0).trunc() as u32)
}

/// Splits a raw comma list of speaker names into the canonical form:
/// trimmed entries, empties dropped, duplicates removed in order.
pub fn split_speakers(raw: &str) -> Vec<String> {
    let mut names = Vec::new();
    for name in raw.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

// =============================================================================
// Line Content
// =============================================================================

/// One sub-span of a segmented caption line, optionally carrying a free-text
/// annotation (e.g. a cross-reference). Annotations are canonical-only and
/// never surface in the emitted subtitle track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotation: None,
        }
    }

    pub fn annotated(text: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotation: Some(annotation.into()),
        }
    }
}

/// A caption line's text content: a plain string, or an ordered sequence of
/// segments when the line has annotated sub-spans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineContent {
    Plain(String),
    Segments(Vec<Segment>),
}

impl LineContent {
    /// Concatenates the plain text of all segments, in order, ignoring
    /// annotation metadata.
    pub fn plain_text(&self) -> String {
        match self {
            LineContent::Plain(text) => text.clone(),
            LineContent::Segments(segments) => {
                segments.iter().map(|s| s.text.as_str()).collect::<String>()
            }
        }
    }
}

impl From<&str> for LineContent {
    fn from(text: &str) -> Self {
        LineContent::Plain(text.to_string())
    }
}

impl From<String> for LineContent {
    fn from(text: String) -> Self {
        LineContent::Plain(text)
    }
}

// =============================================================================
// Cue Presentation Hints
// =============================================================================

/// Horizontal alignment of cue text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueAlign {
    Start,
    Middle,
    End,
}

impl CueAlign {
    /// Parses a raw form value: one of the three literals, or blank for unset.
    pub fn parse(raw: &str) -> CoreResult<Option<Self>> {
        match raw.trim() {
            "" => Ok(None),
            "start" => Ok(Some(CueAlign::Start)),
            "middle" => Ok(Some(CueAlign::Middle)),
            "end" => Ok(Some(CueAlign::End)),
            other => Err(CoreError::ValidationError(format!(
                "Invalid alignment value: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CueAlign::Start => "start",
            CueAlign::Middle => "middle",
            CueAlign::End => "end",
        }
    }
}

impl fmt::Display for CueAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional cue-presentation hints: position/line/size percentages and
/// text alignment. Each field may be unset independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CueHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<CueAlign>,
}

impl CueHints {
    /// Returns true if no hint is set.
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.line.is_none() && self.size.is_none() && self.align.is_none()
    }
}

// =============================================================================
// Caption Line
// =============================================================================

/// A single caption line with text content, timing, speakers, and
/// cue-presentation hints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionLine {
    /// Unique identifier, assigned at creation
    pub id: LineId,
    /// Text content (plain or segmented)
    pub content: LineContent,
    /// Start time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeSec>,
    /// End time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<TimeSec>,
    /// Ordered speaker names, duplicates removed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speakers: Vec<String>,
    /// True if this line's speech continues without a pause from the previous line
    #[serde(default)]
    pub continuation: bool,
    /// Cue-presentation hints
    #[serde(default, skip_serializing_if = "CueHints::is_empty")]
    pub hints: CueHints,
}

impl CaptionLine {
    /// Creates a new caption line with the given content
    pub fn new(content: impl Into<LineContent>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            content: content.into(),
            start: None,
            end: None,
            speakers: Vec::new(),
            continuation: false,
            hints: CueHints::default(),
        }
    }

    /// Creates a text-only caption line
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(LineContent::Plain(text.into()))
    }

    /// Sets both times
    pub fn with_times(mut self, start: TimeSec, end: TimeSec) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Sets the speaker list from a raw comma list
    pub fn with_speakers(mut self, raw: &str) -> Self {
        self.set_speakers(raw);
        self
    }

    /// Sets the cue-presentation hints
    pub fn with_hints(mut self, hints: CueHints) -> Self {
        self.hints = hints;
        self
    }

    /// Marks the line as a continuation of the previous one
    pub fn with_continuation(mut self, continuation: bool) -> Self {
        self.continuation = continuation;
        self
    }

    /// Returns the line's plain display text (segment annotations ignored)
    pub fn plain_text(&self) -> String {
        self.content.plain_text()
    }

    /// Returns the canonical comma-joined speaker list
    pub fn speaker_list(&self) -> String {
        self.speakers.join(",")
    }

    // -------------------------------------------------------------------------
    // Field setters (raw form input)
    // -------------------------------------------------------------------------

    /// Replaces the speaker list from a raw comma list
    pub fn set_speakers(&mut self, raw: &str) {
        self.speakers = split_speakers(raw);
    }

    /// Sets or clears the start time from a raw form value
    pub fn set_start(&mut self, raw: &str) -> CoreResult<()> {
        self.start = parse_time_field(raw)?;
        Ok(())
    }

    /// Sets or clears the end time from a raw form value
    pub fn set_end(&mut self, raw: &str) -> CoreResult<()> {
        self.end = parse_time_field(raw)?;
        Ok(())
    }

    /// Sets or clears the position hint from a raw form value
    pub fn set_position(&mut self, raw: &str) {
        self.hints.position = parse_percent_field(raw);
    }

    /// Sets or clears the line hint from a raw form value
    pub fn set_line(&mut self, raw: &str) {
        self.hints.line = parse_percent_field(raw);
    }

    /// Sets or clears the size hint from a raw form value
    pub fn set_size(&mut self, raw: &str) {
        self.hints.size = parse_percent_field(raw);
    }

    /// Sets or clears the alignment hint from a raw form value
    pub fn set_align(&mut self, raw: &str) -> CoreResult<()> {
        self.hints.align = CueAlign::parse(raw)?;
        Ok(())
    }

    /// Sets the continuation flag
    pub fn set_continuation(&mut self, continuation: bool) {
        self.continuation = continuation;
    }

    /// Returns true if the line carries full timing and is eligible for
    /// subtitle-track emission
    pub fn is_timed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

// =============================================================================
// Transcript
// =============================================================================

/// Ordered collection of caption lines with the video reference and language
/// tag. Created wholesale by exactly one importer call and replaced when a
/// new video is loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Video this transcript captions
    pub video: VideoRef,
    /// Language tag (e.g. "en", "ko", "ja")
    pub language: String,
    /// Caption lines in playback order
    pub lines: Vec<CaptionLine>,
}

impl Transcript {
    /// Creates an empty transcript for a video
    pub fn new(video: VideoRef) -> Self {
        Self {
            video,
            language: "en".to_string(),
            lines: Vec::new(),
        }
    }

    /// Creates a transcript from imported lines
    pub fn from_lines(video: VideoRef, language: &str, lines: Vec<CaptionLine>) -> Self {
        Self {
            video,
            language: language.to_string(),
            lines,
        }
    }

    /// Appends a line, preserving insertion order
    pub fn add_line(&mut self, line: CaptionLine) {
        self.lines.push(line);
    }

    /// Removes a line by ID
    pub fn remove_line(&mut self, line_id: &str) -> Option<CaptionLine> {
        let pos = self.lines.iter().position(|l| l.id == line_id)?;
        debug!(line_id, "Removing caption line");
        Some(self.lines.remove(pos))
    }

    /// Gets a line by ID
    pub fn line(&self, line_id: &str) -> Option<&CaptionLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Gets a mutable line by ID
    pub fn line_mut(&mut self, line_id: &str) -> Option<&mut CaptionLine> {
        self.lines.iter_mut().find(|l| l.id == line_id)
    }

    /// Gets a line by position
    pub fn line_at(&self, index: usize) -> Option<&CaptionLine> {
        self.lines.get(index)
    }

    /// Derived speaker registry: every name appearing on any line, sorted
    /// and deduplicated. Recomputed on every call, never stored.
    pub fn speakers(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .lines
            .iter()
            .flat_map(|l| l.speakers.iter().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Returns the number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the transcript has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
