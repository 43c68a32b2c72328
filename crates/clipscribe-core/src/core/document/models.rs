//! Canonical Document Models
//!
//! Serde shapes for the canonical, format-agnostic transcript document:
//! `{language, about, text: [...], translation?}`. The document is the
//! interchange/export format; field presence rules live here so that
//! serialization produces exactly the canonical spelling.

use serde::{Deserialize, Serialize};

use crate::core::{
    transcript::{CueHints, LineContent, Segment},
    CoreError, CoreResult, TimeSec,
};

// =============================================================================
// Duration Strings
// =============================================================================

/// Formats seconds as an ISO-8601-style duration string (`PT65.5S`).
pub fn format_pt(seconds: TimeSec) -> String {
    format!("PT{seconds}S")
}

/// Parses a `PT<seconds>S` duration string back into seconds.
pub fn parse_pt(raw: &str) -> CoreResult<TimeSec> {
    let inner = raw
        .strip_prefix("PT")
        .and_then(|rest| rest.strip_suffix('S'))
        .ok_or_else(|| CoreError::FormatError(format!("Invalid duration string: {raw}")))?;
    let seconds: TimeSec = inner
        .parse()
        .map_err(|_| CoreError::FormatError(format!("Invalid duration string: {raw}")))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(CoreError::FormatError(format!(
            "Invalid duration string: {raw}"
        )));
    }
    Ok(seconds)
}

// =============================================================================
// Canonical Text
// =============================================================================

/// A sub-span inside a segmented canonical text value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalSegment {
    Plain(String),
    Annotated {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotation: Option<String>,
    },
}

/// A caption item's text: a plain JSON string, or an array of plain and
/// annotated sub-spans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalText {
    Plain(String),
    Segments(Vec<CanonicalSegment>),
}

impl From<&LineContent> for CanonicalText {
    fn from(content: &LineContent) -> Self {
        match content {
            LineContent::Plain(text) => CanonicalText::Plain(text.clone()),
            LineContent::Segments(segments) => CanonicalText::Segments(
                segments
                    .iter()
                    .map(|segment| match &segment.annotation {
                        // an annotation-free span spells as a plain string
                        None => CanonicalSegment::Plain(segment.text.clone()),
                        Some(annotation) => CanonicalSegment::Annotated {
                            text: segment.text.clone(),
                            annotation: Some(annotation.clone()),
                        },
                    })
                    .collect(),
            ),
        }
    }
}

impl From<CanonicalText> for LineContent {
    fn from(text: CanonicalText) -> Self {
        match text {
            CanonicalText::Plain(text) => LineContent::Plain(text),
            CanonicalText::Segments(segments) => LineContent::Segments(
                segments
                    .into_iter()
                    .map(|segment| match segment {
                        CanonicalSegment::Plain(text) => Segment {
                            text,
                            annotation: None,
                        },
                        CanonicalSegment::Annotated { text, annotation } => {
                            Segment { text, annotation }
                        }
                    })
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// Canonical Document
// =============================================================================

/// One caption item inside the canonical document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItem {
    pub text: CanonicalText,
    /// Present only when the line carries full timing (`PT<seconds>S`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Present only when non-empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Vec<String>>,
    /// Present only when true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follows_on_from_previous: Option<bool>,
    /// Present only when at least one hint is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue_settings: Option<CueHints>,
}

/// The canonical structured transcript document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalDocument {
    pub language: String,
    /// Canonical URL of the captioned video
    pub about: String,
    pub text: Vec<CanonicalItem>,
    /// Localization placeholder; accepted on import, never produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<CanonicalItem>>,
}

// =============================================================================
// Tests
// =============================================================================
