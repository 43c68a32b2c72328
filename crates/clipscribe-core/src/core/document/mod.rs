//! Canonical Document Codec
//!
//! Serializes a transcript into the canonical structured document and
//! imports canonical documents back into transcripts. Import validates the
//! raw document against the schema collaborator first; a failed validation
//! aborts the whole import and no partial transcript is produced.

mod models;
mod schema;

pub use models::{
    format_pt, parse_pt, CanonicalDocument, CanonicalItem, CanonicalSegment, CanonicalText,
};
pub use schema::{check_document, SchemaValidator, SchemaViolation, StructuralValidator};

use tracing::debug;

use crate::core::{
    transcript::{CaptionLine, LineContent, Transcript},
    video::VideoRef,
    CoreError, CoreResult,
};

// =============================================================================
// Serialization
// =============================================================================

/// Serializes a transcript into the canonical document.
pub fn serialize_transcript(transcript: &Transcript) -> CanonicalDocument {
    CanonicalDocument {
        language: transcript.language.clone(),
        about: transcript.video.canonical_url(),
        text: transcript.lines.iter().map(item_from_line).collect(),
        translation: None,
    }
}

fn item_from_line(line: &CaptionLine) -> CanonicalItem {
    // times surface only when the line carries both
    let (start_time, end_time) = match (line.start, line.end) {
        (Some(start), Some(end)) => (Some(format_pt(start)), Some(format_pt(end))),
        _ => (None, None),
    };

    CanonicalItem {
        text: CanonicalText::from(&line.content),
        start_time,
        end_time,
        speaker: if line.speakers.is_empty() {
            None
        } else {
            Some(line.speakers.clone())
        },
        follows_on_from_previous: line.continuation.then_some(true),
        cue_settings: if line.hints.is_empty() {
            None
        } else {
            Some(line.hints)
        },
    }
}

// =============================================================================
// Import
// =============================================================================

/// Imports a canonical document, validating it against the schema
/// collaborator before any transcript state is constructed.
pub async fn import_canonical(
    raw: &str,
    validator: &dyn SchemaValidator,
) -> CoreResult<Transcript> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    validator
        .validate(&value)
        .await
        .map_err(|violations| CoreError::SchemaError { violations })?;

    let document: CanonicalDocument = serde_json::from_value(value)?;
    transcript_from_document(document)
}

/// Maps an already-validated canonical document onto a transcript.
pub fn transcript_from_document(document: CanonicalDocument) -> CoreResult<Transcript> {
    let video = VideoRef::parse(&document.about)?;

    let mut lines = Vec::with_capacity(document.text.len());
    for item in document.text {
        lines.push(line_from_item(item)?);
    }
    debug!(lines = lines.len(), "Imported canonical document");

    Ok(Transcript::from_lines(video, &document.language, lines))
}

fn line_from_item(item: CanonicalItem) -> CoreResult<CaptionLine> {
    let mut line = CaptionLine::new(LineContent::from(item.text));
    line.start = item.start_time.as_deref().map(parse_pt).transpose()?;
    line.end = item.end_time.as_deref().map(parse_pt).transpose()?;
    line.speakers = item.speaker.unwrap_or_default();
    line.continuation = item.follows_on_from_previous.unwrap_or(false);
    line.hints = item.cue_settings.unwrap_or_default();
    Ok(line)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::{CueAlign, CueHints, LineContent, Segment};

    fn sample_transcript() -> Transcript {
        let video = VideoRef::Youtube {
            id: "dQw4w9WgXcQ".to_string(),
        };
        let mut transcript = Transcript::new(video);
        transcript.add_line(
            CaptionLine::text("hello world")
                .with_times(1.0, 4.0)
                .with_speakers("Alice")
                .with_hints(CueHints {
                    position: Some(10),
                    align: Some(CueAlign::Middle),
                    ..CueHints::default()
                }),
        );
        transcript.add_line(
            CaptionLine::new(LineContent::Segments(vec![
                Segment::plain("see "),
                Segment::annotated("this", "cross-reference"),
            ]))
            .with_continuation(true),
        );
        transcript
    }

    #[test]
    fn test_serialize_presence_rules() {
        let document = serialize_transcript(&sample_transcript());
        assert_eq!(document.about, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(document.language, "en");

        let first = &document.text[0];
        assert_eq!(first.start_time.as_deref(), Some("PT1S"));
        assert_eq!(first.end_time.as_deref(), Some("PT4S"));
        assert_eq!(first.speaker.as_deref(), Some(&["Alice".to_string()][..]));
        assert_eq!(first.follows_on_from_previous, None);
        assert!(first.cue_settings.is_some());

        let second = &document.text[1];
        assert_eq!(second.start_time, None);
        assert_eq!(second.end_time, None);
        assert_eq!(second.speaker, None);
        assert_eq!(second.follows_on_from_previous, Some(true));
        assert_eq!(second.cue_settings, None);
    }

    #[test]
    fn test_partial_timing_is_omitted() {
        let video = VideoRef::Youtube {
            id: "dQw4w9WgXcQ".to_string(),
        };
        let mut transcript = Transcript::new(video);
        let mut line = CaptionLine::text("half-timed");
        line.start = Some(2.0);
        transcript.add_line(line);

        let document = serialize_transcript(&transcript);
        assert_eq!(document.text[0].start_time, None);
        assert_eq!(document.text[0].end_time, None);
    }

    #[tokio::test]
    async fn test_canonical_round_trip() {
        let original = sample_transcript();
        let document = serialize_transcript(&original);
        let raw = serde_json::to_string(&document).unwrap();

        let imported = import_canonical(&raw, &StructuralValidator).await.unwrap();

        assert_eq!(imported.video, original.video);
        assert_eq!(imported.language, original.language);
        assert_eq!(imported.len(), original.len());
        for (a, b) in imported.lines.iter().zip(original.lines.iter()) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
            assert_eq!(a.speakers, b.speakers);
            assert_eq!(a.continuation, b.continuation);
            assert_eq!(a.hints, b.hints);
        }
    }

    #[tokio::test]
    async fn test_invalid_document_aborts_with_violations() {
        let raw = r#"{"language": "en", "text": []}"#;
        let err = import_canonical(raw, &StructuralValidator)
            .await
            .unwrap_err();
        let CoreError::SchemaError { violations } = err else {
            panic!("expected SchemaError");
        };
        assert!(!violations.is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_about_url_is_format_error() {
        let raw = r#"{
            "language": "en",
            "about": "https://example.com/video",
            "text": [{"text": "hi"}]
        }"#;
        let err = import_canonical(raw, &StructuralValidator)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::FormatError(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_error() {
        let err = import_canonical("{not json", &StructuralValidator)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::JsonError(_)));
    }
}
