//! WebVTT Track Emission
//!
//! Renders a transcript as a WebVTT-compatible cue stream: a fixed header
//! line, a blank line, then one cue block per fully-timed line. Lines
//! without full timing are skipped silently and consume no cue index.

use tracing::debug;

use crate::core::{transcript::Transcript, TimeSec};

/// Formats seconds as a cue timestamp: `MM:SS.mmm` with minutes zero-padded
/// to width 2 and never an hours component (3605.25 renders as `60:05.250`).
pub fn format_cue_time(seconds: TimeSec) -> String {
    let minutes = (seconds / 60.0).floor();
    let remainder = seconds - minutes * 60.0;
    format!("{:02}:{:06.3}", minutes as u64, remainder)
}

/// Exports a transcript as WebVTT track text.
pub fn export_vtt(transcript: &Transcript) -> String {
    let mut output = String::from("WEBVTT\n\n");
    let mut cue_index = 0usize;

    for line in &transcript.lines {
        let (Some(start), Some(end)) = (line.start, line.end) else {
            debug!(line_id = %line.id, "Skipping untimed line in track output");
            continue;
        };

        output.push_str(&format!("{cue_index}\n"));
        output.push_str(&format_cue_time(start));
        output.push_str(" --> ");
        output.push_str(&format_cue_time(end));

        // cue settings in fixed order, each only when set
        if let Some(position) = line.hints.position {
            output.push_str(&format!(" position:{position}%"));
        }
        if let Some(line_hint) = line.hints.line {
            output.push_str(&format!(" line:{line_hint}%"));
        }
        if let Some(size) = line.hints.size {
            if size > 0 {
                output.push_str(&format!(" size:{size}%"));
            }
        }
        if let Some(align) = line.hints.align {
            output.push_str(&format!(" align:{align}"));
        }

        output.push('\n');
        output.push_str(&line.plain_text());
        output.push_str("\n\n");
        cue_index += 1;
    }

    output.trim_end().to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::{CaptionLine, CueAlign, CueHints, LineContent, Segment};
    use crate::core::video::VideoRef;

    fn transcript_with(lines: Vec<CaptionLine>) -> Transcript {
        let video = VideoRef::Youtube {
            id: "dQw4w9WgXcQ".to_string(),
        };
        Transcript::from_lines(video, "en", lines)
    }

    // -------------------------------------------------------------------------
    // Timestamp Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_format_cue_time() {
        assert_eq!(format_cue_time(65.5), "01:05.500");
        assert_eq!(format_cue_time(0.0), "00:00.000");
        assert_eq!(format_cue_time(1.25), "00:01.250");
    }

    #[test]
    fn test_format_cue_time_never_emits_hours() {
        assert_eq!(format_cue_time(3605.25), "60:05.250");
        assert_eq!(format_cue_time(7200.0), "120:00.000");
    }

    // -------------------------------------------------------------------------
    // Emission Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_export_basic() {
        let transcript = transcript_with(vec![
            CaptionLine::text("Hello World").with_times(1.0, 4.0),
            CaptionLine::text("Second caption").with_times(5.5, 8.0),
        ]);

        let vtt = export_vtt(&transcript);
        assert_eq!(
            vtt,
            "WEBVTT\n\n0\n00:01.000 --> 00:04.000\nHello World\n\n1\n00:05.500 --> 00:08.000\nSecond caption"
        );
    }

    #[test]
    fn test_untimed_lines_skipped_without_consuming_indices() {
        let transcript = transcript_with(vec![
            CaptionLine::text("timed").with_times(0.0, 1.0),
            CaptionLine::text("untimed"),
            CaptionLine::text("also timed").with_times(2.0, 3.0),
        ]);

        let vtt = export_vtt(&transcript);
        assert!(!vtt.contains("untimed\n"));
        assert!(vtt.contains("0\n00:00.000"));
        // the cue after the skipped line takes index 1, not 2
        assert!(vtt.contains("1\n00:02.000"));
    }

    #[test]
    fn test_cue_settings_fixed_order() {
        let transcript = transcript_with(vec![CaptionLine::text("styled")
            .with_times(0.0, 2.0)
            .with_hints(CueHints {
                position: Some(10),
                line: Some(20),
                size: Some(30),
                align: Some(CueAlign::End),
            })]);

        let vtt = export_vtt(&transcript);
        assert!(vtt.contains("00:00.000 --> 00:02.000 position:10% line:20% size:30% align:end"));
    }

    #[test]
    fn test_zero_size_not_emitted() {
        let transcript = transcript_with(vec![CaptionLine::text("sized")
            .with_times(0.0, 2.0)
            .with_hints(CueHints {
                position: Some(0),
                size: Some(0),
                ..CueHints::default()
            })]);

        let vtt = export_vtt(&transcript);
        // position:0% is a real setting, size:0% is not
        assert!(vtt.contains("position:0%"));
        assert!(!vtt.contains("size:"));
    }

    #[test]
    fn test_annotations_never_surface() {
        let transcript = transcript_with(vec![CaptionLine::new(LineContent::Segments(vec![
            Segment::plain("plain "),
            Segment::annotated("noted", "a cross-reference"),
        ]))
        .with_times(0.0, 2.0)]);

        let vtt = export_vtt(&transcript);
        assert!(vtt.contains("plain noted"));
        assert!(!vtt.contains("cross-reference"));
    }

    #[test]
    fn test_empty_transcript_is_header_only() {
        let transcript = transcript_with(vec![]);
        assert_eq!(export_vtt(&transcript), "WEBVTT");
    }
}
