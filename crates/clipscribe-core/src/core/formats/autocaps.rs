//! Auto-Transcript XML Import
//!
//! Parses the auto-generated transcript format: a `<transcript>` root with
//! `<text start=".." dur="..">` elements whose bodies are HTML-entity
//! encoded. Each element becomes one caption line with `end = start + dur`;
//! the format carries no speaker or presentation data.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::{transcript::CaptionLine, CoreError, CoreResult, TimeSec};

fn text_element_regex() -> &'static Regex {
    static TEXT_ELEMENT: OnceLock<Regex> = OnceLock::new();
    TEXT_ELEMENT.get_or_init(|| {
        Regex::new(r"(?s)<text\b([^>]*)>(.*?)</text>")
            .expect("Failed to compile text element regex")
    })
}

fn start_attribute_regex() -> &'static Regex {
    static START_ATTR: OnceLock<Regex> = OnceLock::new();
    START_ATTR.get_or_init(|| {
        Regex::new(r#"start="([^"]*)""#).expect("Failed to compile start attribute regex")
    })
}

fn dur_attribute_regex() -> &'static Regex {
    static DUR_ATTR: OnceLock<Regex> = OnceLock::new();
    DUR_ATTR.get_or_init(|| {
        Regex::new(r#"dur="([^"]*)""#).expect("Failed to compile dur attribute regex")
    })
}

/// Parses auto-transcript XML into caption lines.
pub fn parse_auto_transcript(input: &str) -> CoreResult<Vec<CaptionLine>> {
    let mut lines = Vec::new();

    for element in text_element_regex().captures_iter(input) {
        let attributes = &element[1];
        let start = parse_seconds_attribute(attributes, start_attribute_regex(), "start")?;
        let dur = parse_seconds_attribute(attributes, dur_attribute_regex(), "dur")?;

        let text = decode_entities(element[2].trim());
        lines.push(CaptionLine::text(text).with_times(start, start + dur));
    }

    debug!(lines = lines.len(), "Parsed auto-transcript XML");
    Ok(lines)
}

fn parse_seconds_attribute(
    attributes: &str,
    pattern: &Regex,
    name: &str,
) -> CoreResult<TimeSec> {
    let raw = pattern
        .captures(attributes)
        .map(|c| c[1].to_string())
        .ok_or_else(|| {
            CoreError::FormatError(format!("Timed-text element missing {name} attribute"))
        })?;
    raw.parse::<TimeSec>().map_err(|_| {
        CoreError::FormatError(format!("Invalid {name} attribute value: {raw}"))
    })
}

// =============================================================================
// Entity Decoding
// =============================================================================

/// Decodes HTML entity references (named, decimal, and hex) in place.
/// Unrecognized references are kept literally.
fn decode_entities(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // entity references are short; an unmatched '&' stays literal
        let decoded = tail
            .find(';')
            .filter(|&semi| semi > 1 && semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((character, semi)) => {
                output.push(character);
                rest = &tail[semi + 1..];
            }
            None => {
                output.push('&');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00a0}'),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_transcript() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<transcript>
  <text start="1.0" dur="2.5">Hello world</text>
  <text start="4.0" dur="1.5">Second line</text>
</transcript>"#;

        let lines = parse_auto_transcript(xml).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].start, Some(1.0));
        assert_eq!(lines[0].end, Some(3.5));
        assert_eq!(lines[0].plain_text(), "Hello world");
        assert_eq!(lines[1].start, Some(4.0));
        assert_eq!(lines[1].end, Some(5.5));
    }

    #[test]
    fn test_entities_decoded() {
        let xml = r#"<transcript><text start="0" dur="1">it&amp;#39;s &quot;here&quot; &amp; there &#x2F; everywhere</text></transcript>"#;
        let lines = parse_auto_transcript(xml).unwrap();
        // &amp; decodes once; the revealed &#39; stays literal
        assert_eq!(
            lines[0].plain_text(),
            "it&#39;s \"here\" & there / everywhere"
        );
    }

    #[test]
    fn test_numeric_entities() {
        let xml = r#"<transcript><text start="0" dur="1">&#39;quoted&#39; &#x41;</text></transcript>"#;
        let lines = parse_auto_transcript(xml).unwrap();
        assert_eq!(lines[0].plain_text(), "'quoted' A");
    }

    #[test]
    fn test_unmatched_ampersand_kept() {
        let xml = r#"<transcript><text start="0" dur="1">salt &amp; pepper & co</text></transcript>"#;
        let lines = parse_auto_transcript(xml).unwrap();
        assert_eq!(lines[0].plain_text(), "salt & pepper & co");
    }

    #[test]
    fn test_no_speakers_or_hints_produced() {
        let xml = r#"<transcript><text start="0" dur="1">hi</text></transcript>"#;
        let lines = parse_auto_transcript(xml).unwrap();
        assert!(lines[0].speakers.is_empty());
        assert!(lines[0].hints.is_empty());
    }

    #[test]
    fn test_missing_attributes_rejected() {
        let xml = r#"<transcript><text start="1.0">no duration</text></transcript>"#;
        let err = parse_auto_transcript(xml).unwrap_err();
        assert!(matches!(err, CoreError::FormatError(_)));

        let xml = r#"<transcript><text start="x" dur="1">bad start</text></transcript>"#;
        assert!(parse_auto_transcript(xml).is_err());
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert!(parse_auto_transcript("").unwrap().is_empty());
        assert!(parse_auto_transcript("<transcript></transcript>")
            .unwrap()
            .is_empty());
    }
}
