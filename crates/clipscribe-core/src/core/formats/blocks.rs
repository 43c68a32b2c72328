//! Time-Coded Text-Block Import
//!
//! Parses blank-line-separated blocks whose first line is a
//! `h:mm:ss.mmm,h:mm:ss.mmm` time range and whose remaining lines are the
//! caption text.

use tracing::debug;

use crate::core::{transcript::CaptionLine, CoreError, CoreResult, TimeSec};

/// Parses time-coded text blocks into caption lines.
pub fn parse_timed_blocks(input: &str) -> CoreResult<Vec<CaptionLine>> {
    let mut lines = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    // trailing sentinel flushes the final block
    for raw in input.lines().chain(std::iter::once("")) {
        if raw.trim().is_empty() {
            if !block.is_empty() {
                lines.push(parse_block(&block)?);
                block.clear();
            }
        } else {
            block.push(raw);
        }
    }

    debug!(lines = lines.len(), "Parsed time-coded blocks");
    Ok(lines)
}

fn parse_block(block: &[&str]) -> CoreResult<CaptionLine> {
    let header = block[0].trim();
    let (start_raw, end_raw) = header.split_once(',').ok_or_else(|| {
        CoreError::FormatError(format!("Expected 'start,end' time range: {header}"))
    })?;

    let start = parse_clock(start_raw)?;
    let end = parse_clock(end_raw)?;

    let text = block[1..]
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(CaptionLine::text(text).with_times(start, end))
}

/// Parses a `h:mm:ss.mmm` clock value into seconds.
fn parse_clock(raw: &str) -> CoreResult<TimeSec> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(CoreError::FormatError(format!(
            "Invalid clock value: {raw}"
        )));
    }

    let hours: TimeSec = parts[0]
        .parse()
        .map_err(|_| CoreError::FormatError(format!("Invalid clock value: {raw}")))?;
    let minutes: TimeSec = parts[1]
        .parse()
        .map_err(|_| CoreError::FormatError(format!("Invalid clock value: {raw}")))?;
    let seconds: TimeSec = parts[2]
        .parse()
        .map_err(|_| CoreError::FormatError(format!("Invalid clock value: {raw}")))?;

    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_block() {
        let input = "0:00:01.000,0:00:04.000\nHello world";
        let lines = parse_timed_blocks(input).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start, Some(1.0));
        assert_eq!(lines[0].end, Some(4.0));
        assert_eq!(lines[0].plain_text(), "Hello world");
    }

    #[test]
    fn test_parse_multiline_block_trims_and_joins() {
        let input = "0:00:01.000,0:00:04.000\n  first part  \n second part ";
        let lines = parse_timed_blocks(input).unwrap();
        assert_eq!(lines[0].plain_text(), "first part\nsecond part");
    }

    #[test]
    fn test_multiple_blocks_blank_line_separated() {
        let input = "0:00:01.000,0:00:04.000\nfirst\n\n\n0:01:30.500,0:01:33.000\nsecond";
        let lines = parse_timed_blocks(input).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, Some(90.5));
        assert_eq!(lines[1].end, Some(93.0));
        assert_eq!(lines[1].plain_text(), "second");
    }

    #[test]
    fn test_hours_component() {
        let input = "1:02:03.500,1:02:04.000\nlate";
        let lines = parse_timed_blocks(input).unwrap();
        assert_eq!(lines[0].start, Some(3723.5));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let err = parse_timed_blocks("not a time range\ntext").unwrap_err();
        assert!(matches!(err, CoreError::FormatError(_)));

        let err = parse_timed_blocks("0:00:01.000\ntext").unwrap_err();
        assert!(matches!(err, CoreError::FormatError(_)));

        let err = parse_timed_blocks("0:00:xx.000,0:00:04.000\ntext").unwrap_err();
        assert!(matches!(err, CoreError::FormatError(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_timed_blocks("").unwrap().is_empty());
        assert!(parse_timed_blocks("\n\n\n").unwrap().is_empty());
    }
}
