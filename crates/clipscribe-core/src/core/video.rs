//! Video Reference Resolution
//!
//! Recognizes the supported video URL shapes and renders canonical URLs.
//! A YouTube short-link or watch-link yields an 11-character video id; a
//! Twitch clip link yields a clip slug. Anything else is a format error.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{CoreError, CoreResult};

fn youtube_regex() -> &'static Regex {
    static YOUTUBE: OnceLock<Regex> = OnceLock::new();
    YOUTUBE.get_or_init(|| {
        Regex::new(r"^(?:https?://(?:www\.)?)?(?:youtu\.be/|youtube\.com/watch\?v=)([A-Za-z0-9_-]{11})")
            .expect("Failed to compile YouTube URL regex")
    })
}

fn twitch_clip_regex() -> &'static Regex {
    static TWITCH_CLIP: OnceLock<Regex> = OnceLock::new();
    TWITCH_CLIP.get_or_init(|| {
        Regex::new(r"^(?:https?://(?:www\.)?)?clips\.twitch\.tv/([A-Za-z0-9_-]+)")
            .expect("Failed to compile Twitch clip URL regex")
    })
}

/// Reference to the video a transcript captions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "platform")]
pub enum VideoRef {
    /// A YouTube video, identified by its 11-character id
    Youtube { id: String },
    /// A Twitch clip, identified by its slug
    Twitch { slug: String },
}

impl VideoRef {
    /// Resolves a user-supplied URL against the supported patterns.
    pub fn parse(url: &str) -> CoreResult<Self> {
        let trimmed = url.trim();
        if let Some(captures) = youtube_regex().captures(trimmed) {
            return Ok(VideoRef::Youtube {
                id: captures[1].to_string(),
            });
        }
        if let Some(captures) = twitch_clip_regex().captures(trimmed) {
            return Ok(VideoRef::Twitch {
                slug: captures[1].to_string(),
            });
        }
        Err(CoreError::FormatError(format!(
            "Unsupported video URL: {url}"
        )))
    }

    /// Renders the canonical URL for this reference.
    pub fn canonical_url(&self) -> String {
        match self {
            VideoRef::Youtube { id } => format!("https://youtu.be/{id}"),
            VideoRef::Twitch { slug } => format!("https://clips.twitch.tv/{slug}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
