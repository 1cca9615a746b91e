//! Backend capability detection.
//!
//! Hosts adapt three families of playback engine into a
//! [`MediaElement`](crate::media::MediaElement): the platform's native player,
//! a plugin-based player for container formats the platform cannot decode, and
//! a third-party streaming widget addressed by page URL. Choosing which one to
//! build for a given element happens here, before any composition starts.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};

/// Media types served by the plugin-based player.
pub const PLUGIN_MEDIA_TYPES: &[&str] = &[
    "video/mp4",
    "video/m4v",
    "video/mov",
    "video/flv",
    "video/x-flv",
    "audio/flv",
    "audio/x-flv",
    "audio/mp3",
    "audio/m4a",
    "audio/mpeg",
];

/// Media types served by the streaming widget.
pub const STREAMING_WIDGET_MEDIA_TYPES: &[&str] = &["video/youtube", "video/x-youtube"];

/// Family of playback engine backing an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    Native,
    Plugin,
    StreamingWidget,
}

impl BackendKind {
    /// Fallback backend able to handle `media_type`, if any.
    ///
    /// Parameters such as `; codecs=...` are ignored and the comparison is
    /// case-insensitive.
    pub fn fallback_for(media_type: &str) -> Option<BackendKind> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if PLUGIN_MEDIA_TYPES.contains(&essence.as_str()) {
            Some(BackendKind::Plugin)
        } else if STREAMING_WIDGET_MEDIA_TYPES.contains(&essence.as_str()) {
            Some(BackendKind::StreamingWidget)
        } else {
            None
        }
    }
}

/// One candidate source declared for an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCandidate {
    pub media_type: String,
    pub url: String,
}

impl SourceCandidate {
    pub fn new(media_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            url: url.into(),
        }
    }
}

/// Outcome of [`select_backend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendSelection {
    /// Index into the candidate list.
    pub source_index: usize,
    pub backend: BackendKind,
}

/// Pick the backend for an element from its declared sources.
///
/// The native player wins whenever it accepts any candidate. Otherwise the
/// first candidate, in declaration order, that a fallback backend handles is
/// chosen.
///
/// # Errors
///
/// Returns [`BridgeError::NotAvailable`] when no backend can play any of the
/// candidates.
pub fn select_backend<F>(sources: &[SourceCandidate], can_play_natively: F) -> Result<BackendSelection>
where
    F: Fn(&SourceCandidate) -> bool,
{
    if let Some(source_index) = sources.iter().position(&can_play_natively) {
        return Ok(BackendSelection {
            source_index,
            backend: BackendKind::Native,
        });
    }

    sources
        .iter()
        .enumerate()
        .find_map(|(source_index, source)| {
            BackendKind::fallback_for(&source.media_type).map(|backend| BackendSelection {
                source_index,
                backend,
            })
        })
        .ok_or_else(|| {
            BridgeError::NotAvailable(format!(
                "no playback backend for sources [{}]",
                sources
                    .iter()
                    .map(|s| s.media_type.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<SourceCandidate> {
        vec![
            SourceCandidate::new("video/webm", "clip.webm"),
            SourceCandidate::new("video/x-youtube", "https://www.youtube.com/watch?v=YE7VzlLtp-4"),
            SourceCandidate::new("video/x-flv", "clip.flv"),
        ]
    }

    #[test]
    fn native_wins_when_supported() {
        let selection = select_backend(&sources(), |s| s.media_type == "video/webm").unwrap();
        assert_eq!(selection.backend, BackendKind::Native);
        assert_eq!(selection.source_index, 0);
    }

    #[test]
    fn first_fallback_in_declaration_order() {
        let selection = select_backend(&sources(), |_| false).unwrap();
        assert_eq!(selection.backend, BackendKind::StreamingWidget);
        assert_eq!(selection.source_index, 1);
    }

    #[test]
    fn media_type_parameters_are_ignored() {
        assert_eq!(
            BackendKind::fallback_for("Video/MP4; codecs=\"avc1.42E01E\""),
            Some(BackendKind::Plugin)
        );
        assert_eq!(BackendKind::fallback_for("video/ogg"), None);
    }

    #[test]
    fn no_backend_is_an_error() {
        let only_ogg = vec![SourceCandidate::new("video/ogg", "clip.ogv")];
        let err = select_backend(&only_ogg, |_| false).unwrap_err();
        assert!(matches!(err, BridgeError::NotAvailable(msg) if msg.contains("video/ogg")));
    }
}
