//! Sentence splitting using the seams library (dialog-aware).

use seams::sentence_detector::dialog_detector::SentenceDetectorDialog;
use std::sync::OnceLock;

/// Shared detector; `None` when it failed to initialize.
static DETECTOR: OnceLock<Option<SentenceDetectorDialog>> = OnceLock::new();

fn detector() -> Option<&'static SentenceDetectorDialog> {
    DETECTOR
        .get_or_init(|| match SentenceDetectorDialog::new() {
            Ok(detector) => Some(detector),
            Err(e) => {
                log::warn!("Sentence detector unavailable, windows will split on words: {}", e);
                None
            }
        })
        .as_ref()
}

/// Split text into sentences.
///
/// If the detector is unavailable or rejects the input, the trimmed text
/// comes back as a single sentence.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let Some(detector) = detector() else {
        return vec![trimmed.to_string()];
    };

    match detector.detect_sentences_borrowed(trimmed) {
        Ok(sentences) => {
            let sentences: Vec<String> = sentences
                .iter()
                .map(|s| s.normalize())
                .filter(|s| !s.is_empty())
                .collect();
            if sentences.is_empty() {
                vec![trimmed.to_string()]
            } else {
                sentences
            }
        }
        Err(e) => {
            log::debug!("Sentence detection failed, keeping text whole: {}", e);
            vec![trimmed.to_string()]
        }
    }
}
