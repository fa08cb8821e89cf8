//! Merging generated text into a pull request description.
//!
//! With anchors, the text between `start` and `end` is owned by this tool and
//! replaced on every run; everything outside the anchors belongs to the author
//! and is kept verbatim. The author's part is introduced by a single
//! [`AUTHOR_NOTES_HEADER`].

use crate::models::Anchors;

pub const AUTHOR_NOTES_HEADER: &str = "## Author Notes";

/// Computes the new description. Returns the existing text unchanged when
/// there is nothing to do, so callers can skip the write by comparing.
pub fn merge_description(existing: Option<&str>, body: &str, anchors: Option<&Anchors>) -> String {
    let existing = existing.filter(|d| !d.trim().is_empty());

    match anchors {
        Some(anchors) => merge_anchored(existing, body, anchors),
        None => merge_appended(existing, body),
    }
}

fn merge_anchored(existing: Option<&str>, body: &str, anchors: &Anchors) -> String {
    let Some(existing) = existing else {
        return anchored_block(body, anchors);
    };

    match existing.find(&anchors.start) {
        Some(start_idx) => {
            let prefix_end = start_idx + anchors.start.len();
            let prefix = &existing[..prefix_end];
            // A missing end anchor means the managed region runs to the end.
            let suffix = existing[prefix_end..]
                .find(&anchors.end)
                .map(|i| &existing[prefix_end + i..])
                .unwrap_or(anchors.end.as_str());

            format!("{}\n{}\n{}", with_header(prefix), body, suffix)
        }
        None => format!(
            "{}\n\n{}",
            with_header(existing),
            anchored_block(body, anchors)
        ),
    }
}

fn merge_appended(existing: Option<&str>, body: &str) -> String {
    match existing {
        None => body.to_string(),
        Some(existing) if existing.contains(body) => existing.to_string(),
        Some(existing) => format!("{}\n\n---\n{}", with_header(existing), body),
    }
}

fn anchored_block(body: &str, anchors: &Anchors) -> String {
    format!("{}\n{}\n{}", anchors.start, body, anchors.end)
}

fn with_header(text: &str) -> String {
    if text.contains(AUTHOR_NOTES_HEADER) {
        text.to_string()
    } else {
        format!("{}\n\n{}", AUTHOR_NOTES_HEADER, text)
    }
}
