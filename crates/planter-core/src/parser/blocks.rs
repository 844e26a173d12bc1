//! Delimited block content parser.
//!
//! ## Format
//!
//! ```text
//! Anything outside blocks is ignored, never validated.
//!
//! @@@FILE_BEGIN {{Root}}/Source/Engine.h
//! #pragma once
//!
//! class Engine {};
//! @@@FILE_END
//!
//! @@@COMMENT_BEGIN
//! Review notes; dropped by the COMMENT policy.
//! @@@COMMENT_END
//! ```
//!
//! A marker line is optional leading whitespace, the `@@@` sentinel, an
//! uppercase keyword, and a `_BEGIN` or `_END` suffix. The begin marker may
//! carry an identifier in the rest of the line. Structure is validated over
//! the whole text first (blocks never nest, every begin needs its end);
//! only then are bodies extracted, byte-for-byte.

use tracing::{debug, instrument};

use crate::domain::{CapturePolicy, ContentBlock, error::BlockError, policy_for};

const SENTINEL: &str = "@@@";
const BEGIN_SUFFIX: &str = "_BEGIN";
const END_SUFFIX: &str = "_END";

enum MarkerKind<'a> {
    Begin(Option<&'a str>),
    End,
}

struct Marker<'a> {
    keyword: &'a str,
    kind: MarkerKind<'a>,
}

/// Parse block text, returning the blocks whose keyword policy captures.
///
/// Blocks with a `Discard` policy and blocks with unrecognized keywords are
/// parsed structurally and dropped.
#[instrument(skip_all)]
pub fn parse_blocks(text: &str) -> Result<Vec<ContentBlock>, BlockError> {
    let lines: Vec<&str> = text.split('\n').collect();
    validate_structure(&lines)?;

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(Marker {
            keyword,
            kind: MarkerKind::Begin(identifier),
        }) = classify_marker(lines[i])
        else {
            i += 1;
            continue;
        };

        // Validation guarantees a matching end before the next begin.
        let Some(end) = (i + 1..lines.len())
            .find(|j| matches!(classify_marker(lines[*j]), Some(Marker { kind: MarkerKind::End, .. })))
        else {
            break;
        };

        if policy_for(keyword) == Some(CapturePolicy::Capture) {
            blocks.push(ContentBlock {
                keyword: keyword.to_string(),
                identifier: identifier.map(str::to_string),
                body: body_text(&lines[i + 1..end]),
                line: i as u32 + 1,
            });
        }
        i = end + 1;
    }

    debug!(blocks = blocks.len(), "block text parsed");
    Ok(blocks)
}

/// Byte offset of the first marker line, used to split combined input.
///
/// Returns the leading slice of `text` that contains no marker lines.
pub(crate) fn text_before_first_marker(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split('\n') {
        if classify_marker(line).is_some() {
            return &text[..offset];
        }
        offset += line.len() + 1;
    }
    text
}

/// One pass over every marker: nesting, mismatches, stray and unclosed ends.
fn validate_structure(lines: &[&str]) -> Result<(), BlockError> {
    let mut open: Option<(String, u32)> = None;

    for (idx, raw) in lines.iter().enumerate() {
        let line = idx as u32 + 1;
        let Some(marker) = classify_marker(raw) else {
            continue;
        };
        match marker.kind {
            MarkerKind::Begin(_) => {
                if let Some((open_keyword, open_line)) = &open {
                    return Err(BlockError::NestedBlock {
                        line,
                        keyword: marker.keyword.to_string(),
                        open_keyword: open_keyword.clone(),
                        open_line: *open_line,
                    });
                }
                open = Some((marker.keyword.to_string(), line));
            }
            MarkerKind::End => match open.take() {
                None => {
                    return Err(BlockError::StrayEnd {
                        line,
                        keyword: marker.keyword.to_string(),
                    });
                }
                Some((open_keyword, _)) if open_keyword != marker.keyword => {
                    return Err(BlockError::MismatchedEnd {
                        line,
                        expected: open_keyword,
                        found: marker.keyword.to_string(),
                    });
                }
                Some(_) => {}
            },
        }
    }

    if let Some((keyword, line)) = open {
        return Err(BlockError::UnterminatedBlock { line, keyword });
    }
    Ok(())
}

/// Recognize a marker line; anything else is body or outside text.
fn classify_marker(line: &str) -> Option<Marker<'_>> {
    let rest = line.trim_start().strip_prefix(SENTINEL)?;
    let run_end = rest
        .find(|c: char| !c.is_ascii_uppercase() && c != '_')
        .unwrap_or(rest.len());
    let run = &rest[..run_end];
    let tail = &rest[run_end..];

    if let Some(keyword) = run.strip_suffix(BEGIN_SUFFIX) {
        if keyword.is_empty() {
            return None;
        }
        let identifier = tail.trim();
        return Some(Marker {
            keyword,
            kind: MarkerKind::Begin((!identifier.is_empty()).then_some(identifier)),
        });
    }
    if let Some(keyword) = run.strip_suffix(END_SUFFIX) {
        if keyword.is_empty() {
            return None;
        }
        // Trailing text after an end marker is tolerated and ignored.
        return Some(Marker {
            keyword,
            kind: MarkerKind::End,
        });
    }
    None
}

/// Join body lines back exactly as they appeared, final newline included.
fn body_text(lines: &[&str]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut body = lines.join("\n");
    body.push('\n');
    body
}
