//! Content blocks and the keyword capture registry.
//!
//! Block text carries zero or more delimited blocks:
//!
//! ```text
//! @@@FILE_BEGIN {{Root}}/Module/File.h
//! #pragma once
//! @@@FILE_END
//!
//! @@@COMMENT_BEGIN
//! Anything here is discarded.
//! @@@COMMENT_END
//! ```
//!
//! What each keyword means is not branching logic spread across the parser;
//! it is one entry in [`KEYWORD_REGISTRY`]. Adding a keyword means adding
//! one entry here. Keywords absent from the registry still parse
//! structurally, their bodies are simply dropped.

use serde::Serialize;

/// What to do with the body of a recognized block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapturePolicy {
    /// The body is content destined for a planned file.
    Capture,
    /// The body is deliberately thrown away.
    Discard,
}

/// One keyword the block format recognizes.
#[derive(Debug, Clone, Copy)]
pub struct KeywordDef {
    pub keyword: &'static str,
    pub policy: CapturePolicy,
}

/// Single source of truth for block keywords.
pub static KEYWORD_REGISTRY: &[KeywordDef] = &[
    KeywordDef {
        keyword: "FILE",
        policy: CapturePolicy::Capture,
    },
    KeywordDef {
        keyword: "COMMENT",
        policy: CapturePolicy::Discard,
    },
];

/// Look up the capture policy for a keyword, `None` when unrecognized.
pub fn policy_for(keyword: &str) -> Option<CapturePolicy> {
    KEYWORD_REGISTRY
        .iter()
        .find(|def| def.keyword == keyword)
        .map(|def| def.policy)
}

/// One delimited block as parsed from block text.
///
/// `body` is the raw text between the marker lines, byte-for-byte: no
/// trimming, no normalization, no interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub keyword: String,
    /// Free text following the begin marker, usually a target path.
    pub identifier: Option<String>,
    pub body: String,
    /// Line of the begin marker (1-based).
    pub line: u32,
}
