//! Parsers for the two plain-text input formats.
//!
//! - [`tree`]: indentation-based structure text (`@ROOT` plus nested entries)
//! - [`blocks`]: delimited content text (`@@@FILE_BEGIN` .. `@@@FILE_END`)
//! - [`treegen`]: the inverse of [`tree`], rendering canonical structure text
//!
//! Both parsers are pure functions over `&str`. They never touch the
//! filesystem; reconciliation against disk happens in `crate::application`.

pub mod blocks;
pub mod tree;
pub mod treegen;

pub use blocks::parse_blocks;
pub use tree::parse_tree;
pub use treegen::generate_tree_text;

pub(crate) use blocks::text_before_first_marker;
