// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Planter.
//!
//! This module contains pure planning vocabulary with ZERO I/O. Everything
//! the filesystem is asked happens through ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No external crates**: Only std library + thiserror + serde derives
//! - **Immutable values**: Plans and nodes are Clone + PartialEq data
//! - **Closed sets**: `PathState` and the keyword registry are exhaustive

pub mod analysis;
pub mod block;
pub mod error;
pub mod node;
pub mod plan;

// Re-exports for convenience
pub use analysis::{AnalysisOptions, name_similarity};
pub use block::{CapturePolicy, ContentBlock, KEYWORD_REGISTRY, KeywordDef, policy_for};
pub use error::{BlockError, ErrorCategory, StructuralError};
pub use node::{IndentUnit, NodeKind, ParsedTree, PlannedNode, RootDeclaration};
pub use plan::{PathState, Plan, PlanSummary, PlanWarning};
