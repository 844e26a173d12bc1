//! Planter Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain, parser, and application layers for the
//! Planter scaffolding planner, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           planter-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Service             │
//! │            (Reconciler)                 │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Driven: FsInspector, FsWriter)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    planter-adapters (Infrastructure)    │
//! │  (LocalFilesystem, MemoryFilesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain + Parsers (Pure Logic)     │
//! │    (ParsedTree, ContentBlock, Plan)     │
//! │         No Filesystem Access            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use planter_core::application::Reconciler;
//! # let inspector: Box<dyn planter_core::application::FsInspector> = unimplemented!();
//!
//! // 1. Wire an adapter into the service
//! let reconciler = Reconciler::new(inspector);
//!
//! // 2. Plan from combined tree + block text
//! let text = "@ROOT {{Root}}\n{{Root}}/\n\tsrc/\n\t\tmain.rs\n";
//! let plan = reconciler.plan_from_text("./my-project".as_ref(), text).unwrap();
//!
//! for (path, state) in plan.states() {
//!     println!("{} {}", state.label(), path.display());
//! }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export parsers (pure functions over input text)
pub mod parser;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Reconciler,
        ports::{FsInspector, FsWriter},
    };
    pub use crate::domain::{
        AnalysisOptions, ContentBlock, NodeKind, ParsedTree, PathState, Plan, PlanSummary,
        PlanWarning, PlannedNode, RootDeclaration,
    };
    pub use crate::error::{PlanterError, PlanterResult};
    pub use crate::parser::{generate_tree_text, parse_blocks, parse_tree};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
