//! Filter expression compiler
//!
//! Turns an ordered list of filter clauses, each joined to its predecessor by an
//! AND/OR connector, into a boolean tree and from there into a search query
//! document and a preview string.
//!
//! # Grouping
//!
//! ```text
//! a AND b AND c            same connector: one flat node
//! a AND b OR c             connector change: (a AND b) OR c
//! a AND b OR c AND d       ((a AND b) OR c) AND d
//! ```
//!
//! Clauses are folded strictly left to right. Explicit groups (see
//! [`overlay`]) are built as atomic subtrees first and then stitched in with the
//! same fold.
//!
//! # Operators
//!
//! - `is` / `is_not` - exact value (`term`) or analyzed text (`match`)
//! - `is_one_of` / `is_not_one_of` - any of a list of values (`terms`)
//! - `exists` / `does_not_exist` - field presence
//! - `range` - lower and/or upper bound
//! - `prefix`, `wildcard`, `query_string` - pattern matches

pub mod ast;
pub mod clause;
pub mod error;
pub mod overlay;
pub mod preview;
pub mod query;

pub use ast::{Node, build_implicit};
pub use clause::{
    Clause, ClauseNormalizer, ExplicitGroup, FilterValue, LogicOp, NormalizedClause, OperatorKind,
    RangeBound, RangeOp, RangeValue, ScalarValue, normalize,
};
pub use error::{FilterError, InvalidGroupError, ValidationError};
pub use overlay::build_with_groups;
pub use preview::{PreviewRenderer, render, render_preview};
pub use query::{
    Compilation, QueryCompiler, compile, compile_with_diagnostics, match_all, to_query_document,
};
