#![forbid(unsafe_code)]
//! greenlight-status library.
//!
//! Pure functions folding an ad group's denormalized child assets into
//! derived workflow state: per-group status tallies, the persisted
//! lifecycle status, and the kanban display column. Nothing here performs
//! I/O; callers feed these functions from their live subscriptions and own
//! persisting the results.

pub mod aggregate;
pub mod group;
pub mod kanban;

pub use aggregate::{aggregate, aggregate_with_recipes, GroupRollup, StatusCounts};
pub use group::resolve_group_status;
pub use kanban::{resolve_kanban_column, KanbanColumn};
