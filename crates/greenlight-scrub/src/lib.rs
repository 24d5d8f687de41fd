#![forbid(unsafe_code)]
//! greenlight-scrub library.
//!
//! The one write-side operation in the workspace: irreversibly collapse an
//! ad group's review history into a clean slate while keeping an immutable
//! audit snapshot under `scrubbedHistory/`. Reads happen up front, the
//! rewrite goes through a single all-or-nothing batch, and the follow-up
//! group-status write is the only acknowledged inconsistency window.

pub mod chain;
pub mod scrub;

pub use chain::{build_chains, Chain};
pub use scrub::{Confirmation, ScrubError, ScrubOutcome, ScrubPlan, Scrubber};
