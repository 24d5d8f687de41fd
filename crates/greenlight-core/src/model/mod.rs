//! Document model for ad groups, assets, recipes, and review history.
//!
//! Struct fields use Rust names; serde renames map them onto the field
//! names the host application already persists (`parentAdId`,
//! `recipeCode`, `firebaseUrl`, ...). Enum values are strict to parse and
//! lenient to decode: [`crate::model::Asset::from_document`] folds unknown
//! statuses to `pending` with a warning, while `FromStr` rejects them so
//! nothing unknown is ever written back.

mod asset;
mod group;
mod history;
mod recipe;
mod user;

pub use asset::{recipe_code_from_filename, Asset, AssetStatus, UNKNOWN_RECIPE_CODE};
pub use group::{AdGroup, GroupStatus};
pub use history::HistoryEntry;
pub use recipe::Recipe;
pub use user::{CurrentUser, Role};

use std::fmt;

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
