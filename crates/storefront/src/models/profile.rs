//! User profiles.

use serde::{Deserialize, Serialize};

use sweet_dreams_core::UserId;

/// A row from the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Profile {
    /// The display name, if one was provided and is not blank.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
