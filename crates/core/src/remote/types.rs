//! Types shared by the remote clients.

use serde::{Deserialize, Serialize};

/// Remote category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Popular,
    TopRated,
}

impl Category {
    /// Path segment used by the discovery API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
        }
    }

    /// Both categories in the order the catalog sync fetches them.
    pub fn all() -> [Category; 2] {
        [Category::Popular, Category::TopRated]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
