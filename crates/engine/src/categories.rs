//! Fixed expense categories.

use serde::{Deserialize, Serialize};

/// Category of an expense.
///
/// The set is closed: any unknown input is coerced to [`Category::Other`]
/// instead of being rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Rent,
    Food,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Shopping,
    Education,
    Insurance,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Rent,
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Shopping,
        Category::Education,
        Category::Insurance,
        Category::Other,
    ];

    /// Canonical upper-case code, as stored and transmitted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Rent => "RENT",
            Category::Food => "FOOD",
            Category::Transport => "TRANSPORT",
            Category::Utilities => "UTILITIES",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Health => "HEALTH",
            Category::Shopping => "SHOPPING",
            Category::Education => "EDUCATION",
            Category::Insurance => "INSURANCE",
            Category::Other => "OTHER",
        }
    }

    /// Case-insensitive lookup; unknown values become `OTHER`.
    #[must_use]
    pub fn coerce(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }

    /// Rent, food and utilities count as essential spending.
    #[must_use]
    pub const fn is_essential(self) -> bool {
        matches!(self, Category::Rent | Category::Food | Category::Utilities)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
