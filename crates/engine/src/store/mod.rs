//! Record store gateway.
//!
//! The engine never talks to a database directly: every read and write goes
//! through an [`ExpenseStore`]. Two backends ship with the crate, [`SqlStore`]
//! (sea-orm) and [`RestStore`] (PostgREST/Supabase over HTTP).

use async_trait::async_trait;

use crate::{ExpensePayload, ExpenseRow, ResultEngine};

pub use rest::RestStore;
pub use sql::SqlStore;

mod rest;
mod sql;

/// Name of the table holding expenses, for every backend.
pub const TABLE: &str = "expenses";

/// Columns a listing may be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Amount,
    Category,
    #[default]
    ExpenseDate,
    Description,
}

impl SortColumn {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::ExpenseDate => "expense_date",
            Self::Description => "description",
        }
    }

    /// Exact column name lookup.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "amount" => Some(Self::Amount),
            "category" => Some(Self::Category),
            "expense_date" => Some(Self::ExpenseDate),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// A case-insensitive substring search over title or description.
///
/// Holds the trimmed user term verbatim. Backends render it with their own
/// escaping so no character of the term acts as a wildcard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPattern(String);

impl SearchPattern {
    /// Substring match for `term`, or `None` when the term is blank.
    pub fn contains(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self(term.to_string()))
    }

    pub fn term(&self) -> &str {
        &self.0
    }

    /// `%term%` over case-folded text, metacharacters escaped with `\`.
    pub fn like_pattern(&self) -> String {
        format!("%{}%", escape_like(&fold_case(&self.0)))
    }

    /// Unanchored POSIX regex matching the term literally.
    pub fn regex_pattern(&self) -> String {
        regex::escape(&self.0)
    }
}

/// Escape the `LIKE` metacharacters `%` and `_` (and the escape itself).
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Unicode lowercase, applied to searchable columns and to search terms.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreRange {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreQuery {
    pub search: Option<SearchPattern>,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
    /// `None` selects every matching row.
    pub range: Option<StoreRange>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorePage {
    pub rows: Vec<ExpenseRow>,
    /// Exact size of the filtered set, when the backend can tell.
    pub total: Option<u64>,
}

/// Generic CRUD and query execution against the `expenses` table.
#[async_trait]
pub trait ExpenseStore: Send + Sync + std::fmt::Debug {
    async fn select(&self, query: &StoreQuery) -> ResultEngine<StorePage>;

    async fn find(&self, id: &str) -> ResultEngine<Option<ExpenseRow>>;

    async fn insert(&self, payload: ExpensePayload) -> ResultEngine<ExpenseRow>;

    /// Returns `None` when no row has the given id.
    async fn update(&self, id: &str, payload: ExpensePayload)
    -> ResultEngine<Option<ExpenseRow>>;

    /// Returns the number of deleted rows.
    async fn delete(&self, id: &str) -> ResultEngine<u64>;
}
