//! Listing parameters.
//!
//! Query strings come straight from the client. Nothing here fails: invalid
//! values fall back to safe defaults so a listing is always bounded.

use crate::{
    Expense,
    store::{SearchPattern, SortColumn, SortOrder, StoreQuery, StoreRange},
};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// A normalized, bounded listing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<SearchPattern>,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
    /// 1-based.
    pub page: u64,
    /// Within `1..=MAX_PAGE_SIZE`.
    pub page_size: u64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: SortColumn::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

impl ListQuery {
    /// Build a query from raw, untrusted parameters.
    pub fn from_params(
        search: Option<&str>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> Self {
        let page = parse_int(page).map_or(1, |p| p.max(1) as u64);
        let page_size = parse_int(page_size).map_or(DEFAULT_PAGE_SIZE, |s| {
            s.clamp(1, MAX_PAGE_SIZE as i64) as u64
        });

        Self {
            search: search.and_then(SearchPattern::contains),
            sort_by: sort_by
                .and_then(|s| SortColumn::parse(s.trim()))
                .unwrap_or_default(),
            sort_order: sort_order
                .and_then(|s| SortOrder::parse(s.trim()))
                .unwrap_or_default(),
            page,
            page_size,
        }
    }

    /// Offset of the first row of the page, capped to what SQL can bind.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }

    pub(crate) fn to_store_query(&self) -> StoreQuery {
        StoreQuery {
            search: self.search.clone(),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            range: Some(StoreRange {
                offset: self.offset(),
                limit: self.page_size,
            }),
        }
    }
}

/// One page of expenses plus the size of the whole filtered set.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpensePage {
    pub items: Vec<Expense>,
    pub total: u64,
}

/// Total of the filtered set.
///
/// When the store did not report an exact count this is a lower bound: `0`
/// for an empty first page, otherwise at least every row up to the end of
/// this page (`page * page_size` once the page is full).
pub fn estimate_total(exact: Option<u64>, query: &ListQuery, returned: u64) -> u64 {
    if let Some(total) = exact {
        return total;
    }
    if returned == 0 && query.page == 1 {
        return 0;
    }
    let seen = query.offset().saturating_add(returned);
    if returned >= query.page_size {
        seen.max(query.page.saturating_mul(query.page_size))
    } else {
        seen
    }
}
