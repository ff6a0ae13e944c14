//! Pagination descriptors and page envelopes.
//!
//! [`PageRequest`] is the normalized form of the raw `page`, `size`,
//! `sort_by` and `sort_dir` request parameters. The sort field is kept as
//! text; the repository decides which fields it can order by.

use serde::Serialize;

/// Number of rows per page when the request does not specify one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

/// Ordering direction for a sorted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` in any letter case is ascending; everything else is descending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Requested ordering: an uninterpreted field name plus a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Zero-based page descriptor handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: usize,
    pub sort: Sort,
}

impl PageRequest {
    /// Resolve a one-based page number into a zero-based descriptor.
    ///
    /// Page numbers and sizes below 1 are clamped to 1.
    pub fn new(
        page_number: usize,
        page_size: usize,
        sort_field: impl Into<String>,
        sort_direction: SortDirection,
    ) -> Self {
        Self {
            page_index: page_number.max(1) - 1,
            page_size: page_size.max(1),
            sort: Sort {
                field: sort_field.into(),
                direction: sort_direction,
            },
        }
    }

    /// One-based page number.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

/// A page of results together with the totals of the filtered set.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: usize) -> Self {
        Self {
            items,
            page: request.page_number(),
            per_page: request.page_size,
            total_items,
            total_pages: total_items.div_ceil(request.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_one_based_page_to_zero_based_index() {
        let request = PageRequest::new(3, 5, "name", SortDirection::Asc);
        assert_eq!(request.page_index, 2);
        assert_eq!(request.page_size, 5);
        assert_eq!(request.offset(), 10);
        assert_eq!(request.sort.field, "name");
    }

    #[test]
    fn clamps_page_and_size_to_one() {
        let request = PageRequest::new(0, 0, "id", SortDirection::Desc);
        assert_eq!(request.page_index, 0);
        assert_eq!(request.page_size, 1);
        assert_eq!(request.page_number(), 1);
    }

    #[test]
    fn passes_unknown_sort_fields_through() {
        let request = PageRequest::new(1, 5, "no_such_field", SortDirection::Asc);
        assert_eq!(request.sort.field, "no_such_field");
    }

    #[test]
    fn parses_sort_direction_case_insensitively() {
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Desc);
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::new(1, 5, "id", SortDirection::Asc);
        assert_eq!(Paginated::new(vec![1, 2, 3, 4, 5], &request, 11).total_pages, 3);
        assert_eq!(Paginated::new(Vec::<i32>::new(), &request, 0).total_pages, 0);
        assert_eq!(Paginated::new(vec![1], &request, 10).total_pages, 2);
    }
}
