//! Page DSL.
//!
//! A [`PageRequest`] selects one window of a sorted result: page index
//! `page` of `size` records, starting at record `page * size`. Paging and
//! sorting commute:
//!
//! ```
//! use specdsl::{paged, Entity, Sort};
//!
//! #[derive(Entity)]
//! struct Actor {
//!     first_name: String,
//! }
//!
//! let sort = Sort::from(Actor::FIRST_NAME.desc());
//! assert_eq!(
//!     paged(0, 2)?.sorted_by(sort.clone()),
//!     sort.paged(0, 2)?
//! );
//! # Ok::<(), specdsl::SpecError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecError};
use crate::sort::Sort;

/// A request for one page of a sorted result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PageRequestRepr")]
pub struct PageRequest {
    page: usize,
    size: usize,
    sort: Sort,
}

#[derive(Deserialize)]
struct PageRequestRepr {
    #[serde(default)]
    page: usize,
    size: usize,
    #[serde(default)]
    sort: Sort,
}

impl TryFrom<PageRequestRepr> for PageRequest {
    type Error = SpecError;

    fn try_from(repr: PageRequestRepr) -> Result<Self> {
        PageRequest::of_sorted(repr.page, repr.size, repr.sort)
    }
}

impl PageRequest {
    /// Creates an unsorted request for page `page` of `size` records.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidPageSize`] if `size` is zero.
    pub fn of(page: usize, size: usize) -> Result<Self> {
        PageRequest::of_sorted(page, size, Sort::unsorted())
    }

    /// Creates a sorted request for page `page` of `size` records.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidPageSize`] if `size` is zero.
    pub fn of_sorted(page: usize, size: usize, sort: Sort) -> Result<Self> {
        if size == 0 {
            return Err(SpecError::InvalidPageSize { size });
        }
        Ok(PageRequest { page, size, sort })
    }

    /// Zero-based page index.
    pub fn page_number(&self) -> usize {
        self.page
    }

    /// Records per page.
    pub fn page_size(&self) -> usize {
        self.size
    }

    /// The sort applied before windowing.
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Index of the first record of this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Returns `true` if this is not the first page.
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// The following page.
    pub fn next(&self) -> Self {
        self.with_page(self.page.saturating_add(1))
    }

    /// The preceding page, or this one if it is the first.
    pub fn previous_or_first(&self) -> Self {
        self.with_page(self.page.saturating_sub(1))
    }

    /// The first page.
    pub fn first(&self) -> Self {
        self.with_page(0)
    }

    /// The same request for another page index.
    pub fn with_page(&self, page: usize) -> Self {
        PageRequest {
            page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    /// The same window with `sort` replacing the current sort.
    pub fn with_sort(self, sort: impl Into<Sort>) -> Self {
        PageRequest {
            sort: sort.into(),
            ..self
        }
    }

    /// The same window with `sort` appended after the current sort.
    pub fn sorted_by(self, sort: impl Into<Sort>) -> Self {
        PageRequest {
            sort: self.sort.and(sort),
            page: self.page,
            size: self.size,
        }
    }

    /// The same window with the size capped at `max_size`.
    pub(crate) fn clamped(&self, max_size: usize) -> Self {
        PageRequest {
            page: self.page,
            size: self.size.min(max_size.max(1)),
            sort: self.sort.clone(),
        }
    }
}

impl Sort {
    /// A request for page `page` of `size` records in this order.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidPageSize`] if `size` is zero.
    pub fn paged(self, page: usize, size: usize) -> Result<PageRequest> {
        PageRequest::of_sorted(page, size, self)
    }

    /// A request for the first `size` records in this order.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidPageSize`] if `size` is zero.
    pub fn limit(self, size: usize) -> Result<PageRequest> {
        self.paged(0, size)
    }
}

/// Paging information for a query: either one window, or everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pageable {
    /// One window of the result.
    Paged(PageRequest),
    /// The whole result, in this order.
    Unpaged(Sort),
}

impl Pageable {
    /// Returns `true` for a windowed request.
    pub fn is_paged(&self) -> bool {
        matches!(self, Pageable::Paged(_))
    }

    /// The sort applied before windowing.
    pub fn sort(&self) -> &Sort {
        match self {
            Pageable::Paged(request) => request.sort(),
            Pageable::Unpaged(sort) => sort,
        }
    }

    /// The page request, if windowed.
    pub fn page_request(&self) -> Option<&PageRequest> {
        match self {
            Pageable::Paged(request) => Some(request),
            Pageable::Unpaged(_) => None,
        }
    }
}

impl Default for Pageable {
    fn default() -> Self {
        Pageable::Unpaged(Sort::unsorted())
    }
}

impl From<PageRequest> for Pageable {
    fn from(request: PageRequest) -> Self {
        Pageable::Paged(request)
    }
}

impl From<Sort> for Pageable {
    fn from(sort: Sort) -> Self {
        Pageable::Unpaged(sort)
    }
}

/// A request for page `page` of `size` records.
///
/// # Errors
///
/// Returns [`SpecError::InvalidPageSize`] if `size` is zero.
pub fn paged(page: usize, size: usize) -> Result<PageRequest> {
    PageRequest::of(page, size)
}

/// A request for the first `size` records.
///
/// # Errors
///
/// Returns [`SpecError::InvalidPageSize`] if `size` is zero.
pub fn limit(size: usize) -> Result<PageRequest> {
    PageRequest::of(0, size)
}

/// A request for the whole, unsorted result.
pub fn unpaged() -> Pageable {
    Pageable::default()
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    content: Vec<T>,
    pageable: Pageable,
    total: usize,
}

impl<T> Page<T> {
    /// Creates a page from its content, the request that produced it and
    /// the number of records matching across all pages.
    pub fn new(content: Vec<T>, pageable: Pageable, total: usize) -> Self {
        Page {
            content,
            pageable,
            total,
        }
    }

    /// The records on this page.
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consumes the page, returning its records.
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// The request that produced this page.
    pub fn pageable(&self) -> &Pageable {
        &self.pageable
    }

    /// Number of records matching across all pages.
    pub fn total_elements(&self) -> usize {
        self.total
    }

    /// Number of records on this page.
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Zero-based index of this page; `0` when unpaged.
    pub fn number(&self) -> usize {
        self.pageable.page_request().map_or(0, PageRequest::page_number)
    }

    /// Requested page size; the content length when unpaged.
    pub fn size(&self) -> usize {
        self.pageable
            .page_request()
            .map_or(self.content.len(), PageRequest::page_size)
    }

    /// Number of pages needed for all matching records.
    pub fn total_pages(&self) -> usize {
        match self.pageable.page_request() {
            Some(request) => self.total.div_ceil(request.page_size()),
            None => 1,
        }
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.number() + 1 < self.total_pages()
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.number() > 0
    }

    /// Returns `true` for the first page.
    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    /// Returns `true` for the last page.
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Converts the records, keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            total: self.total,
        }
    }

    /// Iterates over the records on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Order;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            paged(0, 0),
            Err(SpecError::InvalidPageSize { size: 0 })
        ));
        assert!(limit(0).is_err());
        assert!(Sort::unsorted().limit(0).is_err());
    }

    #[test]
    fn offset_is_page_times_size() {
        let request = paged(3, 25).unwrap();
        assert_eq!(request.offset(), 75);
        assert_eq!(request.next().offset(), 100);
        assert_eq!(request.previous_or_first().page_number(), 2);
        assert_eq!(request.first().page_number(), 0);
        assert_eq!(limit(5).unwrap().offset(), 0);
        assert!(!limit(5).unwrap().has_previous());
        assert_eq!(limit(5).unwrap().previous_or_first(), limit(5).unwrap());
    }

    #[test]
    fn paging_and_sorting_commute() {
        let sort = Sort::from(Order::asc("birth_year")).and(Order::desc("first_name"));
        assert_eq!(
            paged(2, 10).unwrap().sorted_by(sort.clone()),
            sort.clone().paged(2, 10).unwrap()
        );
        assert_eq!(
            limit(2).unwrap().sorted_by(sort.clone()),
            sort.limit(2).unwrap()
        );
    }

    #[test]
    fn sorted_by_appends_and_with_sort_replaces() {
        let request = limit(2).unwrap().sorted_by(Order::asc("a"));

        let appended = request.clone().sorted_by(Order::asc("b"));
        assert_eq!(appended.sort().to_string(), "a asc, b asc");

        let replaced = request.with_sort(Order::asc("b"));
        assert_eq!(replaced.sort().to_string(), "b asc");
    }

    #[test]
    fn page_metadata() {
        let page = Page::new(vec![1, 2], paged(1, 2).unwrap().into(), 5);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), 2);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert!(!page.is_first());
        assert!(!page.is_last());

        let page = page.map(|n| n * 10);
        assert_eq!(page.content(), &[10, 20]);

        let all = Page::new(vec!['a', 'b', 'c'], unpaged(), 3);
        assert_eq!(all.total_pages(), 1);
        assert_eq!(all.size(), 3);
        assert!(all.is_first() && all.is_last());
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Page<u8> = Page::new(Vec::new(), limit(10).unwrap().into(), 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_empty());
        assert!(page.is_last());
    }

    #[test]
    fn deserializing_validates_size() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page":1,"size":20,"sort":[{"property":"a"}]}"#).unwrap();
        assert_eq!(request, Sort::by([Order::asc("a")]).paged(1, 20).unwrap());

        let err = serde_json::from_str::<PageRequest>(r#"{"size":0}"#).unwrap_err();
        assert!(err.to_string().contains("page size"));

        let pageable: Pageable = serde_json::from_str(r#"{"unpaged":[]}"#).unwrap();
        assert_eq!(pageable, unpaged());
    }
}
