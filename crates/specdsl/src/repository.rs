//! Specification execution over in-memory records.
//!
//! [`SpecificationExecutor`] runs a [`Specification`] against a set of
//! records: filter, then sort, then window. It is implemented for plain
//! slices and for [`Repository`], an owning store with configuration.
//!
//! ```
//! use specdsl::{paged, Entity, Repository, SpecificationExecutor};
//!
//! #[derive(Entity)]
//! struct Actor {
//!     first_name: String,
//!     birth_year: Option<u16>,
//! }
//!
//! let mut actors = Repository::new();
//! actors.save(Actor { first_name: "Tom".into(), birth_year: Some(1956) });
//! actors.save(Actor { first_name: "Sean".into(), birth_year: Some(1930) });
//! actors.save(Actor { first_name: "Betty".into(), birth_year: None });
//!
//! let spec = Actor::BIRTH_YEAR.is_not_null();
//! let page = actors.find_page(&spec, paged(0, 1)?.sorted_by(Actor::BIRTH_YEAR.asc()))?;
//!
//! assert_eq!(page.total_elements(), 2);
//! assert_eq!(page.content()[0].first_name, "Sean");
//! assert!(page.has_next());
//! # Ok::<(), specdsl::SpecError>(())
//! ```

use tracing::{debug, trace};

use crate::config::RepositoryConfig;
use crate::error::{Result, SpecError};
use crate::eval::Matcher;
use crate::field::Entity;
use crate::ordering::compare_by_sort;
use crate::page::{Page, Pageable};
use crate::sort::Sort;
use crate::specification::Specification;

/// Runs specifications against a set of records.
///
/// Only [`records`](Self::records) is required; every query method is
/// provided.
pub trait SpecificationExecutor<T: Entity + 'static> {
    /// The records queries run against, in insertion order.
    fn records(&self) -> &[T];

    /// Execution settings.
    fn config(&self) -> RepositoryConfig {
        RepositoryConfig::default()
    }

    /// All records matching `spec`, in insertion order.
    fn find_all(&self, spec: &Specification<T>) -> Result<Vec<&T>> {
        execute(self.records(), spec, &Sort::unsorted(), self.config())
    }

    /// All records matching `spec`, sorted. Ties keep insertion order.
    fn find_all_sorted(&self, spec: &Specification<T>, sort: &Sort) -> Result<Vec<&T>> {
        execute(self.records(), spec, sort, self.config())
    }

    /// One page of the records matching `spec`.
    ///
    /// The page size is capped at the configured maximum.
    fn find_page(
        &self,
        spec: &Specification<T>,
        pageable: impl Into<Pageable>,
    ) -> Result<Page<&T>> {
        let config = self.config();
        let pageable = match pageable.into() {
            Pageable::Paged(request) if request.page_size() > config.max_page_size => {
                debug!(
                    requested = request.page_size(),
                    max = config.max_page_size,
                    "clamping page size"
                );
                Pageable::Paged(request.clamped(config.max_page_size))
            }
            other => other,
        };

        let matched = execute(self.records(), spec, pageable.sort(), config)?;
        let total = matched.len();
        let content = match pageable.page_request() {
            Some(request) => matched
                .into_iter()
                .skip(request.offset())
                .take(request.page_size())
                .collect(),
            None => matched,
        };
        trace!(total, returned = content.len(), "page assembled");
        Ok(Page::new(content, pageable, total))
    }

    /// The single record matching `spec`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::IncorrectResultSize`] if more than one record
    /// matches.
    fn find_one(&self, spec: &Specification<T>) -> Result<Option<&T>> {
        let mut matched = self.find_all(spec)?;
        match matched.len() {
            0 | 1 => Ok(matched.pop()),
            actual => Err(SpecError::IncorrectResultSize { actual }),
        }
    }

    /// Number of records matching `spec`.
    fn count(&self, spec: &Specification<T>) -> Result<usize> {
        let matcher = compile(spec)?;
        let mut count = 0;
        for record in self.records() {
            if matcher.matches(record)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Returns `true` if any record matches `spec`.
    fn exists(&self, spec: &Specification<T>) -> Result<bool> {
        let matcher = compile(spec)?;
        for record in self.records() {
            if matcher.matches(record)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn compile<T: 'static>(spec: &Specification<T>) -> Result<Matcher> {
    match spec.predicate() {
        Some(predicate) => {
            debug!(%predicate, "compiling specification");
            Matcher::compile(&predicate)
        }
        None => {
            debug!("unrestricted specification");
            Ok(Matcher::accept_all())
        }
    }
}

fn execute<'a, T: Entity + 'static>(
    records: &'a [T],
    spec: &Specification<T>,
    sort: &Sort,
    config: RepositoryConfig,
) -> Result<Vec<&'a T>> {
    let matcher = compile(spec)?;
    let mut results = Vec::new();
    for record in records {
        if matcher.matches(record)? {
            results.push(record);
        }
    }

    if sort.is_sorted() {
        // sort_by is stable, so equal keys keep insertion order.
        results.sort_by(|a, b| compare_by_sort(*a, *b, sort, config.native_nulls));
    }
    debug!(scanned = records.len(), matched = results.len(), %sort, "specification executed");
    Ok(results)
}

impl<T: Entity + 'static> SpecificationExecutor<T> for [T] {
    fn records(&self) -> &[T] {
        self
    }
}

impl<T: Entity + 'static> SpecificationExecutor<T> for Vec<T> {
    fn records(&self) -> &[T] {
        self
    }
}

/// An owning, in-memory record store.
#[derive(Debug, Clone)]
pub struct Repository<T> {
    records: Vec<T>,
    config: RepositoryConfig,
}

impl<T> Repository<T> {
    /// Creates an empty repository with default settings.
    pub fn new() -> Self {
        Repository::with_config(RepositoryConfig::default())
    }

    /// Creates an empty repository with the given settings.
    pub fn with_config(config: RepositoryConfig) -> Self {
        Repository {
            records: Vec::new(),
            config,
        }
    }

    /// Stores a record, returning a reference to the stored copy.
    pub fn save(&mut self, record: T) -> &T {
        let index = self.records.len();
        self.records.push(record);
        &self.records[index]
    }

    /// Stores every record.
    pub fn save_all(&mut self, records: impl IntoIterator<Item = T>) {
        self.records.extend(records);
    }

    /// Removes every record.
    pub fn delete_all(&mut self) {
        self.records.clear();
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over stored records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// The repository settings.
    pub fn settings(&self) -> &RepositoryConfig {
        &self.config
    }
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Repository::new()
    }
}

impl<T> FromIterator<T> for Repository<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut repository = Repository::new();
        repository.save_all(iter);
        repository
    }
}

impl<T> From<Vec<T>> for Repository<T> {
    fn from(records: Vec<T>) -> Self {
        Repository {
            records,
            config: RepositoryConfig::default(),
        }
    }
}

impl<T: Entity + 'static> SpecificationExecutor<T> for Repository<T> {
    fn records(&self) -> &[T] {
        &self.records
    }

    fn config(&self) -> RepositoryConfig {
        self.config
    }
}
