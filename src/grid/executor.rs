//! Paginated query executor
//!
//! Execution flow:
//! 1. Compute page size and offset
//! 2. Compile predicates and ordering once (`GridDescriptor::plan`)
//! 3. Fetch the page, directly or in two phases (ordered ids, then
//!    hydration by id membership and a reorder to id order)
//! 4. Count with the same predicates, as a separate statement
//! 5. Assemble the `QueryPage`
//!
//! The page and the count are not taken from one snapshot; a concurrent
//! write can make them disagree.

use std::hash::Hash;

use super::assembler::{reorder_by_keys, QueryPage};
use super::columns::{ColumnCatalog, JoinSpec};
use super::errors::GridResult;
use super::parser::compile_filter_model;
use super::predicate::Expr;
use super::request::GridQuery;
use super::sort::{compile_order, DefaultOrder, OrderClause};
use crate::observability::{log_event_with_fields, Event, Timer};

/// How a page is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// One query returning hydrated rows
    Direct,
    /// Ordered id query, then hydration by id membership
    TwoPhase,
}

impl FetchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStrategy::Direct => "direct",
            FetchStrategy::TwoPhase => "two_phase",
        }
    }
}

/// Joins plus the conjunction of predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub joins: Vec<JoinSpec>,
    pub predicates: Vec<Expr>,
}

/// A fully compiled page query
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub criteria: Criteria,
    pub order: Vec<OrderClause>,
    pub offset: u64,
    pub limit: u64,
}

/// Everything the engine knows about one entity's grid
#[derive(Debug)]
pub struct GridDescriptor {
    entity: &'static str,
    catalog: ColumnCatalog,
    default_order: DefaultOrder,
    strategy: FetchStrategy,
}

impl GridDescriptor {
    pub fn new(catalog: ColumnCatalog, default_order: DefaultOrder, strategy: FetchStrategy) -> Self {
        Self {
            entity: catalog.schema().name(),
            catalog,
            default_order,
            strategy,
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Compile a grid request. Never fails; unusable filters are dropped.
    pub fn plan(&self, query: &GridQuery) -> PageQuery {
        let mut resolver = self.catalog.resolver();

        let filters = compile_filter_model(query.filter_model.as_ref(), &mut resolver);
        for column in &filters.skipped {
            log_event_with_fields(
                Event::GridFilterSkipped,
                &[("entity", self.entity), ("column", column.as_str())],
            );
        }

        let order = compile_order(query.sort_entries(), &self.default_order, &mut resolver);

        PageQuery {
            criteria: Criteria {
                joins: resolver.into_joins(),
                predicates: filters.predicates,
            },
            order,
            offset: query.offset(),
            limit: query.page_size(),
        }
    }
}

/// Backend seam for grid execution
pub trait GridStore {
    type Row;
    type Key: Copy + Eq + Hash;

    /// Primary identifier of a hydrated row
    fn row_key(row: &Self::Row) -> Self::Key;

    /// One query returning ordered, hydrated rows
    fn fetch_page(&self, query: &PageQuery) -> GridResult<Vec<Self::Row>>;

    /// Ordered primary identifiers of the page
    fn fetch_keys(&self, query: &PageQuery) -> GridResult<Vec<Self::Key>>;

    /// Hydrate rows by id membership, in any order
    fn fetch_by_keys(&self, keys: &[Self::Key]) -> GridResult<Vec<Self::Row>>;

    /// Number of rows matching the criteria
    fn count(&self, criteria: &Criteria) -> GridResult<u64>;
}

/// Runs grid requests for one entity against one store
pub struct GridExecutor<'a, S: GridStore> {
    descriptor: &'a GridDescriptor,
    store: &'a S,
}

impl<'a, S: GridStore> GridExecutor<'a, S> {
    pub fn new(descriptor: &'a GridDescriptor, store: &'a S) -> Self {
        Self { descriptor, store }
    }

    pub fn execute(&self, query: &GridQuery) -> GridResult<QueryPage<S::Row>> {
        let timer = Timer::new();
        let plan = self.descriptor.plan(query);

        let rows = match self.descriptor.strategy {
            FetchStrategy::Direct => self.store.fetch_page(&plan)?,
            FetchStrategy::TwoPhase => {
                let keys = self.store.fetch_keys(&plan)?;
                if keys.is_empty() {
                    Vec::new()
                } else {
                    let hydrated = self.store.fetch_by_keys(&keys)?;
                    reorder_by_keys(&keys, hydrated, S::row_key)
                }
            }
        };

        let total = self.store.count(&plan.criteria)?;

        let returned = rows.len().to_string();
        let total_str = total.to_string();
        let offset = plan.offset.to_string();
        let duration = timer.elapsed_ms();
        log_event_with_fields(
            Event::GridQueryComplete,
            &[
                ("entity", self.descriptor.entity),
                ("strategy", self.descriptor.strategy.as_str()),
                ("rows", returned.as_str()),
                ("total", total_str.as_str()),
                ("offset", offset.as_str()),
                ("duration_ms", duration.as_str()),
            ],
        );

        Ok(QueryPage::new(rows, total))
    }
}
