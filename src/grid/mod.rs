//! Grid query engine
//!
//! Turns the filter / sort / page descriptor sent by data-table components
//! into typed predicates, runs a paginated fetch plus a total count, and
//! returns rows in a stable order.
//!
//! Components, leaves first:
//! - `columns`: client column id → storage path, one relation hop at most
//! - `parser` and `filters`: raw filter entries → typed conditions → `Expr`
//! - `sort`: sort model → total ordering ending in the primary key
//! - `executor`: direct or two-phase page fetch, plus count
//! - `assembler`: `{rows, totalCount}`
//!
//! The engine never touches SQL. A storage adapter implements `GridStore`
//! and renders `PageQuery` for its backend.

pub mod assembler;
pub mod columns;
pub mod errors;
pub mod executor;
pub mod filters;
pub mod parser;
pub mod predicate;
pub mod request;
pub mod schema;
pub mod sort;

pub use assembler::{reorder_by_keys, QueryPage};
pub use columns::{ColumnCatalog, ColumnMapping, ColumnRef, JoinSpec, ResolvedColumn, ROOT_ALIAS};
pub use errors::{GridError, GridErrorCode, GridResult};
pub use executor::{Criteria, FetchStrategy, GridDescriptor, GridExecutor, GridStore, PageQuery};
pub use filters::{FilterCondition, FilterKind};
pub use parser::{FilterSpec, LogicalOperator};
pub use predicate::{Bound, CompareOp, Expr, Literal, Operand, Pattern};
pub use request::{GridQuery, SortModelEntry};
pub use schema::{AttributeKind, EntitySchema};
pub use sort::{DefaultOrder, OrderClause, SortDirection};
