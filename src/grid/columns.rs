//! Column resolution
//!
//! Maps client column ids onto storage paths. The catalog is built once at
//! startup and never mutated afterwards; the per-query `ColumnResolver` owns
//! the join list so every hop through the same relation shares one join.
//!
//! Resolution rules:
//! - blank or missing id resolves to the primary identifier
//! - mapped ids are rewritten through the `ColumnMapping`
//! - unmapped ids pass through verbatim; a path the schema does not know is
//!   left for the backend to reject at execution time
//! - `relation.field` paths are supported, deeper paths are not

use std::collections::HashMap;
use std::sync::Arc;

use super::schema::{AttributeKind, EntitySchema, Relation};

/// Qualifier of the root entity in rendered queries
pub const ROOT_ALIAS: &str = "t0";

/// Client column id → storage path rewrites
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    entries: HashMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rewrite
    pub fn map(mut self, column_id: impl Into<String>, storage_path: impl Into<String>) -> Self {
        self.entries.insert(column_id.into(), storage_path.into());
        self
    }

    /// Normalize a client column id into a storage path
    pub fn normalize<'a>(&'a self, column_id: Option<&'a str>, primary_key: &'a str) -> &'a str {
        match column_id.map(str::trim) {
            None | Some("") => primary_key,
            Some(id) => self.entries.get(id).map(String::as_str).unwrap_or(id),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A column reference qualified by the alias of its source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub qualifier: String,
    pub name: String,
}

impl ColumnRef {
    pub fn new(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }

    /// Column on the root entity
    pub fn root(name: impl Into<String>) -> Self {
        Self::new(ROOT_ALIAS, name)
    }

    pub fn is_root(&self) -> bool {
        self.qualifier == ROOT_ALIAS
    }
}

/// A column resolved for one query
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub column: ColumnRef,
    /// Declared kind, `None` when the path is unknown to the schema
    pub kind: Option<AttributeKind>,
}

/// A join introduced by a relation hop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub relation: String,
    pub alias: String,
    pub table: String,
    pub foreign_key: String,
    pub target_key: String,
}

/// Pre-resolved storage location of a known path
#[derive(Debug, Clone)]
enum StorageSlot {
    Root {
        column: &'static str,
        kind: AttributeKind,
    },
    Joined {
        relation: Relation,
        column: &'static str,
        kind: AttributeKind,
    },
}

/// Immutable per-entity column table
#[derive(Debug)]
pub struct ColumnCatalog {
    schema: Arc<EntitySchema>,
    mapping: ColumnMapping,
    slots: HashMap<String, StorageSlot>,
}

impl ColumnCatalog {
    /// Build the catalog, capturing every known path and its kind
    pub fn new(schema: Arc<EntitySchema>, mapping: ColumnMapping) -> Self {
        let mut slots = HashMap::new();

        for attribute in schema.attributes() {
            slots.insert(
                attribute.name.to_string(),
                StorageSlot::Root {
                    column: attribute.column,
                    kind: attribute.kind,
                },
            );
        }

        for relation in schema.relations() {
            for attribute in relation.target.attributes() {
                slots.insert(
                    format!("{}.{}", relation.name, attribute.name),
                    StorageSlot::Joined {
                        relation: relation.clone(),
                        column: attribute.column,
                        kind: attribute.kind,
                    },
                );
            }
        }

        Self {
            schema,
            mapping,
            slots,
        }
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Normalize a client column id into a storage path
    pub fn storage_path<'a>(&'a self, column_id: Option<&'a str>) -> &'a str {
        self.mapping.normalize(column_id, self.schema.primary_key())
    }

    /// Start resolving columns for a new query
    pub fn resolver(&self) -> ColumnResolver<'_> {
        ColumnResolver {
            catalog: self,
            joins: Vec::new(),
        }
    }
}

/// Per-query resolver that reuses joins
pub struct ColumnResolver<'a> {
    catalog: &'a ColumnCatalog,
    joins: Vec<JoinSpec>,
}

impl<'a> ColumnResolver<'a> {
    /// Resolve a client column id
    pub fn resolve(&mut self, column_id: Option<&str>) -> ResolvedColumn {
        let catalog = self.catalog;
        let path = catalog.storage_path(column_id);

        match catalog.slots.get(path) {
            Some(StorageSlot::Root { column, kind }) => ResolvedColumn {
                column: ColumnRef::root(*column),
                kind: Some(*kind),
            },
            Some(StorageSlot::Joined {
                relation,
                column,
                kind,
            }) => {
                let alias = self.join(relation);
                ResolvedColumn {
                    column: ColumnRef::new(alias, *column),
                    kind: Some(*kind),
                }
            }
            None => Self::passthrough(path),
        }
    }

    /// The primary identifier of the root entity
    pub fn primary_key(&self) -> ColumnRef {
        ColumnRef::root(self.catalog.schema.primary_key_column())
    }

    /// Joins created so far, in creation order
    pub fn joins(&self) -> &[JoinSpec] {
        &self.joins
    }

    pub fn into_joins(self) -> Vec<JoinSpec> {
        self.joins
    }

    /// Return the alias of the join for `relation`, creating it once
    fn join(&mut self, relation: &Relation) -> String {
        if let Some(existing) = self.joins.iter().find(|j| j.relation == relation.name) {
            return existing.alias.clone();
        }

        let join = JoinSpec {
            relation: relation.name.to_string(),
            alias: format!("j_{}", relation.name),
            table: relation.target.table().to_string(),
            foreign_key: relation.foreign_key.to_string(),
            target_key: relation.target.primary_key_column().to_string(),
        };
        let alias = join.alias.clone();
        self.joins.push(join);
        alias
    }

    fn passthrough(path: &str) -> ResolvedColumn {
        ResolvedColumn {
            column: ColumnRef::root(path),
            kind: None,
        }
    }
}
