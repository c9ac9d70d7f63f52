//! Entity schemas for the grid engine
//!
//! An `EntitySchema` declares, once at startup, which attributes an entity
//! exposes, which storage column backs each attribute and what kind of value
//! it holds. Filters consult the kind instead of inspecting values at query
//! time, so every coercion decision is an exhaustive match on `AttributeKind`.

use std::sync::Arc;

/// Declared kind of a storage attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// Arbitrary precision decimal
    Decimal,
    /// Free text
    Text,
    /// Closed set of named members, stored by name
    Enum(&'static [&'static str]),
    /// Local date-time without zone
    Timestamp,
}

impl AttributeKind {
    /// Returns true for the kinds a number filter may target
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            AttributeKind::Int
                | AttributeKind::Long
                | AttributeKind::Float
                | AttributeKind::Double
                | AttributeKind::Decimal
        )
    }

    /// Returns true if a text filter may target this kind
    pub fn is_textual(&self) -> bool {
        matches!(self, AttributeKind::Text | AttributeKind::Enum(_))
    }

    /// Returns true if a date filter may target this kind
    pub fn is_timestamp(&self) -> bool {
        matches!(self, AttributeKind::Timestamp)
    }

    /// Short name for diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Int => "int",
            AttributeKind::Long => "long",
            AttributeKind::Float => "float",
            AttributeKind::Double => "double",
            AttributeKind::Decimal => "decimal",
            AttributeKind::Text => "text",
            AttributeKind::Enum(_) => "enum",
            AttributeKind::Timestamp => "timestamp",
        }
    }
}

/// A single attribute of an entity
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Attribute name as used in storage paths (`fullName`)
    pub name: &'static str,
    /// Backing column (`full_name`)
    pub column: &'static str,
    pub kind: AttributeKind,
}

/// A to-one relation reachable in a single hop
#[derive(Debug, Clone)]
pub struct Relation {
    /// Relation name as used in storage paths (`owner`)
    pub name: &'static str,
    /// Foreign key column on the owning table
    pub foreign_key: &'static str,
    /// Schema of the related entity
    pub target: Arc<EntitySchema>,
}

/// Static description of one entity type
#[derive(Debug, Clone)]
pub struct EntitySchema {
    name: &'static str,
    table: &'static str,
    primary_key: &'static str,
    attributes: Vec<Attribute>,
    relations: Vec<Relation>,
}

impl EntitySchema {
    /// Create a schema whose primary key attribute is `id`
    pub fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            table,
            primary_key: "id",
            attributes: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Declare an attribute
    pub fn attribute(mut self, name: &'static str, column: &'static str, kind: AttributeKind) -> Self {
        self.attributes.push(Attribute { name, column, kind });
        self
    }

    /// Declare a to-one relation
    pub fn relation(
        mut self,
        name: &'static str,
        foreign_key: &'static str,
        target: Arc<EntitySchema>,
    ) -> Self {
        self.relations.push(Relation {
            name,
            foreign_key,
            target,
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Attribute name of the primary identifier
    pub fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    /// Column backing the primary identifier
    pub fn primary_key_column(&self) -> &'static str {
        self.find_attribute(self.primary_key)
            .map(|a| a.column)
            .unwrap_or(self.primary_key)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Look up an attribute by name
    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_schema() -> EntitySchema {
        EntitySchema::new("person", "persons")
            .attribute("id", "id", AttributeKind::Long)
            .attribute("fullName", "full_name", AttributeKind::Text)
    }

    #[test]
    fn test_numeric_kinds() {
        assert!(AttributeKind::Int.is_numeric());
        assert!(AttributeKind::Decimal.is_numeric());
        assert!(!AttributeKind::Text.is_numeric());
        assert!(!AttributeKind::Timestamp.is_numeric());
        assert!(AttributeKind::Timestamp.is_timestamp());
        assert!(AttributeKind::Text.is_textual());
        assert!(AttributeKind::Enum(&["A"]).is_textual());
        assert!(!AttributeKind::Int.is_textual());
    }

    #[test]
    fn test_attribute_lookup() {
        let schema = owner_schema();
        assert_eq!(schema.find_attribute("fullName").unwrap().column, "full_name");
        assert!(schema.find_attribute("missing").is_none());
        assert_eq!(schema.primary_key_column(), "id");
    }

    #[test]
    fn test_relations_are_listed() {
        let vehicle = EntitySchema::new("vehicle", "vehicles")
            .attribute("id", "id", AttributeKind::Long)
            .relation("owner", "owner_id", Arc::new(owner_schema()));

        let relations = vehicle.relations();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].name, "owner");
        assert_eq!(relations[0].foreign_key, "owner_id");
        assert_eq!(relations[0].target.table(), "persons");
    }
}
