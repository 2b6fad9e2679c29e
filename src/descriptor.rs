//! Static schema descriptors.
//!
//! Each entity kind publishes an [`EntityDescriptor`] listing its scalar
//! columns, its relationships and the associations derived from them. The
//! serializer and the [`EntityGraph`](crate::EntityGraph) walk these tables
//! instead of special-casing any entity.

use itertools::Itertools;
use std::fmt;

use crate::{SchemaError, customer, item, review};

/// The kinds of entity known to the store
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    #[allow(missing_docs)]
    Customer,
    #[allow(missing_docs)]
    Item,
    #[allow(missing_docs)]
    Review,
}

/// Whether a relationship yields one related row or many
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Many-to-one; serialized as an object or `null`
    ToOne,
    /// One-to-many; serialized as an array
    ToMany,
}

/// A relationship declared on an entity.
///
/// A row of the target kind is related when its `remote_column` equals the
/// owner's `local_column`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RelationDescriptor {
    /// Key used in serialized output
    pub name: &'static str,
    #[allow(missing_docs)]
    pub cardinality: Cardinality,
    #[allow(missing_docs)]
    pub target: EntityKind,
    /// Column on the owning entity
    pub local_column: &'static str,
    /// Column on the target entity
    pub remote_column: &'static str,
}

/// A many-to-many view computed by projecting through an intermediate entity
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AssociationDescriptor {
    #[allow(missing_docs)]
    pub name: &'static str,
    /// To-many relationship on the owning entity
    pub through: &'static str,
    /// To-one relationship on the intermediate entity
    pub target: &'static str,
}

/// Schema metadata of one entity kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    #[allow(missing_docs)]
    pub kind: EntityKind,
    #[allow(missing_docs)]
    pub table_name: &'static str,
    #[allow(missing_docs)]
    pub primary_key: &'static str,
    /// Scalar columns, in declaration order
    pub columns: &'static [&'static str],
    #[allow(missing_docs)]
    pub relations: &'static [RelationDescriptor],
    /// Derived views; never serialized
    pub associations: &'static [AssociationDescriptor],
}

impl EntityKind {
    /// Every kind, in table creation order
    pub const ALL: [EntityKind; 3] = [EntityKind::Customer, EntityKind::Item, EntityKind::Review];

    /// The descriptor of this kind
    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            Self::Customer => &customer::DESCRIPTOR,
            Self::Item => &item::DESCRIPTOR,
            Self::Review => &review::DESCRIPTOR,
        }
    }

    #[allow(missing_docs)]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Item => "Item",
            Self::Review => "Review",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EntityDescriptor {
    /// Find a relationship by name
    pub fn relation(&self, name: &str) -> Option<&'static RelationDescriptor> {
        self.relations.iter().find(|rel| rel.name == name)
    }

    /// Find an association by name
    pub fn association(&self, name: &str) -> Option<&'static AssociationDescriptor> {
        self.associations.iter().find(|assoc| assoc.name == name)
    }

    /// Whether `name` is one of the scalar columns
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(&name)
    }

    /// Check the descriptor for name clashes and dangling references.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let entity = self.kind;

        if let Some(name) = self
            .columns
            .iter()
            .copied()
            .chain(self.relations.iter().map(|rel| rel.name))
            .chain(self.associations.iter().map(|assoc| assoc.name))
            .duplicates()
            .next()
        {
            return Err(if self.has_column(name) && self.relation(name).is_some() {
                SchemaError::NameCollision { entity, name }
            } else {
                SchemaError::DuplicateField { entity, name }
            });
        }

        if !self.has_column(self.primary_key) {
            return Err(SchemaError::UnknownColumn {
                entity,
                relation: "primary key",
                owner: entity,
                column: self.primary_key,
            });
        }

        for rel in self.relations {
            let target = rel.target.descriptor();
            if !self.has_column(rel.local_column) {
                return Err(SchemaError::UnknownColumn {
                    entity,
                    relation: rel.name,
                    owner: entity,
                    column: rel.local_column,
                });
            }
            if !target.has_column(rel.remote_column) {
                return Err(SchemaError::UnknownColumn {
                    entity,
                    relation: rel.name,
                    owner: rel.target,
                    column: rel.remote_column,
                });
            }
            if rel.cardinality == Cardinality::ToOne && rel.remote_column != target.primary_key {
                return Err(SchemaError::NotPrimaryKey {
                    entity,
                    relation: rel.name,
                    target: rel.target,
                });
            }
        }

        for assoc in self.associations {
            let valid = self
                .relation(assoc.through)
                .filter(|through| through.cardinality == Cardinality::ToMany)
                .and_then(|through| through.target.descriptor().relation(assoc.target))
                .is_some_and(|target| target.cardinality == Cardinality::ToOne);
            if !valid {
                return Err(SchemaError::InvalidAssociation {
                    entity,
                    name: assoc.name,
                });
            }
        }

        Ok(())
    }
}

/// Validate the descriptor of every entity kind
pub fn validate_all() -> Result<(), SchemaError> {
    EntityKind::ALL
        .iter()
        .try_for_each(|kind| kind.descriptor().validate())
}
