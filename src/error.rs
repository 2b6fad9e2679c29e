use sea_orm::DbErr;
use thiserror::Error;

use crate::EntityKind;

/// An error raised while setting up the store
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the database, passed through untouched
    #[error(transparent)]
    Db(#[from] DbErr),
    /// The entity descriptor table is inconsistent
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A configuration value could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    Config {
        /// Name of the offending key
        key: &'static str,
        /// The raw value that failed to parse
        value: String,
    },
}

/// A problem found while validating an [`EntityDescriptor`](crate::EntityDescriptor)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A column or relationship name appears more than once
    #[error("{entity}: field `{name}` is declared more than once")]
    DuplicateField {
        /// Entity declaring the field
        entity: EntityKind,
        /// The repeated name
        name: &'static str,
    },
    /// A relationship shares its name with a scalar column
    #[error("{entity}: relationship `{name}` collides with a column of the same name")]
    NameCollision {
        /// Entity declaring the relationship
        entity: EntityKind,
        /// The colliding name
        name: &'static str,
    },
    /// A relationship refers to a column its entity does not have
    #[error("{entity}.{relation}: `{column}` is not a column of {owner}")]
    UnknownColumn {
        /// Entity declaring the relationship
        entity: EntityKind,
        /// The relationship
        relation: &'static str,
        /// Entity expected to own the column
        owner: EntityKind,
        /// The missing column
        column: &'static str,
    },
    /// A to-one relationship does not point at the target's primary key
    #[error("{entity}.{relation}: to-one relationship must reference the primary key of {target}")]
    NotPrimaryKey {
        /// Entity declaring the relationship
        entity: EntityKind,
        /// The relationship
        relation: &'static str,
        /// Target entity
        target: EntityKind,
    },
    /// An association does not project through a to-many then a to-one relationship
    #[error("{entity}: association `{name}` must go through a to-many relationship into a to-one relationship")]
    InvalidAssociation {
        /// Entity declaring the association
        entity: EntityKind,
        /// The association
        name: &'static str,
    },
}
