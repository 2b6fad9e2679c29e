//! Materialized entity state.
//!
//! An [`EntityGraph`] is an identity map of rows loaded from the database.
//! Relationships are resolved against it using the [`EntityDescriptor`] of
//! each kind, so serialization never touches the connection.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityName, EntityTrait, IdenStatic, Iterable, ModelTrait,
    QueryFilter, Value,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::{Cardinality, EntityDescriptor, EntityKind, RelationDescriptor, customer, item, review};

/// An owned row of any entity kind
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    #[allow(missing_docs)]
    Customer(customer::Model),
    #[allow(missing_docs)]
    Item(item::Model),
    #[allow(missing_docs)]
    Review(review::Model),
}

/// A borrowed row of any entity kind
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RecordRef<'a> {
    #[allow(missing_docs)]
    Customer(&'a customer::Model),
    #[allow(missing_docs)]
    Item(&'a item::Model),
    #[allow(missing_docs)]
    Review(&'a review::Model),
}

/// The rows a relationship resolves to
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved<'a> {
    /// To-one; `None` when the reference is unset or not loaded
    One(Option<RecordRef<'a>>),
    /// To-many, in id order
    Many(Vec<RecordRef<'a>>),
}

/// Loaded customers, items and reviews, keyed by id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityGraph {
    customers: BTreeMap<i32, customer::Model>,
    items: BTreeMap<i32, item::Model>,
    reviews: BTreeMap<i32, review::Model>,
}

impl Record {
    #[allow(missing_docs)]
    pub fn kind(&self) -> EntityKind {
        self.by_ref().kind()
    }

    #[allow(missing_docs)]
    pub fn id(&self) -> i32 {
        self.by_ref().id()
    }

    /// Borrow this row
    pub fn by_ref(&self) -> RecordRef<'_> {
        match self {
            Self::Customer(model) => RecordRef::Customer(model),
            Self::Item(model) => RecordRef::Item(model),
            Self::Review(model) => RecordRef::Review(model),
        }
    }
}

impl<'a> RecordRef<'a> {
    #[allow(missing_docs)]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Customer(_) => EntityKind::Customer,
            Self::Item(_) => EntityKind::Item,
            Self::Review(_) => EntityKind::Review,
        }
    }

    #[allow(missing_docs)]
    pub fn id(&self) -> i32 {
        match self {
            Self::Customer(model) => model.id,
            Self::Item(model) => model.id,
            Self::Review(model) => model.id,
        }
    }

    /// Schema metadata of this row's kind
    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.kind().descriptor()
    }

    /// Read a column by name; `None` if the entity has no such column
    pub fn column(&self, name: &str) -> Option<Value> {
        match self {
            Self::Customer(model) => column_value(*model, name),
            Self::Item(model) => column_value(*model, name),
            Self::Review(model) => column_value(*model, name),
        }
    }

    /// Clone into an owned [`Record`]
    pub fn to_record(&self) -> Record {
        match self {
            Self::Customer(model) => Record::Customer((*model).clone()),
            Self::Item(model) => Record::Item((*model).clone()),
            Self::Review(model) => Record::Review((*model).clone()),
        }
    }
}

fn column_value<M>(model: &M, name: &str) -> Option<Value>
where
    M: ModelTrait,
{
    <M::Entity as EntityTrait>::Column::iter()
        .find(|col| col.as_str() == name)
        .map(|col| model.get(col))
}

/// Interpret a key column as an id; `None` for null
pub(crate) fn key_of(value: &Value) -> Option<i32> {
    match value {
        Value::Int(Some(v)) => Some(*v),
        Value::BigInt(Some(v)) => i32::try_from(*v).ok(),
        Value::SmallInt(Some(v)) => Some(i32::from(*v)),
        Value::Unsigned(Some(v)) => i32::try_from(*v).ok(),
        _ => None,
    }
}

macro_rules! impl_record {
    ($module:ident, $variant:ident) => {
        impl From<$module::Model> for Record {
            fn from(model: $module::Model) -> Self {
                Record::$variant(model)
            }
        }

        impl<'a> From<&'a $module::Model> for RecordRef<'a> {
            fn from(model: &'a $module::Model) -> Self {
                RecordRef::$variant(model)
            }
        }
    };
}

impl_record!(customer, Customer);
impl_record!(item, Item);
impl_record!(review, Review);

impl<'a> From<&'a Record> for RecordRef<'a> {
    fn from(record: &'a Record) -> Self {
        record.by_ref()
    }
}

impl EntityGraph {
    /// An empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row, replacing any row of the same kind and id. Returns the replaced row.
    pub fn insert(&mut self, record: impl Into<Record>) -> Option<Record> {
        match record.into() {
            Record::Customer(model) => self.customers.insert(model.id, model).map(Record::Customer),
            Record::Item(model) => self.items.insert(model.id, model).map(Record::Item),
            Record::Review(model) => self.reviews.insert(model.id, model).map(Record::Review),
        }
    }

    /// Remove a row
    pub fn remove(&mut self, kind: EntityKind, id: i32) -> Option<Record> {
        match kind {
            EntityKind::Customer => self.customers.remove(&id).map(Record::Customer),
            EntityKind::Item => self.items.remove(&id).map(Record::Item),
            EntityKind::Review => self.reviews.remove(&id).map(Record::Review),
        }
    }

    #[allow(missing_docs)]
    pub fn get(&self, kind: EntityKind, id: i32) -> Option<RecordRef<'_>> {
        match kind {
            EntityKind::Customer => self.customers.get(&id).map(RecordRef::Customer),
            EntityKind::Item => self.items.get(&id).map(RecordRef::Item),
            EntityKind::Review => self.reviews.get(&id).map(RecordRef::Review),
        }
    }

    #[allow(missing_docs)]
    pub fn customer(&self, id: i32) -> Option<&customer::Model> {
        self.customers.get(&id)
    }

    #[allow(missing_docs)]
    pub fn item(&self, id: i32) -> Option<&item::Model> {
        self.items.get(&id)
    }

    #[allow(missing_docs)]
    pub fn review(&self, id: i32) -> Option<&review::Model> {
        self.reviews.get(&id)
    }

    /// All loaded rows of a kind, in id order
    pub fn records(&self, kind: EntityKind) -> Vec<RecordRef<'_>> {
        match kind {
            EntityKind::Customer => self.customers.values().map(RecordRef::Customer).collect(),
            EntityKind::Item => self.items.values().map(RecordRef::Item).collect(),
            EntityKind::Review => self.reviews.values().map(RecordRef::Review).collect(),
        }
    }

    /// Number of rows across all kinds
    pub fn len(&self) -> usize {
        self.customers.len() + self.items.len() + self.reviews.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a relationship of `record` against the loaded rows.
    pub fn related(&self, record: RecordRef<'_>, relation: &RelationDescriptor) -> Resolved<'_> {
        let key = record
            .column(relation.local_column)
            .as_ref()
            .and_then(key_of);

        match relation.cardinality {
            Cardinality::ToOne => Resolved::One(key.and_then(|key| self.get(relation.target, key))),
            Cardinality::ToMany => {
                let Some(key) = key else {
                    return Resolved::Many(Vec::new());
                };
                Resolved::Many(
                    self.records(relation.target)
                        .into_iter()
                        .filter(|row| {
                            row.column(relation.remote_column).as_ref().and_then(key_of)
                                == Some(key)
                        })
                        .collect(),
                )
            }
        }
    }

    /// Rows reached through a named association, e.g. a customer's `items`.
    ///
    /// Yields one row per intermediate row; intermediate rows whose target is
    /// unset are skipped. Unknown names yield nothing.
    pub fn associated(&self, record: RecordRef<'_>, name: &str) -> Vec<RecordRef<'_>> {
        let descriptor = record.descriptor();
        let Some(assoc) = descriptor.association(name) else {
            return Vec::new();
        };
        let Some(through) = descriptor.relation(assoc.through) else {
            return Vec::new();
        };
        let Some(target) = through.target.descriptor().relation(assoc.target) else {
            return Vec::new();
        };

        let intermediate = match self.related(record, through) {
            Resolved::Many(rows) => rows,
            Resolved::One(row) => row.into_iter().collect(),
        };
        intermediate
            .into_iter()
            .filter_map(|row| match self.related(row, target) {
                Resolved::One(found) => found,
                Resolved::Many(_) => None,
            })
            .collect()
    }

    /// Load every customer, item and review.
    #[instrument(level = "debug", skip(db))]
    pub async fn load<C>(db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut graph = Self::new();
        for model in customer::Entity::find().all(db).await? {
            graph.insert(model);
        }
        for model in item::Entity::find().all(db).await? {
            graph.insert(model);
        }
        for model in review::Entity::find().all(db).await? {
            graph.insert(model);
        }
        debug!(rows = graph.len(), "entity graph loaded");
        Ok(graph)
    }

    /// Load one row and the rows its relationships reference.
    ///
    /// The graph is empty if the row does not exist.
    #[instrument(level = "debug", skip(db))]
    pub async fn load_around<C>(db: &C, kind: EntityKind, id: i32) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut graph = Self::new();
        let descriptor = kind.descriptor();
        for record in fetch_where(db, kind, descriptor.primary_key, id).await? {
            graph.insert(record);
        }

        let lookups: Vec<_> = match graph.get(kind, id) {
            Some(root) => descriptor
                .relations
                .iter()
                .filter_map(|rel| {
                    let key = key_of(&root.column(rel.local_column)?)?;
                    Some((rel.target, rel.remote_column, key))
                })
                .collect(),
            None => Vec::new(),
        };
        for (target, column, key) in lookups {
            for record in fetch_where(db, target, column, key).await? {
                graph.insert(record);
            }
        }

        debug!(rows = graph.len(), "entity graph loaded");
        Ok(graph)
    }
}

async fn fetch_where<C>(
    db: &C,
    kind: EntityKind,
    column: &str,
    key: i32,
) -> Result<Vec<Record>, DbErr>
where
    C: ConnectionTrait,
{
    Ok(match kind {
        EntityKind::Customer => find_where::<customer::Entity, _>(db, column, key)
            .await?
            .into_iter()
            .map(Record::Customer)
            .collect(),
        EntityKind::Item => find_where::<item::Entity, _>(db, column, key)
            .await?
            .into_iter()
            .map(Record::Item)
            .collect(),
        EntityKind::Review => find_where::<review::Entity, _>(db, column, key)
            .await?
            .into_iter()
            .map(Record::Review)
            .collect(),
    })
}

async fn find_where<E, C>(db: &C, name: &str, key: i32) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let Some(column) = E::Column::iter().find(|col| col.as_str() == name) else {
        return Err(DbErr::Custom(format!(
            "column `{name}` not found on table `{}`",
            E::default().table_name()
        )));
    };
    E::find().filter(column.eq(key)).all(db).await
}
