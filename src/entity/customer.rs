//! A customer who writes reviews of items.

use sea_orm::{ConnectionTrait, entity::prelude::*};
use tracing::{debug, instrument};

use super::{item, review};
use crate::{AssociationDescriptor, Cardinality, EntityDescriptor, EntityKind, RelationDescriptor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        super::review::Relation::Item.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::review::Relation::Customer.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Customer,
    table_name: "customers",
    primary_key: "id",
    columns: &["id", "name"],
    relations: &[RelationDescriptor {
        name: "reviews",
        cardinality: Cardinality::ToMany,
        target: EntityKind::Review,
        local_column: "id",
        remote_column: "customer_id",
    }],
    associations: &[AssociationDescriptor {
        name: "items",
        through: "reviews",
        target: "item",
    }],
};

impl Model {
    /// Items this customer has reviewed, one per linking review.
    pub async fn items<C>(&self, db: &C) -> Result<Vec<item::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.find_related(item::Entity).all(db).await
    }

    /// Associate `item` with this customer by inserting a review without a comment.
    ///
    /// A new review is written on every call, even if the pair is already linked.
    #[instrument(level = "debug", skip(db))]
    pub async fn add_item_association<C>(
        &self,
        db: &C,
        item: &item::Model,
    ) -> Result<review::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let review = review::ActiveModel::link(self.id, item.id).insert(db).await?;
        debug!(review_id = review.id, "customer linked to item");
        Ok(review)
    }

    /// Drop the association with `item`, deleting every review linking the two.
    #[instrument(level = "debug", skip(db))]
    pub async fn remove_item_association<C>(
        &self,
        db: &C,
        item: &item::Model,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        review::Entity::unlink(db, self.id, item.id).await
    }
}
