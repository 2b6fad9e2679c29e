//! An item for sale.

use sea_orm::{ConnectionTrait, entity::prelude::*};
use tracing::{debug, instrument};

use super::{customer, review};
use crate::{AssociationDescriptor, Cardinality, EntityDescriptor, EntityKind, RelationDescriptor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: Option<String>,
    pub price: Option<f64>,
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

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        super::review::Relation::Customer.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::review::Relation::Item.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Item,
    table_name: "items",
    primary_key: "id",
    columns: &["id", "name", "price"],
    relations: &[RelationDescriptor {
        name: "reviews",
        cardinality: Cardinality::ToMany,
        target: EntityKind::Review,
        local_column: "id",
        remote_column: "item_id",
    }],
    associations: &[AssociationDescriptor {
        name: "customers",
        through: "reviews",
        target: "customer",
    }],
};

impl Model {
    /// Customers who reviewed this item, one per linking review.
    pub async fn customers<C>(&self, db: &C) -> Result<Vec<customer::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.find_related(customer::Entity).all(db).await
    }

    /// Associate `customer` with this item by inserting a review without a comment.
    #[instrument(level = "debug", skip(db))]
    pub async fn add_customer_association<C>(
        &self,
        db: &C,
        customer: &customer::Model,
    ) -> Result<review::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let review = review::ActiveModel::link(customer.id, self.id).insert(db).await?;
        debug!(review_id = review.id, "item linked to customer");
        Ok(review)
    }

    /// Drop the association with `customer`, deleting every review linking the two.
    #[instrument(level = "debug", skip(db))]
    pub async fn remove_customer_association<C>(
        &self,
        db: &C,
        customer: &customer::Model,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        review::Entity::unlink(db, customer.id, self.id).await
    }
}
