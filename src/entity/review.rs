//! A review links one customer to one item.

use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryFilter, entity::prelude::*};
use tracing::debug;

use crate::{Cardinality, EntityDescriptor, EntityKind, RelationDescriptor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub comment: Option<String>,
    pub customer_id: Option<i32>,
    pub item_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Review,
    table_name: "reviews",
    primary_key: "id",
    columns: &["id", "comment", "customer_id", "item_id"],
    relations: &[
        RelationDescriptor {
            name: "customer",
            cardinality: Cardinality::ToOne,
            target: EntityKind::Customer,
            local_column: "customer_id",
            remote_column: "id",
        },
        RelationDescriptor {
            name: "item",
            cardinality: Cardinality::ToOne,
            target: EntityKind::Item,
            local_column: "item_id",
            remote_column: "id",
        },
    ],
    associations: &[],
};

impl ActiveModel {
    /// A review joining a customer and an item, with the comment left unset
    pub fn link(customer_id: i32, item_id: i32) -> Self {
        Self {
            customer_id: Set(Some(customer_id)),
            item_id: Set(Some(item_id)),
            ..Default::default()
        }
    }
}

impl Entity {
    /// Delete every review joining the given customer and item
    pub async fn unlink<C>(db: &C, customer_id: i32, item_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Self::delete_many()
            .filter(Column::CustomerId.eq(customer_id))
            .filter(Column::ItemId.eq(item_id))
            .exec(db)
            .await?;
        debug!(customer_id, item_id, removed = res.rows_affected, "reviews unlinked");
        Ok(res.rows_affected)
    }
}
