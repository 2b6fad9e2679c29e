#![allow(dead_code)]

use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr};
use storefront::{StoreConfig, customer, database, item, review};
use tracing_subscriber::EnvFilter;

pub struct TestContext {
    pub db: DatabaseConnection,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let db = database::connect(&StoreConfig::default())
            .await
            .expect("could not open store");

        Self { db }
    }

    pub async fn customer(&self, name: &str) -> Result<customer::Model, DbErr> {
        customer::ActiveModel {
            name: Set(Some(name.to_owned())),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    pub async fn item(&self, name: &str, price: f64) -> Result<item::Model, DbErr> {
        item::ActiveModel {
            name: Set(Some(name.to_owned())),
            price: Set(Some(price)),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    pub async fn review(
        &self,
        comment: &str,
        customer: &customer::Model,
        item: &item::Model,
    ) -> Result<review::Model, DbErr> {
        review::ActiveModel {
            comment: Set(Some(comment.to_owned())),
            customer_id: Set(Some(customer.id)),
            item_id: Set(Some(item.id)),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }
}
