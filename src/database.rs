//! Connecting and preparing the schema.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityName, EntityTrait, Schema};
use tracing::{debug, info, instrument};

use crate::{EntityKind, Error, StoreConfig, customer, descriptor, item, review};

/// Connect to the database described by `config`.
///
/// The descriptor table is validated first. Tables are created when
/// `create_schema` is set.
#[instrument(level = "debug", skip(config))]
pub async fn connect(config: &StoreConfig) -> Result<DatabaseConnection, Error> {
    descriptor::validate_all()?;
    let db = Database::connect(config.connect_options()).await?;
    if config.create_schema {
        create_tables(&db).await?;
    }
    info!(backend = ?db.get_database_backend(), "store connected");
    Ok(db)
}

/// Create the `customers`, `items` and `reviews` tables if they do not exist
pub async fn create_tables<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for kind in EntityKind::ALL {
        match kind {
            EntityKind::Customer => create_table(db, customer::Entity).await?,
            EntityKind::Item => create_table(db, item::Entity).await?,
            EntityKind::Review => create_table(db, review::Entity).await?,
        }
    }
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    debug!(table = entity.table_name(), "table ready");
    Ok(())
}
