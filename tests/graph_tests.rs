#![cfg(feature = "sqlx-sqlite")]

pub mod common;

use common::TestContext;
use pretty_assertions::assert_eq;
use sea_orm::DbErr;
use serde_json::json;
use storefront::{EntityGraph, EntityKind, serializer};

#[tokio::test]
async fn load_and_serialize_review() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let ann = ctx.customer("Ann").await?;
    let mug = ctx.item("Mug", 9.99).await?;
    let nice = ctx.review("Nice", &ann, &mug).await?;

    let graph = EntityGraph::load(&ctx.db).await?;
    assert_eq!(graph.len(), 3);

    assert_eq!(
        serializer::to_json(&graph, graph.review(nice.id).unwrap()),
        json!({
            "id": nice.id,
            "comment": "Nice",
            "customer_id": ann.id,
            "item_id": mug.id,
            "customer": { "id": ann.id, "name": "Ann" },
            "item": { "id": mug.id, "name": "Mug", "price": 9.99 },
        })
    );

    Ok(())
}

#[tokio::test]
async fn load_around_fetches_direct_relations_only() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let ann = ctx.customer("Ann").await?;
    let bob = ctx.customer("Bob").await?;
    let mug = ctx.item("Mug", 9.99).await?;
    let pen = ctx.item("Pen", 1.5).await?;
    let first = ctx.review("Nice", &ann, &mug).await?;
    let second = ctx.review("Leaks", &ann, &pen).await?;
    ctx.review("Fine", &bob, &mug).await?;

    let graph = EntityGraph::load_around(&ctx.db, EntityKind::Customer, ann.id).await?;

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.customer(ann.id), Some(&ann));
    assert_eq!(graph.review(first.id), Some(&first));
    assert_eq!(graph.review(second.id), Some(&second));
    assert_eq!(graph.customer(bob.id), None);
    assert_eq!(graph.item(mug.id), None);

    let customer = serializer::to_map(&graph, &ann, true);
    assert_eq!(customer["reviews"].as_array().map(Vec::len), Some(2));

    let graph = EntityGraph::load_around(&ctx.db, EntityKind::Review, first.id).await?;
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.item(mug.id), Some(&mug));
    assert_eq!(graph.customer(ann.id), Some(&ann));

    Ok(())
}

#[tokio::test]
async fn load_around_missing_row_is_empty() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;

    let graph = EntityGraph::load_around(&ctx.db, EntityKind::Item, 42).await?;

    assert!(graph.is_empty());

    Ok(())
}

#[tokio::test]
async fn cyclic_graph_stays_one_level_deep() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let ann = ctx.customer("Ann").await?;
    let mug = ctx.item("Mug", 9.99).await?;
    ctx.review("Nice", &ann, &mug).await?;
    ctx.review("Still nice", &ann, &mug).await?;

    let graph = EntityGraph::load(&ctx.db).await?;

    for kind in EntityKind::ALL {
        for row in serializer::to_maps(&graph, kind, true) {
            for relation in kind.descriptor().relations {
                let nested = match &row[relation.name] {
                    serde_json::Value::Array(rows) => rows.clone(),
                    serde_json::Value::Object(_) => vec![row[relation.name].clone()],
                    _ => Vec::new(),
                };
                for nested in nested {
                    let target = relation.target.descriptor();
                    let mut keys: Vec<&str> = nested
                        .as_object()
                        .unwrap()
                        .keys()
                        .map(String::as_str)
                        .collect();
                    keys.sort_unstable();
                    let mut columns = target.columns.to_vec();
                    columns.sort_unstable();
                    assert_eq!(keys, columns);
                }
            }
        }
    }

    Ok(())
}
