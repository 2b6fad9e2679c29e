#![deny(
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # Storefront
//!
//! Customers, items and the reviews that join them, persisted with SeaORM and
//! serialized into plain JSON maps for transport.
//!
//! ## Entities
//!
//! | Entity | Table | Relationships |
//! |---|---|---|
//! | [`customer`] | `customers` | `reviews` (to-many), `items` (via reviews) |
//! | [`item`] | `items` | `reviews` (to-many), `customers` (via reviews) |
//! | [`review`] | `reviews` | `customer` (to-one), `item` (to-one) |
//!
//! ## Serialization
//!
//! Rows are loaded into an [`EntityGraph`] and then serialized synchronously.
//! Related entities are inlined exactly one level deep, so cycles such as
//! customer → review → customer never recurse.
//!
//! ```
//! use storefront::{EntityGraph, customer, item, review, serializer};
//! use serde_json::json;
//!
//! let mut graph = EntityGraph::new();
//! graph.insert(customer::Model { id: 1, name: Some("Ann".to_owned()) });
//! graph.insert(item::Model { id: 1, name: Some("Mug".to_owned()), price: Some(9.99) });
//! graph.insert(review::Model {
//!     id: 1,
//!     comment: Some("Nice".to_owned()),
//!     customer_id: Some(1),
//!     item_id: Some(1),
//! });
//!
//! let review = graph.review(1).unwrap();
//! assert_eq!(
//!     serializer::to_json(&graph, review),
//!     json!({
//!         "id": 1,
//!         "comment": "Nice",
//!         "customer_id": 1,
//!         "item_id": 1,
//!         "customer": { "id": 1, "name": "Ann" },
//!         "item": { "id": 1, "name": "Mug", "price": 9.99 },
//!     })
//! );
//! ```
//!
//! ## Persistence
//!
//! [`database::connect`] opens a connection from a [`StoreConfig`] and creates
//! the tables. Creating or removing a customer/item association is an explicit
//! call that writes a [`review`] row, see
//! [`customer::Model::add_item_association`].

pub mod config;
pub mod database;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod graph;
pub mod serializer;

pub use config::*;
pub use descriptor::*;
pub use entity::{customer, item, review};
pub use error::*;
pub use graph::*;
