//! SeaORM entities of the store.

pub mod customer;
pub mod item;
pub mod prelude;
pub mod review;
