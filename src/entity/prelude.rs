pub use super::customer::Entity as Customer;
pub use super::item::Entity as Item;
pub use super::review::Entity as Review;
