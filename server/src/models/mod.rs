// server/src/models/mod.rs

//! Row types for the three tables plus the request payloads that create or patch them.

pub mod order;
pub mod page;
pub mod product;
pub mod user;

pub use order::{NewOrder, NewOrderRow, Order, OrderDetails, OrderPatch, ProductSummary, UserSummary};
pub use page::{Page, PageQuery};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{NewUser, NewUserRow, User, UserPatch};
