//! Row and response types.
//!
//! Row structs decode straight from queries via `FromRow`; response
//! types control what leaves the API (credential hashes never do).

pub mod catalog;
pub mod order;
pub mod store;
pub mod user;

pub use catalog::ProductRow;
pub use order::{
    NewOrderItem, OrderDetail, OrderHeaderRow, OrderItemDetailRow, OrderItemRow, OrderRow,
};
pub use store::{StoreMember, StoreRow};
pub use user::{ProfileStore, PublicUser, UserProfile, UserRow};
