//! Repository Module
//!
//! Typed CRUD on top of [`Storage`](crate::db::Storage). Repositories are
//! cheap to construct (they clone an `Arc`), handlers build them per request.

pub mod category;
pub mod contact;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod transaction;
pub mod user;

pub use category::CategoryRepository;
pub use contact::ContactRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use restaurant::RestaurantRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

/// Newest first, ties broken by id for a stable order
pub(crate) fn sort_newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (i64, &str)) {
    items.sort_by(|a, b| {
        let (ta, ia) = key(a);
        let (tb, ib) = key(b);
        tb.cmp(&ta).then_with(|| ia.cmp(ib))
    });
}
