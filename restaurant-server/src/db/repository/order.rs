//! Order Repository

use crate::db::{ORDER_CODE_INDEX, ORDERS_TABLE, Storage, StorageResult, UniqueKey};
use shared::models::Order;

use super::sort_newest_first;

#[derive(Clone)]
pub struct OrderRepository {
    storage: Storage,
}

impl OrderRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn code_key(order: &Order) -> UniqueKey {
        UniqueKey::new(ORDER_CODE_INDEX, &order.order_id, "orderId")
    }

    pub fn find_by_id(&self, id: &str) -> StorageResult<Option<Order>> {
        self.storage.get(ORDERS_TABLE, id)
    }

    /// Orders of one owner, newest first
    pub fn find_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .storage
            .scan::<Order>(ORDERS_TABLE)?
            .into_iter()
            .filter(|o| o.owner_id == owner_id)
            .collect();
        sort_newest_first(&mut orders, |o| (o.created_at, o.id.as_str()));
        Ok(orders)
    }

    pub fn create(&self, order: &Order) -> StorageResult<()> {
        self.storage
            .insert(ORDERS_TABLE, &order.id, order, &[Self::code_key(order)])
    }

    /// Save an existing order (`orderId` never changes)
    pub fn save(&self, order: &Order) -> StorageResult<()> {
        self.storage.replace(ORDERS_TABLE, &order.id, order, &[], &[])
    }

    pub fn delete(&self, order: &Order) -> StorageResult<bool> {
        self.storage
            .remove(ORDERS_TABLE, &order.id, &[Self::code_key(order)])
    }
}
