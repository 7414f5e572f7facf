//! Order Service
//!
//! Order lifecycle: public placement, owner-scoped reads, updates, explicit
//! status changes and hard deletes. Every mutation that changes an order is
//! broadcast on the [`NotificationBus`].

use shared::Notification;
use shared::models::{Order, OrderCreate, OrderStatus, OrderUpdate, Role};
use shared::util::{new_code, new_id, now_millis};

use crate::auth::CurrentUser;
use crate::db::Storage;
use crate::db::repository::{OrderRepository, UserRepository};
use crate::services::NotificationBus;
use crate::utils::AppResult;
use crate::utils::error::AppError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, require, require_text, validate_amount,
    validate_optional_text,
};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    users: UserRepository,
    bus: NotificationBus,
}

impl OrderService {
    pub fn new(storage: Storage, bus: NotificationBus) -> Self {
        Self {
            orders: OrderRepository::new(storage.clone()),
            users: UserRepository::new(storage),
            bus,
        }
    }

    /// Place an order (unauthenticated)
    ///
    /// Required fields are checked in wire order and the first missing one
    /// is reported. Nothing is stored when validation fails.
    pub fn place_order(&self, input: OrderCreate) -> AppResult<Order> {
        let customer_name = require_text(input.customer_name, "customerName", MAX_NAME_LEN)?;
        let time = require_text(input.time, "time", MAX_SHORT_TEXT_LEN)?;
        let amount = validate_amount(require(input.amount, "amount")?, "amount")?;
        let payment_type = require(input.payment_type, "paymentType")?;
        let owner_id = require_text(input.owner_id, "ownerId", MAX_SHORT_TEXT_LEN)?;
        let status = require(input.status, "status")?;
        validate_optional_text(&input.details, "details", MAX_NOTE_LEN)?;

        let owner = self.users.find_by_id(&owner_id)?;
        if !owner.is_some_and(|u| u.role == Role::Owner) {
            return Err(AppError::validation(format!(
                "ownerId {owner_id} does not reference a restaurant owner"
            )));
        }

        let order = Order {
            id: new_id(),
            order_id: new_code("ORD"),
            customer_name,
            time,
            amount,
            payment_type,
            status,
            details: input.details.filter(|d| !d.trim().is_empty()),
            owner_id,
            created_at: now_millis(),
        };
        self.orders.create(&order)?;

        tracing::info!(
            order_id = %order.order_id,
            owner_id = %order.owner_id,
            amount = order.amount,
            "Order placed"
        );
        self.bus.publish(Notification::NewOrder {
            order: order.clone(),
        });
        Ok(order)
    }

    /// Orders of the calling owner, newest first
    pub fn list_orders(&self, user: &CurrentUser) -> AppResult<Vec<Order>> {
        user.require_role(Role::Owner)?;
        Ok(self.orders.find_by_owner(&user.id)?)
    }

    pub fn get_order(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        self.load_owned(user, id)
    }

    /// Merge the present patch fields; `id`, `orderId` and `ownerId` never change
    pub fn update_order(&self, user: &CurrentUser, id: &str, patch: OrderUpdate) -> AppResult<Order> {
        let mut order = self.load_owned(user, id)?;

        if let Some(customer_name) = patch.customer_name {
            order.customer_name = require_text(Some(customer_name), "customerName", MAX_NAME_LEN)?;
        }
        if let Some(time) = patch.time {
            order.time = require_text(Some(time), "time", MAX_SHORT_TEXT_LEN)?;
        }
        if let Some(amount) = patch.amount {
            order.amount = validate_amount(amount, "amount")?;
        }
        if let Some(payment_type) = patch.payment_type {
            order.payment_type = payment_type;
        }
        if let Some(status) = patch.status {
            order.status = status;
        }
        if let Some(details) = patch.details {
            validate_optional_text(&Some(details.clone()), "details", MAX_NOTE_LEN)?;
            order.details = Some(details).filter(|d| !d.trim().is_empty());
        }

        self.orders.save(&order)?;
        tracing::info!(order_id = %order.order_id, "Order updated");
        self.bus.publish(Notification::OrderUpdated {
            order: order.clone(),
        });
        Ok(order)
    }

    /// Set the status to exactly `status`; every transition is allowed
    pub fn change_status(&self, user: &CurrentUser, id: &str, status: OrderStatus) -> AppResult<Order> {
        let mut order = self.load_owned(user, id)?;
        let previous = order.status;
        order.status = status;
        self.orders.save(&order)?;

        tracing::info!(
            order_id = %order.order_id,
            from = %previous,
            to = %status,
            "Order status changed"
        );
        self.bus.publish(Notification::OrderStatusChanged {
            order: order.clone(),
        });
        Ok(order)
    }

    /// Hard delete; the `orderId` code becomes free again
    pub fn delete_order(&self, user: &CurrentUser, id: &str) -> AppResult<()> {
        let order = self.load_owned(user, id)?;
        self.orders.delete(&order)?;
        tracing::info!(order_id = %order.order_id, "Order deleted");
        Ok(())
    }

    fn load_owned(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        user.require_role(Role::Owner)?;
        let order = self
            .orders
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        user.ensure_owner(&order.owner_id)?;
        Ok(order)
    }
}
