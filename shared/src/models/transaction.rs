//! Transaction Model

use serde::{Deserialize, Serialize};

/// Direction of money movement for a transaction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Credited,
    Debited,
}

/// Transaction model
///
/// Structurally close to [`super::Order`] but independent of it: nothing links
/// a transaction back to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Generated unique display code (`TXN-...`)
    pub transaction_id: String,
    pub customer_name: String,
    pub date: String,
    pub time: String,
    pub amount: f64,
    pub payment_type: TransactionType,
    #[serde(default)]
    pub details: Option<String>,
    pub owner_id: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreate {
    pub customer_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub amount: Option<f64>,
    pub payment_type: Option<TransactionType>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
