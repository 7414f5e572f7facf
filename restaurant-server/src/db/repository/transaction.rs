//! Transaction Repository

use crate::db::{Storage, StorageResult, TRANSACTION_CODE_INDEX, TRANSACTIONS_TABLE, UniqueKey};
use shared::models::Transaction;

use super::sort_newest_first;

#[derive(Clone)]
pub struct TransactionRepository {
    storage: Storage,
}

impl TransactionRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn code_key(transaction: &Transaction) -> UniqueKey {
        UniqueKey::new(TRANSACTION_CODE_INDEX, &transaction.transaction_id, "transactionId")
    }

    pub fn find_by_id(&self, id: &str) -> StorageResult<Option<Transaction>> {
        self.storage.get(TRANSACTIONS_TABLE, id)
    }

    /// Transactions of one owner, newest first
    pub fn find_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .storage
            .scan::<Transaction>(TRANSACTIONS_TABLE)?
            .into_iter()
            .filter(|t| t.owner_id == owner_id)
            .collect();
        sort_newest_first(&mut transactions, |t| (t.created_at, t.id.as_str()));
        Ok(transactions)
    }

    pub fn create(&self, transaction: &Transaction) -> StorageResult<()> {
        self.storage.insert(
            TRANSACTIONS_TABLE,
            &transaction.id,
            transaction,
            &[Self::code_key(transaction)],
        )
    }

    pub fn save(&self, transaction: &Transaction) -> StorageResult<()> {
        self.storage
            .replace(TRANSACTIONS_TABLE, &transaction.id, transaction, &[], &[])
    }

    pub fn delete(&self, transaction: &Transaction) -> StorageResult<bool> {
        self.storage.remove(
            TRANSACTIONS_TABLE,
            &transaction.id,
            &[Self::code_key(transaction)],
        )
    }
}
