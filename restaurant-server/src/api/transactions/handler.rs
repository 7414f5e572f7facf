//! Transaction API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use shared::models::{Role, Transaction, TransactionCreate, TransactionUpdate};
use shared::util::{new_code, new_id, now_millis};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::TransactionRepository;
use crate::utils::error::AppError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, require, require_text, validate_amount,
    validate_optional_text,
};
use crate::utils::{AppResponse, AppResult, ok_with_message};

fn load_owned(
    repo: &TransactionRepository,
    current_user: &CurrentUser,
    id: &str,
) -> AppResult<Transaction> {
    current_user.require_role(Role::Owner)?;
    let transaction = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::not_found(format!("Transaction {id} not found")))?;
    current_user.ensure_owner(&transaction.owner_id)?;
    Ok(transaction)
}

/// POST /transactions
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    payload: Result<Json<TransactionCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    current_user.require_role(Role::Owner)?;
    let Json(payload) = payload?;

    let customer_name = require_text(payload.customer_name, "customerName", MAX_NAME_LEN)?;
    let date = require_text(payload.date, "date", MAX_SHORT_TEXT_LEN)?;
    let time = require_text(payload.time, "time", MAX_SHORT_TEXT_LEN)?;
    let amount = validate_amount(require(payload.amount, "amount")?, "amount")?;
    let payment_type = require(payload.payment_type, "paymentType")?;
    validate_optional_text(&payload.details, "details", MAX_NOTE_LEN)?;

    let transaction = Transaction {
        id: new_id(),
        transaction_id: new_code("TXN"),
        customer_name,
        date,
        time,
        amount,
        payment_type,
        details: payload.details.filter(|d| !d.trim().is_empty()),
        owner_id: current_user.id.clone(),
        created_at: now_millis(),
    };
    TransactionRepository::new(state.storage.clone()).create(&transaction)?;

    tracing::info!(
        transaction_id = %transaction.transaction_id,
        owner_id = %transaction.owner_id,
        "Transaction recorded"
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /transactions - 当前店主的交易 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Transaction>>> {
    current_user.require_role(Role::Owner)?;
    let transactions =
        TransactionRepository::new(state.storage.clone()).find_by_owner(&current_user.id)?;
    Ok(Json(transactions))
}

/// GET /transactions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Transaction>> {
    let repo = TransactionRepository::new(state.storage.clone());
    Ok(Json(load_owned(&repo, &current_user, &id)?))
}

/// PUT /transactions/{id} - `transactionId` and `ownerId` never change
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> AppResult<Json<Transaction>> {
    let repo = TransactionRepository::new(state.storage.clone());
    let mut transaction = load_owned(&repo, &current_user, &id)?;
    let Json(patch) = payload?;

    if let Some(customer_name) = patch.customer_name {
        transaction.customer_name = require_text(Some(customer_name), "customerName", MAX_NAME_LEN)?;
    }
    if let Some(date) = patch.date {
        transaction.date = require_text(Some(date), "date", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(time) = patch.time {
        transaction.time = require_text(Some(time), "time", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(amount) = patch.amount {
        transaction.amount = validate_amount(amount, "amount")?;
    }
    if let Some(payment_type) = patch.payment_type {
        transaction.payment_type = payment_type;
    }
    if let Some(details) = patch.details {
        validate_optional_text(&Some(details.clone()), "details", MAX_NOTE_LEN)?;
        transaction.details = Some(details).filter(|d| !d.trim().is_empty());
    }

    repo.save(&transaction)?;
    tracing::info!(transaction_id = %transaction.transaction_id, "Transaction updated");
    Ok(Json(transaction))
}

/// DELETE /transactions/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = TransactionRepository::new(state.storage.clone());
    let transaction = load_owned(&repo, &current_user, &id)?;
    repo.delete(&transaction)?;

    tracing::info!(transaction_id = %transaction.transaction_id, "Transaction deleted");
    Ok(ok_with_message(true, "Transaction deleted"))
}
