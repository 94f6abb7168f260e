// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cart record operations.

use rusqlite::{params, OptionalExtension};
use winback_core::WinbackError;

use crate::database::Database;
use crate::models::{CartRecord, CartStatus, NewCart};

/// Map one `abandoned_carts` row to a [`CartRecord`].
fn row_to_cart(row: &rusqlite::Row<'_>) -> Result<CartRecord, rusqlite::Error> {
    let status: String = row.get(10)?;
    let status = status.parse::<CartStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(10, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(CartRecord {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        customer_phone: row.get(2)?,
        product_name: row.get(3)?,
        total_amount: row.get(4)?,
        monthly_payment: row.get(5)?,
        installment_months: row.get(6)?,
        added_at: row.get(7)?,
        notified_at: row.get(8)?,
        purchased_at: row.get(9)?,
        status,
    })
}

/// Insert a new cart record with status `pending` and `added_at` = now.
/// Returns the auto-generated cart id.
pub async fn create_cart(db: &Database, cart: &NewCart) -> Result<i64, WinbackError> {
    let cart = cart.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO abandoned_carts
                 (customer_name, customer_phone, product_name, total_amount,
                  monthly_payment, installment_months)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    cart.customer_name,
                    cart.customer_phone,
                    cart.product_name,
                    cart.total_amount,
                    cart.monthly_payment,
                    cart.installment_months,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a fully specified cart record (status and timestamps included).
/// The record's `id` is ignored; the assigned id is returned.
///
/// Only demo seeding goes through this path.
pub async fn import_cart(db: &Database, record: &CartRecord) -> Result<i64, WinbackError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO abandoned_carts
                 (customer_name, customer_phone, product_name, total_amount,
                  monthly_payment, installment_months, added_at, notified_at,
                  purchased_at, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.customer_name,
                    record.customer_phone,
                    record.product_name,
                    record.total_amount,
                    record.monthly_payment,
                    record.installment_months,
                    record.added_at,
                    record.notified_at,
                    record.purchased_at,
                    record.status.to_string(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a cart record by id.
pub async fn get_cart(db: &Database, id: i64) -> Result<Option<CartRecord>, WinbackError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, customer_name, customer_phone, product_name, total_amount,
                        monthly_payment, installment_months, added_at, notified_at,
                        purchased_at, status
                 FROM abandoned_carts WHERE id = ?1",
            )?;
            let cart = stmt.query_row(params![id], row_to_cart).optional()?;
            Ok(cart)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Dedup lookup: the latest (highest-id) cart for a (phone, product) pair.
pub async fn find_latest_cart(
    db: &Database,
    phone: &str,
    product: &str,
) -> Result<Option<CartRecord>, WinbackError> {
    let phone = phone.to_string();
    let product = product.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, customer_name, customer_phone, product_name, total_amount,
                        monthly_payment, installment_months, added_at, notified_at,
                        purchased_at, status
                 FROM abandoned_carts
                 WHERE customer_phone = ?1 AND product_name = ?2
                 ORDER BY id DESC
                 LIMIT 1",
            )?;
            let cart = stmt
                .query_row(params![phone, product], row_to_cart)
                .optional()?;
            Ok(cart)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set a cart's status along with the matching transition timestamp:
/// `notified_at` for `notified`, `purchased_at` for `converted`.
///
/// Returns the number of rows affected (0 for a nonexistent id).
pub async fn update_cart_status(
    db: &Database,
    id: i64,
    status: CartStatus,
) -> Result<u64, WinbackError> {
    let status_text = status.to_string();
    db.connection()
        .call(move |conn| {
            let changed = match status {
                CartStatus::Notified => conn.execute(
                    "UPDATE abandoned_carts
                     SET status = ?1, notified_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?2",
                    params![status_text, id],
                )?,
                CartStatus::Converted => conn.execute(
                    "UPDATE abandoned_carts
                     SET status = ?1, purchased_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?2",
                    params![status_text, id],
                )?,
                _ => conn.execute(
                    "UPDATE abandoned_carts SET status = ?1 WHERE id = ?2",
                    params![status_text, id],
                )?,
            };
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Refresh a cart's amount fields in place (a pending cart re-observed
/// with a different total). Returns the number of rows affected.
pub async fn update_cart_amounts(
    db: &Database,
    id: i64,
    total_amount: i64,
    monthly_payment: i64,
) -> Result<u64, WinbackError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE abandoned_carts SET total_amount = ?1, monthly_payment = ?2
                 WHERE id = ?3",
                params![total_amount, monthly_payment, id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count carts, optionally restricted to the given statuses.
///
/// An empty status slice matches nothing and counts 0.
pub async fn count_carts(
    db: &Database,
    statuses: Option<&[CartStatus]>,
) -> Result<i64, WinbackError> {
    let statuses: Option<Vec<String>> =
        statuses.map(|s| s.iter().map(|st| st.to_string()).collect());
    db.connection()
        .call(move |conn| {
            let count = match &statuses {
                Some(wanted) if wanted.is_empty() => 0,
                Some(wanted) => {
                    let placeholders = vec!["?"; wanted.len()].join(", ");
                    let sql = format!(
                        "SELECT COUNT(*) FROM abandoned_carts WHERE status IN ({placeholders})"
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    stmt.query_row(rusqlite::params_from_iter(wanted.iter()), |row| row.get(0))?
                }
                None => {
                    conn.query_row("SELECT COUNT(*) FROM abandoned_carts", [], |row| row.get(0))?
                }
            };
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
