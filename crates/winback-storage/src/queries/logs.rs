// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification log operations. The table is append-only.

use rusqlite::{params, OptionalExtension};
use winback_core::WinbackError;

use crate::database::Database;
use crate::models::{DeliveryStatus, NewNotificationLog, NotificationLog, SendHistory};

fn row_to_log(row: &rusqlite::Row<'_>) -> Result<NotificationLog, rusqlite::Error> {
    let status: String = row.get(5)?;
    let status = status.parse::<DeliveryStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(NotificationLog {
        id: row.get(0)?,
        abandoned_cart_id: row.get(1)?,
        phone: row.get(2)?,
        message: row.get(3)?,
        message_id: row.get(4)?,
        status,
        error_message: row.get(6)?,
        sent_at: row.get(7)?,
    })
}

/// Append one notification log row. Returns the auto-generated log id.
///
/// `sent_at` defaults to now unless the log carries an explicit timestamp
/// (imported demo rows).
pub async fn append_log(db: &Database, log: &NewNotificationLog) -> Result<i64, WinbackError> {
    let log = log.clone();
    db.connection()
        .call(move |conn| {
            match &log.sent_at {
                Some(sent_at) => conn.execute(
                    "INSERT INTO notification_logs
                     (abandoned_cart_id, customer_phone, message, message_id, status,
                      error_message, sent_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        log.abandoned_cart_id,
                        log.phone,
                        log.message,
                        log.message_id,
                        log.status.to_string(),
                        log.error_message,
                        sent_at,
                    ],
                )?,
                None => conn.execute(
                    "INSERT INTO notification_logs
                     (abandoned_cart_id, customer_phone, message, message_id, status,
                      error_message)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        log.abandoned_cart_id,
                        log.phone,
                        log.message,
                        log.message_id,
                        log.status.to_string(),
                        log.error_message,
                    ],
                )?,
            };
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a log row by id.
pub async fn get_log(db: &Database, id: i64) -> Result<Option<NotificationLog>, WinbackError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, abandoned_cart_id, customer_phone, message, message_id,
                        status, error_message, sent_at
                 FROM notification_logs WHERE id = ?1",
            )?;
            let log = stmt.query_row(params![id], row_to_log).optional()?;
            Ok(log)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count log rows, optionally restricted to one delivery status.
pub async fn count_logs(
    db: &Database,
    status: Option<DeliveryStatus>,
) -> Result<i64, WinbackError> {
    let status = status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let count = match &status {
                Some(wanted) => conn.query_row(
                    "SELECT COUNT(*) FROM notification_logs WHERE status = ?1",
                    params![wanted],
                    |row| row.get(0),
                )?,
                None => conn.query_row("SELECT COUNT(*) FROM notification_logs", [], |row| {
                    row.get(0)
                })?,
            };
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Send history for a (phone, product) pair, joined through the owning cart:
/// timestamp of the most recent log row and count of rows with status `sent`.
pub async fn send_history(
    db: &Database,
    phone: &str,
    product: &str,
) -> Result<SendHistory, WinbackError> {
    let phone = phone.to_string();
    let product = product.to_string();
    db.connection()
        .call(move |conn| {
            let last_sent_at: Option<String> = conn
                .query_row(
                    "SELECT nl.sent_at
                     FROM notification_logs nl
                     JOIN abandoned_carts ac ON nl.abandoned_cart_id = ac.id
                     WHERE ac.customer_phone = ?1 AND ac.product_name = ?2
                     ORDER BY nl.sent_at DESC
                     LIMIT 1",
                    params![phone, product],
                    |row| row.get(0),
                )
                .optional()?;

            let sent_count: i64 = conn.query_row(
                "SELECT COUNT(*)
                 FROM notification_logs nl
                 JOIN abandoned_carts ac ON nl.abandoned_cart_id = ac.id
                 WHERE ac.customer_phone = ?1 AND ac.product_name = ?2
                   AND nl.status = 'sent'",
                params![phone, product],
                |row| row.get(0),
            )?;

            Ok(SendHistory {
                last_sent_at,
                sent_count,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}
