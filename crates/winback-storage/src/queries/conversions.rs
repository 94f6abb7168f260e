// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion record operations. The table is append-only.

use rusqlite::{params, OptionalExtension};
use winback_core::WinbackError;

use crate::database::Database;
use crate::models::{ConversionRecord, NewConversion};

fn row_to_conversion(row: &rusqlite::Row<'_>) -> Result<ConversionRecord, rusqlite::Error> {
    Ok(ConversionRecord {
        id: row.get(0)?,
        abandoned_cart_id: row.get(1)?,
        order_id: row.get(2)?,
        amount: row.get(3)?,
        installment_months: row.get(4)?,
        payment_method: row.get(5)?,
        converted_at: row.get(6)?,
    })
}

/// Append one conversion record. Returns the auto-generated id.
///
/// `converted_at` defaults to now unless the record carries an explicit
/// timestamp (imported demo rows).
pub async fn append_conversion(
    db: &Database,
    conversion: &NewConversion,
) -> Result<i64, WinbackError> {
    let conversion = conversion.clone();
    db.connection()
        .call(move |conn| {
            match &conversion.converted_at {
                Some(converted_at) => conn.execute(
                    "INSERT INTO conversions
                     (abandoned_cart_id, order_id, amount, installment_months,
                      payment_method, converted_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        conversion.abandoned_cart_id,
                        conversion.order_id,
                        conversion.amount,
                        conversion.installment_months,
                        conversion.payment_method,
                        converted_at,
                    ],
                )?,
                None => conn.execute(
                    "INSERT INTO conversions
                     (abandoned_cart_id, order_id, amount, installment_months, payment_method)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        conversion.abandoned_cart_id,
                        conversion.order_id,
                        conversion.amount,
                        conversion.installment_months,
                        conversion.payment_method,
                    ],
                )?,
            };
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a conversion record by id.
pub async fn get_conversion(
    db: &Database,
    id: i64,
) -> Result<Option<ConversionRecord>, WinbackError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, abandoned_cart_id, order_id, amount, installment_months,
                        payment_method, converted_at
                 FROM conversions WHERE id = ?1",
            )?;
            let conversion = stmt.query_row(params![id], row_to_conversion).optional()?;
            Ok(conversion)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count all conversion records.
pub async fn count_conversions(db: &Database) -> Result<i64, WinbackError> {
    db.connection()
        .call(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM conversions", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Sum conversion amounts over all rows; 0 for an empty table.
pub async fn sum_conversion_amounts(db: &Database) -> Result<i64, WinbackError> {
    db.connection()
        .call(|conn| {
            let total = conn.query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM conversions",
                [],
                |row| row.get(0),
            )?;
            Ok(total)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use winback_core::types::PAYMENT_METHOD_INSTALLMENT;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("conversions.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_conversion(cart_id: Option<i64>, amount: i64) -> NewConversion {
        NewConversion {
            abandoned_cart_id: cart_id,
            order_id: Some("ORDER_1724900000_0".to_string()),
            payment_method: PAYMENT_METHOD_INSTALLMENT.to_string(),
            amount,
            installment_months: 12,
            converted_at: None,
        }
    }

    #[tokio::test]
    async fn append_and_get_conversion_roundtrips() {
        let (db, _dir) = setup_db().await;

        let id = append_conversion(&db, &make_conversion(Some(7), 100_000))
            .await
            .unwrap();
        assert!(id > 0);

        let conversion = get_conversion(&db, id).await.unwrap().unwrap();
        assert_eq!(conversion.abandoned_cart_id, Some(7));
        assert_eq!(conversion.order_id.as_deref(), Some("ORDER_1724900000_0"));
        assert_eq!(conversion.payment_method, PAYMENT_METHOD_INSTALLMENT);
        assert_eq!(conversion.amount, 100_000);
        assert_eq!(conversion.installment_months, 12);
        assert!(!conversion.converted_at.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn conversion_without_cart_or_order_is_allowed() {
        let (db, _dir) = setup_db().await;

        let id = append_conversion(
            &db,
            &NewConversion {
                abandoned_cart_id: None,
                order_id: None,
                ..make_conversion(None, 50_000)
            },
        )
        .await
        .unwrap();

        let conversion = get_conversion(&db, id).await.unwrap().unwrap();
        assert!(conversion.abandoned_cart_id.is_none());
        assert!(conversion.order_id.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn explicit_converted_at_is_preserved() {
        let (db, _dir) = setup_db().await;

        let mut conversion = make_conversion(Some(1), 80_000);
        conversion.converted_at = Some("2026-08-10T12:00:00.000Z".to_string());
        let id = append_conversion(&db, &conversion).await.unwrap();

        let stored = get_conversion(&db, id).await.unwrap().unwrap();
        assert_eq!(stored.converted_at, "2026-08-10T12:00:00.000Z");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn sum_is_zero_on_empty_table() {
        let (db, _dir) = setup_db().await;
        assert_eq!(count_conversions(&db).await.unwrap(), 0);
        assert_eq!(sum_conversion_amounts(&db).await.unwrap(), 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn count_and_sum_over_multiple_rows() {
        let (db, _dir) = setup_db().await;

        append_conversion(&db, &make_conversion(Some(1), 100_000)).await.unwrap();
        append_conversion(&db, &make_conversion(Some(2), 150_000)).await.unwrap();
        append_conversion(&db, &make_conversion(None, 50_000)).await.unwrap();

        assert_eq!(count_conversions(&db).await.unwrap(), 3);
        assert_eq!(sum_conversion_amounts(&db).await.unwrap(), 300_000);

        db.close().await.unwrap();
    }
}
