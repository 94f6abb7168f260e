// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo data seeder: fills the record store with a realistic 30/50/20 mix
//! of converted, notified, and still-pending carts.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::{Rng, SeedableRng};
use tracing::info;

use winback_core::types::{
    format_amount, format_timestamp, monthly_payment, CartRecord, CartStatus, DeliveryStatus,
    NewConversion, NewNotificationLog, DEFAULT_INSTALLMENT_MONTHS, PAYMENT_METHOD_INSTALLMENT,
};
use winback_core::{RecordStore, WinbackError};

const SAMPLE_NAMES: &[&str] = &[
    "김철수", "이영희", "박민수", "최지영", "정수진", "한동훈", "오세영", "윤미래",
];

const SAMPLE_PRODUCTS: &[&str] = &[
    "의류", "신발", "가방", "액세서리", "화장품", "생활용품", "전자제품", "도서",
];

const CONVERTED_COUNT: usize = 30;
const NOTIFIED_COUNT: usize = 50;
const PENDING_COUNT: usize = 20;

/// Counts of what the seeder wrote, by final status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SeedBreakdown {
    pub total_created: usize,
    pub purchased: usize,
    pub notified: usize,
    pub pending: usize,
}

fn random_phone(rng: &mut impl Rng) -> String {
    format!(
        "010-{:04}-{:04}",
        rng.gen_range(0..10_000),
        rng.gen_range(0..10_000)
    )
}

fn random_cart(rng: &mut impl Rng, status: CartStatus, hours_ago: i64) -> CartRecord {
    let total_amount = rng.gen_range(50_000..250_000);
    let at = format_timestamp(Utc::now() - Duration::hours(hours_ago));
    CartRecord {
        id: 0,
        customer_name: SAMPLE_NAMES[rng.gen_range(0..SAMPLE_NAMES.len())].to_string(),
        customer_phone: random_phone(rng),
        product_name: SAMPLE_PRODUCTS[rng.gen_range(0..SAMPLE_PRODUCTS.len())].to_string(),
        total_amount,
        monthly_payment: monthly_payment(total_amount, DEFAULT_INSTALLMENT_MONTHS),
        installment_months: DEFAULT_INSTALLMENT_MONTHS,
        added_at: at.clone(),
        notified_at: (status == CartStatus::Notified).then(|| at.clone()),
        purchased_at: (status == CartStatus::Converted).then(|| at.clone()),
        status,
    }
}

/// Populate the store with 100 demo carts: 30 converted (with conversion
/// records), 50 notified (with sent log rows), 20 pending. Timestamps are
/// backdated so the dashboard shows a week of plausible history.
pub async fn seed_demo_data(store: &Arc<dyn RecordStore>) -> Result<SeedBreakdown, WinbackError> {
    // StdRng is Send, unlike ThreadRng; the rng is held across await points.
    let mut rng = rand::rngs::StdRng::from_entropy();
    let batch_millis = Utc::now().timestamp_millis();
    let mut total_created = 0;

    for i in 0..CONVERTED_COUNT {
        let hours_ago = rng.gen_range(1..=168);
        let cart = random_cart(&mut rng, CartStatus::Converted, hours_ago);
        let cart_id = store.import_cart(&cart).await?;
        store
            .append_conversion(&NewConversion {
                abandoned_cart_id: Some(cart_id),
                order_id: Some(format!("ORDER_{batch_millis}_{i}")),
                payment_method: PAYMENT_METHOD_INSTALLMENT.to_string(),
                amount: cart.total_amount,
                installment_months: DEFAULT_INSTALLMENT_MONTHS,
                converted_at: Some(cart.added_at.clone()),
            })
            .await?;
        total_created += 1;
    }

    for i in 0..NOTIFIED_COUNT {
        let hours_ago = rng.gen_range(1..=72);
        let cart = random_cart(&mut rng, CartStatus::Notified, hours_ago);
        let cart_id = store.import_cart(&cart).await?;
        store
            .append_log(&NewNotificationLog {
                abandoned_cart_id: Some(cart_id),
                message_id: Some(format!("MSG_{batch_millis}_{i}")),
                phone: cart.customer_phone.clone(),
                message: format!(
                    "🎉 특별 혜택 알림 - 월 {}원으로 시작하는 특별 분할 결제 이벤트",
                    format_amount(cart.monthly_payment)
                ),
                status: DeliveryStatus::Sent,
                error_message: None,
                sent_at: Some(cart.added_at.clone()),
            })
            .await?;
        total_created += 1;
    }

    for _ in 0..PENDING_COUNT {
        let hours_ago = rng.gen_range(1..=24);
        let cart = random_cart(&mut rng, CartStatus::Pending, hours_ago);
        store.import_cart(&cart).await?;
        total_created += 1;
    }

    info!(total_created, "demo data seeded");
    Ok(SeedBreakdown {
        total_created,
        purchased: CONVERTED_COUNT,
        notified: NOTIFIED_COUNT,
        pending: PENDING_COUNT,
    })
}
