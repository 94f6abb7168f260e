// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generated mock catalog: a plausible snapshot of storefront carts used
//! until the real Cafe24 Admin API integration is wired up.

use chrono::{Duration, Utc};
use rand::Rng;

use winback_core::types::{CartListing, ListingFilter, ListingPage, ListingStatus};

const SAMPLE_NAMES: &[&str] = &[
    "김철수", "이영희", "박민수", "최지영", "정수진", "한동훈", "오세영", "윤미래", "강민호",
    "송지은",
];

const SAMPLE_PRODUCTS: &[&str] = &[
    "의류", "신발", "가방", "액세서리", "화장품", "생활용품", "전자제품", "도서", "스포츠용품",
    "식품",
];

const CUSTOMER_GRADES: &[&str] = &["VIP", "GOLD", "SILVER", "BRONZE", "일반"];

const CATEGORIES: &[&str] = &["패션", "뷰티", "홈리빙", "전자제품", "식품", "도서", "스포츠"];

/// Generate a catalog of `size` carts.
///
/// Status split by index: the first 60% pending, the next 30% purchased,
/// the last 10% expired. 70% of carts carry marketing consent. Ages are
/// spread over the past week so `hours_ago` filters have data on both
/// sides of any reasonable cutoff.
pub fn generate(size: usize) -> Vec<CartListing> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    (0..size)
        .map(|i| {
            let hours_ago = rng.gen_range(1..=168);
            let status = if i < size * 6 / 10 {
                ListingStatus::Pending
            } else if i < size * 9 / 10 {
                ListingStatus::Purchased
            } else {
                ListingStatus::Expired
            };
            let purchase_history_count = rng.gen_range(0..20u32);
            let last_purchase_date = (purchase_history_count > 0)
                .then(|| now - Duration::days(rng.gen_range(0..90)));

            CartListing {
                cart_no: format!("CART_{}", 1000 + i),
                customer_name: SAMPLE_NAMES[rng.gen_range(0..SAMPLE_NAMES.len())].to_string(),
                customer_phone: format!(
                    "010-{:04}-{:04}",
                    rng.gen_range(0..10_000),
                    rng.gen_range(0..10_000)
                ),
                marketing_consent: rng.gen_bool(0.7),
                product_name: SAMPLE_PRODUCTS[rng.gen_range(0..SAMPLE_PRODUCTS.len())]
                    .to_string(),
                total_amount: rng.gen_range(50_000..250_000),
                added_at: now - Duration::hours(hours_ago),
                status,
                item_count: Some(rng.gen_range(1..=3)),
                customer_grade: Some(
                    CUSTOMER_GRADES[rng.gen_range(0..CUSTOMER_GRADES.len())].to_string(),
                ),
                purchase_history_count: Some(purchase_history_count),
                last_purchase_date,
                preferred_category: Some(
                    CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string(),
                ),
                average_order_amount: Some(rng.gen_range(50_000..200_000)),
            }
        })
        .collect()
}

/// Apply filter, newest-first sort, and pagination to a cart set.
///
/// `total` is the match count before pagination.
pub fn page(carts: Vec<CartListing>, filter: &ListingFilter) -> ListingPage {
    let now = Utc::now();
    let mut matches: Vec<CartListing> = carts
        .into_iter()
        .filter(|cart| {
            filter.status.is_none_or(|s| cart.status == s)
                && filter
                    .marketing_consent
                    .is_none_or(|c| cart.marketing_consent == c)
                && filter.min_amount.is_none_or(|m| cart.total_amount >= m)
                && filter
                    .hours_ago
                    .is_none_or(|h| cart.added_at <= now - Duration::hours(h))
        })
        .collect();

    matches.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    let total = matches.len();
    let offset = filter.offset.unwrap_or(0);
    let limit = filter.limit.unwrap_or(50);
    let items = matches.into_iter().skip(offset).take(limit).collect();

    ListingPage { items, total }
}
