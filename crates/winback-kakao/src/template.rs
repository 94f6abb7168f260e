// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alimtalk message rendering. The full text mirrors the approved template
//! registered with the provider; variables are sent alongside so the
//! provider can re-render server-side.

use winback_core::types::{format_amount, NotificationRequest};

/// Render the full installment-incentive notification body.
pub fn notification_text(request: &NotificationRequest) -> String {
    format!(
        "[장바구니 안내]\n\n{name}님, 장바구니에 담아두신 상품이 있습니다.\n\n\
         📦 상품: {product}\n💰 주문 금액: {total}원\n\n\
         💳 결제 옵션 안내\n월 {monthly}원씩 최대 12개월 분할 결제가 가능합니다.\n\
         (무이자 할부 적용)\n\n결제를 진행하시려면 아래 링크를 클릭해주세요.",
        name = request.customer_name,
        product = request.product_name,
        total = format_amount(request.total_amount),
        monthly = format_amount(request.monthly_payment),
    )
}

/// Payment link the notification deep-links to.
pub fn payment_link(app_url: &str, cart_id: Option<i64>) -> String {
    match cart_id {
        Some(id) => format!("{app_url}/payment?cart_id={id}"),
        None => format!("{app_url}/payment?cart_id="),
    }
}
