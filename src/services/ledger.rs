// src/services/ledger.rs
//
// Regras puras do livro de pedidos: folio, subtotais, total e limites do mês.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{field_messages, summarize, AppError},
    models::{
        dates,
        order::{OrderItem, OrderItemInput},
    },
};

pub const FOLIO_PREFIX: &str = "PED";

/// "PED-2026-": prefixo comum a todos os folios do ano.
pub fn folio_prefix(year: i32) -> String {
    format!("{FOLIO_PREFIX}-{year}-")
}

/// "PED-2026-0007". Acima de 9999 o número simplesmente cresce.
pub fn format_folio(year: i32, sequence: i64) -> String {
    format!("{}{:04}", folio_prefix(year), sequence)
}

/// Ano e sequência de um folio bem formado.
pub fn parse_folio(folio: &str) -> Option<(i32, i64)> {
    let rest = folio.strip_prefix(FOLIO_PREFIX)?.strip_prefix('-')?;
    let (year, sequence) = rest.split_once('-')?;
    if year.len() != 4 || sequence.len() < 4 {
        return None;
    }
    Some((year.parse().ok()?, sequence.parse().ok()?))
}

/// Maior valor que cabe em `orders.total NUMERIC(14, 2)`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2); // 99_999_999_999_999 × 10⁻²

/// round(cantidad × precio, 2), meio para cima. `None` se estourar o Decimal.
pub fn subtotal(quantity: i32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn amount_too_large(what: &str) -> AppError {
    AppError::BadRequest(format!(
        "{what} supera el máximo permitido ({MAX_AMOUNT})."
    ))
}

/// Valida as linhas, calcula cada subtotal e devolve (itens, total).
pub fn price_items(inputs: &[OrderItemInput]) -> Result<(Vec<OrderItem>, Decimal), AppError> {
    if inputs.is_empty() {
        return Err(AppError::BadRequest(
            "El pedido debe tener al menos un ítem.".to_string(),
        ));
    }

    let mut items = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        input.validate().map_err(|errors| {
            let details = field_messages(&errors);
            AppError::BadRequest(format!("items[{index}]: {}", summarize(&details)))
        })?;

        let subtotal = subtotal(input.quantity, input.unit_price)
            .filter(|value| *value <= MAX_AMOUNT)
            .ok_or_else(|| amount_too_large(&format!("items[{index}]: el subtotal")))?;

        items.push(OrderItem {
            id: Uuid::new_v4(),
            description: input.description.trim().to_string(),
            quantity: input.quantity,
            unit_price: input.unit_price,
            subtotal,
        });
    }

    let total = order_total(&items)
        .filter(|value| *value <= MAX_AMOUNT)
        .ok_or_else(|| amount_too_large("El total del pedido"))?;
    Ok((items, total))
}

/// Soma dos subtotais; `None` se estourar.
pub fn order_total(items: &[OrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.subtotal))
}

/// Primeiro dia 00:00:00 até último dia 23:59:59 do mês de `now`, no fuso de `now`.
pub fn month_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let tz = now.timezone();
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1);
    let next_first = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1)
    };
    let last = next_first.and_then(|d| d.pred_opt());

    let start = first.and_then(|d| dates::start_of_day(&tz, d));
    let end = last.and_then(|d| dates::end_of_day(&tz, d));

    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(AppError::InternalServerError(anyhow::anyhow!(
            "não foi possível calcular os limites do mês para {}",
            now.naive_local()
        ))),
    }
}
