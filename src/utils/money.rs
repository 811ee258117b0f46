use rust_decimal::{Decimal, RoundingStrategy};

/// 金额保留两位小数，0.5 进位远离零（与数据库 decimal(12,2) 一致）
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
