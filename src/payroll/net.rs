use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to cents.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Net salary is gross minus total deduction, in cents.
///
/// A deduction larger than the gross yields a negative net; callers decide
/// whether that is acceptable.
pub fn net_salary(gross: Decimal, deduction: Decimal) -> Decimal {
    round_money(gross - deduction)
}
