// Utilitários para manipulação de valores monetários

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Major units to minor units: multiply by 100 and truncate toward zero.
/// Negative or out-of-range amounts yield `None`.
pub fn to_minor_units(amount: Decimal) -> Option<u64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return None;
    }
    amount.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_u64()
}

pub fn format_minor_units(amount: u64) -> String {
    format!("{}.{:02}", amount / 100, amount % 100)
}
