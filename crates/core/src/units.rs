//! Fixed-point display formatting for raw on-chain amounts.
//!
//! Raw values are integers scaled by `10^decimals`. Display values show
//! exactly six decimal places, computed with integer math so amounts far
//! beyond `f64` precision still render correctly.

use alloy_primitives::U256;

/// Decimal places in every display value.
const DISPLAY_DECIMALS: u32 = 6;

/// The chain's native currency.
pub const NATIVE_SYMBOL: &str = "BNB";
pub const NATIVE_DECIMALS: u8 = 18;

/// Sentinels substituted when upstream token metadata is absent.
pub const UNKNOWN_TOKEN_NAME: &str = "Unknown Token";
pub const UNKNOWN_TOKEN_SYMBOL: &str = "UNKNOWN";

/// Formats `value / 10^decimals` to six decimal places with a unit suffix,
/// e.g. `"1.000000 BNB"`.
pub fn format_display_value(value: U256, decimals: u8, symbol: &str) -> String {
    format!("{} {}", format_units(value, decimals), symbol)
}

/// Fixed six-decimal rendering of `value / 10^decimals`.
///
/// Rounds half-up on the truncated tail. Falls back to whole-unit rendering
/// if the six-decimal scaling would overflow `U256` (values that large do
/// not occur on chain, but upstream strings are attacker-controlled).
pub fn format_units(value: U256, decimals: u8) -> String {
    let display_scale = U256::from(10u64).pow(U256::from(DISPLAY_DECIMALS));

    let Some(scale) = U256::from(10u64).checked_pow(U256::from(decimals)) else {
        // 10^decimals exceeds U256: every representable value rounds to zero.
        return "0.000000".to_string();
    };

    match value.checked_mul(display_scale) {
        Some(shifted) => {
            let scaled = (shifted + scale / U256::from(2u64)) / scale;
            let whole = scaled / display_scale;
            let frac = (scaled % display_scale).to::<u64>();
            format!("{whole}.{frac:06}")
        }
        None => format!("{}.{:06}", value / scale, 0),
    }
}
