//! Calculator tools.
//!
//! - `expression`: free-form expressions (`calculate`)
//! - `operation`: one fixed operation over two operands (`arithmetic`)

pub mod expression;
pub mod operation;

pub use expression::{CalculateParams, CalculateTool};
pub use operation::{ArithmeticParams, ArithmeticTool, Operation};

/// Format a number with `digits` significant digits, trimming trailing zeros.
///
/// Mirrors C's `%g`: scientific notation (`1e+06`) when the decimal exponent
/// is below -4 or at least `digits`, fixed notation otherwise.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);

    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
