//! Decimal rendering for fit annotations.
//!
//! Values are first rounded to six significant digits (as `%g` does), then
//! quantized to the decimal exponent of a two-significant-digit reference and
//! printed in decimal notation: plain digits for non-positive exponents,
//! `d.dddE+n` otherwise.

/// Largest coefficient rendered exactly; beyond this the value is printed as is.
const MAX_DIGITS: usize = 28;

/// Split `{:.Ne}` output into (digits, exponent of the first digit).
fn scientific(value: f64, precision: usize) -> Option<(String, i32)> {
    let text = format!("{:.*e}", precision, value.abs());
    let (mantissa, exponent) = text.split_once('e')?;
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    Some((digits, exponent.parse().ok()?))
}

/// Decimal exponent of `q` printed with two significant digits in `%g` style.
///
/// `0.012 -> -3`, `1.5 -> -1`, `10 -> 0`, `120 -> 1`, `1000 -> 3`.
/// Non-finite references give `None`.
pub fn reference_exponent(q: f64) -> Option<i32> {
    if !q.is_finite() {
        return None;
    }
    let (digits, x) = scientific(q, 1)?;
    let trailing_zero = digits.ends_with('0');
    if (-4..2).contains(&x) {
        let decimals = 1 - x;
        Some(if trailing_zero && decimals > 0 {
            -(decimals - 1)
        } else {
            -decimals
        })
    } else if trailing_zero {
        Some(x)
    } else {
        Some(x - 1)
    }
}

/// Render `coefficient * 10^exponent` the way a decimal type prints it.
fn render(negative: bool, coefficient: u128, exponent: i32) -> String {
    let digits = coefficient.to_string();
    let sign = if negative { "-" } else { "" };
    let adjusted = exponent + digits.len() as i32 - 1;

    if exponent <= 0 && adjusted >= -6 {
        let scale = (-exponent) as usize;
        if scale == 0 {
            format!("{}{}", sign, digits)
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            format!("{}{}.{}", sign, int, frac)
        } else {
            format!("{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    } else {
        let (first, rest) = digits.split_at(1);
        let dot = if rest.is_empty() { "" } else { "." };
        let exp_sign = if adjusted >= 0 { "+" } else { "-" };
        format!(
            "{}{}{}{}E{}{}",
            sign,
            first,
            dot,
            rest,
            exp_sign,
            adjusted.abs()
        )
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

/// Round `value` to six significant digits, then to a multiple of
/// `10^exponent` with round-half-even.
pub fn quantize(value: f64, exponent: Option<i32>) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let Some(exponent) = exponent else {
        return "NaN".to_string();
    };
    let Some((digits, x)) = scientific(value, 5) else {
        return value.to_string();
    };
    // value = digits * 10^(x - 5)
    let value_exponent = x - 5;
    let Ok(mut coefficient) = digits.parse::<u128>() else {
        return value.to_string();
    };
    let shift = exponent - value_exponent;

    if shift <= 0 {
        let scale = (-shift) as u32;
        if digits.len() + scale as usize > MAX_DIGITS {
            return value.to_string();
        }
        coefficient *= 10u128.pow(scale);
    } else if shift as usize > digits.len() {
        coefficient = 0;
    } else {
        let divisor = 10u128.pow(shift as u32);
        let quotient = coefficient / divisor;
        let remainder = coefficient % divisor;
        let half = divisor / 2;
        coefficient = if remainder > half || (remainder == half && quotient % 2 == 1) {
            quotient + 1
        } else {
            quotient
        };
    }

    render(value.is_sign_negative(), coefficient, exponent)
}

/// One annotation label: `$<name>(<peak>)$=<value> $\pm$ <error>`, with both
/// numbers right-aligned in eight columns.
pub fn annotation(short_name: &str, peak: usize, value: f64, error: f64) -> String {
    let reference = value.abs().min(error.abs());
    format!(
        "${}({})$={:>8} $\\pm$ {:>8}",
        short_name,
        peak,
        quantize(value, reference_exponent(reference)),
        quantize(error, reference_exponent(error.abs()))
    )
}
