//! KRW money formatting for the report views.

const EOK: f64 = 1e8;
const MAN: f64 = 1e4;

/// Rounds half up, the way the browser views have always rounded amounts.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Inserts `,` every three digits of a non-negative whole number.
fn group_digits(whole: f64) -> String {
    let digits = format!("{whole:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn sign_of(rounded: f64) -> &'static str {
    if rounded < 0.0 { "-" } else { "" }
}

/// `1234567.4` -> `1,234,567원`.
pub fn format_full(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = round_half_up(value);
    format!("{}{}원", sign_of(rounded), group_digits(rounded.abs()))
}

/// Like [`format_full`] with an explicit `+` on gains.
pub fn format_signed_full(value: f64) -> String {
    let formatted = format_full(value);
    if value.is_finite() && round_half_up(value) >= 0.0 {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// Compact form using 억 (10^8) and 만 (10^4) units, e.g. `2억 2791만`.
pub fn format_short(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs >= EOK {
        let mut eok = (abs / EOK).floor();
        let mut man = round_half_up((abs % EOK) / MAN);
        if man >= MAN {
            eok += 1.0;
            man = 0.0;
        }
        let eok = group_digits(eok);
        if man > 0.0 {
            return format!("{sign}{eok}억 {man:.0}만");
        }
        return format!("{sign}{eok}억");
    }

    if abs >= MAN {
        return format!("{sign}{}만원", group_digits(round_half_up(abs / MAN)));
    }

    let rounded = round_half_up(abs);
    if rounded == 0.0 {
        return "0원".to_string();
    }
    format!("{sign}{}원", group_digits(rounded))
}

/// Short form with an explicit `+` on gains.
pub fn format_signed_short(value: f64) -> String {
    if value.is_finite() && value >= 0.0 {
        format!("+{}", format_short(value))
    } else {
        format_short(value)
    }
}

/// Percentage as typed by the user: `5` -> `5%`, `2.5` -> `2.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{value}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_full_groups_thousands_and_rounds() {
        assert_eq!(format_full(0.0), "0원");
        assert_eq!(format_full(999.4), "999원");
        assert_eq!(format_full(999.5), "1,000원");
        assert_eq!(format_full(1_234_567.0), "1,234,567원");
        assert_eq!(format_full(-1_234_567.0), "-1,234,567원");
        assert_eq!(format_full(12_000_000_000.0), "12,000,000,000원");
    }

    #[test]
    fn format_signed_full_marks_gains() {
        assert_eq!(format_signed_full(1_500.0), "+1,500원");
        assert_eq!(format_signed_full(0.0), "+0원");
        assert_eq!(format_signed_full(-1_500.0), "-1,500원");
    }

    #[test]
    fn format_short_uses_eok_and_man_units() {
        assert_eq!(format_short(123.0), "123원");
        assert_eq!(format_short(12_345.0), "1만원");
        assert_eq!(format_short(1_000_000.0), "100만원");
        assert_eq!(format_short(12_345_678.0), "1,235만원");
        assert_eq!(format_short(100_000_000.0), "1억");
        assert_eq!(format_short(227_905_100.0), "2억 2791만");
        assert_eq!(format_short(-150_000_000.0), "-1억 5000만");
    }

    #[test]
    fn format_short_carries_man_overflow_into_eok() {
        assert_eq!(format_short(199_999_999.0), "2억");
    }

    #[test]
    fn format_short_handles_non_finite() {
        assert_eq!(format_short(f64::NAN), "-");
        assert_eq!(format_full(f64::INFINITY), "-");
    }

    #[test]
    fn format_percent_keeps_user_precision() {
        assert_eq!(format_percent(5.0), "5%");
        assert_eq!(format_percent(2.5), "2.5%");
    }
}
