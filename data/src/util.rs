/// Inserts `,` between groups of three digits of an integer string.
pub fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}")
}

/// en-US style number: rounded to `max_frac` decimals, trailing zeros trimmed
/// down to `min_frac`, thousands grouped.
pub fn format_grouped(value: f64, min_frac: usize, max_frac: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.*}", max_frac, value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac {
        frac.push('0');
    }

    let int_part = if int_part == "-0" && frac.chars().all(|c| c == '0') {
        "0"
    } else {
        int_part
    };

    if frac.is_empty() {
        group_thousands(int_part)
    } else {
        format!("{}.{}", group_thousands(int_part), frac)
    }
}

/// Price labels: more decimals the smaller the price.
pub fn format_price(price: f64) -> String {
    if price >= 1000.0 {
        format_grouped(price, 2, 2)
    } else if price >= 1.0 {
        format_grouped(price, 2, 4)
    } else {
        format_grouped(price, 4, 8)
    }
}

pub fn format_volume(volume: f64) -> String {
    if volume >= 1e6 {
        format!("{:.1}M", volume / 1e6)
    } else if volume >= 1e3 {
        format!("{:.1}K", volume / 1e3)
    } else {
        format!("{volume:.0}")
    }
}

/// Compact bar chart numbers: `1.2K`, `3.4M`, `5.6B`, plain below a thousand.
pub fn abbr_large_numbers(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        trim_decimals(&format!("{value:.2}"))
    }
}

/// Box plot axis labels: `$1.5k`, `$12`, `$0.25`.
pub fn format_currency_tick(value: f64) -> String {
    if value >= 1000.0 {
        format!("${:.1}k", value / 1000.0)
    } else if value >= 1.0 {
        format!("${value:.0}")
    } else {
        format!("${value:.2}")
    }
}

/// Plain number the way a tooltip shows it, integers without a fraction.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        group_thousands(&format!("{value:.0}"))
    } else {
        format_grouped(value, 0, 4)
    }
}

fn trim_decimals(text: &str) -> String {
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        text.to_string()
    }
}
