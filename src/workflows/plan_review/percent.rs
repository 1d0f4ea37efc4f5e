use regex::Regex;
use std::sync::OnceLock;

fn leading_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("leading number pattern compiles")
    })
}

/// Reads a match percentage such as `"87.5%"`.
///
/// The first `%` is dropped and the longest leading number is taken, so `"85% (approx)"`
/// reads as 85. Returns `None` when no finite number leads the text.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let without_sign = raw.replacen('%', "", 1);
    let candidate = without_sign.trim_start();
    let number = leading_number().find(candidate)?;

    number
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
