use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?$").expect("duration pattern")
});

/// Parses durations written like `1h 30m`, `45s` or `2h5m10s`.
pub fn duration_from_str(s: &str) -> Result<Duration> {
    let s = s.trim();

    let capture = match DURATION_PATTERN.captures(s) {
        Some(capture) if !s.is_empty() => capture,
        _ => {
            return Err(Error::Config(format!(
                "'{}' is not a duration (expected e.g. '1h 30m', '45s')",
                s
            )))
        }
    };

    let mut secs = 0u64;
    for (group, factor) in [(1, 3600u64), (2, 60), (3, 1)] {
        if let Some(m) = capture.get(group) {
            let value: u64 = m
                .as_str()
                .parse()
                .map_err(|e| Error::Config(format!("'{}': {}", s, e)))?;
            secs = value
                .checked_mul(factor)
                .and_then(|v| secs.checked_add(v))
                .ok_or_else(|| Error::Config(format!("'{}' overflows", s)))?;
        }
    }

    Ok(Duration::from_secs(secs))
}

/// Inverse of [`duration_from_str`], used when printing the effective config.
pub fn duration_to_string(d: &Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);

    let mut parts = Vec::new();
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if m > 0 {
        parts.push(format!("{}m", m));
    }
    if s > 0 || parts.is_empty() {
        parts.push(format!("{}s", s));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::duration::{duration_from_str, duration_to_string};

    #[test]
    fn parses_units() {
        let cases = Vec::from([
            ("45s", Duration::from_secs(45)),
            ("5m", Duration::from_secs(300)),
            ("1h", Duration::from_secs(3600)),
            ("1h 30m", Duration::from_secs(5400)),
            ("2h5m10s", Duration::from_secs(7510)),
            (" 10m ", Duration::from_secs(600)),
        ]);

        for (input, expected) in cases {
            assert_eq!(duration_from_str(input).unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "5", "1d", "m5", "30s 1h", "-5s"] {
            assert!(duration_from_str(input).is_err(), "{}", input);
        }
    }

    #[test]
    fn prints_back() {
        let cases = Vec::from([
            (Duration::from_secs(0), "0s"),
            (Duration::from_secs(45), "45s"),
            (Duration::from_secs(5400), "1h 30m"),
            (Duration::from_secs(7510), "2h 5m 10s"),
        ]);

        for (input, expected) in cases {
            assert_eq!(duration_to_string(&input), expected);
            assert_eq!(duration_from_str(expected).unwrap(), input);
        }
    }
}
