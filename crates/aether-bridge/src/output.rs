//! Model output protocol.
//!
//! The model writes one density value to stdout. Three encodings are
//! accepted:
//!
//! - a bare float literal (`1.225`, `3.2e-12`), the original contract
//! - a single `density=<float>` line
//! - a JSON number or an object with a numeric `density` field
//!
//! Surrounding whitespace is ignored. Anything else is malformed.

use crate::error::{BridgeError, BridgeResult};

/// Maximum number of characters of offending output kept in errors.
const MAX_ERROR_OUTPUT_CHARS: usize = 200;

/// Parse the model's stdout into a density in kg/m³.
///
/// # Errors
///
/// Returns [`BridgeError::EmptyOutput`] for empty or whitespace-only output
/// and [`BridgeError::MalformedNumericOutput`] for anything that is not one
/// of the accepted encodings.
pub fn parse_density_output(stdout: &str) -> BridgeResult<f64> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(BridgeError::EmptyOutput);
    }

    parse_plain(trimmed)
        .or_else(|| parse_key_value(trimmed))
        .or_else(|| parse_json(trimmed))
        .ok_or_else(|| BridgeError::MalformedNumericOutput {
            output: truncate(trimmed),
        })
}

fn parse_plain(s: &str) -> Option<f64> {
    // Rust also accepts "inf"/"nan"; the model never emits those as data.
    if s.chars().any(char::is_alphabetic) && !is_exponent_literal(s) {
        return None;
    }
    // `1e999` parses to infinity.
    s.parse().ok().filter(|v: &f64| v.is_finite())
}

/// `1e-12` parses as a float but contains a letter.
fn is_exponent_literal(s: &str) -> bool {
    s.chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c == 'e' || c == 'E')
}

fn parse_key_value(s: &str) -> Option<f64> {
    let (key, value) = s.split_once('=')?;
    if key.trim() != "density" {
        return None;
    }
    parse_plain(value.trim())
}

fn parse_json(s: &str) -> Option<f64> {
    match serde_json::from_str::<serde_json::Value>(s).ok()? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::Object(map) => map.get("density")?.as_f64(),
        _ => None,
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_ERROR_OUTPUT_CHARS {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(MAX_ERROR_OUTPUT_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_float() {
        assert_eq!(parse_density_output("1.225").unwrap(), 1.225);
        assert_eq!(parse_density_output("1.225\n").unwrap(), 1.225);
        assert_eq!(parse_density_output("  3.2e-12\r\n").unwrap(), 3.2e-12);
        assert_eq!(parse_density_output("4E-13").unwrap(), 4e-13);
    }

    #[test]
    fn test_key_value() {
        assert_eq!(parse_density_output("density=2.5e-12\n").unwrap(), 2.5e-12);
        assert_eq!(parse_density_output("density = 7").unwrap(), 7.0);
        assert!(parse_density_output("rho=1.0").is_err());
    }

    #[test]
    fn test_json() {
        assert_eq!(parse_density_output("1.2e-12").unwrap(), 1.2e-12);
        assert_eq!(
            parse_density_output(r#"{"density": 1.2e-12}"#).unwrap(),
            1.2e-12
        );
        assert!(matches!(
            parse_density_output(r#"{"rho": 1.0}"#),
            Err(BridgeError::MalformedNumericOutput { .. })
        ));
        assert!(parse_density_output(r#"{"density": "1.0"}"#).is_err());
    }

    #[test]
    fn test_empty_output() {
        assert!(matches!(parse_density_output(""), Err(BridgeError::EmptyOutput)));
        assert!(matches!(
            parse_density_output(" \n\t "),
            Err(BridgeError::EmptyOutput)
        ));
    }

    #[test]
    fn test_malformed_output() {
        let err = parse_density_output("abc").unwrap_err();
        match err {
            BridgeError::MalformedNumericOutput { output } => assert_eq!(output, "abc"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_data_rejected() {
        assert!(parse_density_output("1.225 kg/m3").is_err());
        assert!(parse_density_output("1.225\n1.3").is_err());
        assert!(parse_density_output("inf").is_err());
        assert!(parse_density_output("NaN").is_err());
    }

    #[test]
    fn test_overflowing_literal_rejected() {
        for out in ["1e999", "-1e400", "density=1e999", "density = -1E400"] {
            assert!(
                matches!(
                    parse_density_output(out),
                    Err(BridgeError::MalformedNumericOutput { .. })
                ),
                "{out} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_output_truncated() {
        let noisy = "x".repeat(1_000);
        match parse_density_output(&noisy).unwrap_err() {
            BridgeError::MalformedNumericOutput { output } => {
                assert!(output.starts_with(&"x".repeat(MAX_ERROR_OUTPUT_CHARS)));
                assert_eq!(output.len(), 203);
                assert!(output.ends_with("..."));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
