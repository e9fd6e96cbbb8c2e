//! Payload validation helpers
//!
//! Bridges `validator` derive output into [`AppError`] compatible messages.

use validator::ValidationErrors;

/// Flatten validator errors into a single human-readable message
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            let detail = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            parts.push(format!("{}: {}", field, detail));
        }
    }
    if parts.is_empty() {
        "Invalid input".to_string()
    } else {
        parts.join("; ")
    }
}

/// Reject NaN/Infinity and non-positive monetary amounts
pub fn is_positive_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Reject NaN/Infinity and negative monetary amounts (zero allowed)
pub fn is_non_negative_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_guards() {
        assert!(is_positive_amount(150.0));
        assert!(!is_positive_amount(0.0));
        assert!(!is_positive_amount(-1.0));
        assert!(!is_positive_amount(f64::NAN));
        assert!(!is_positive_amount(f64::INFINITY));

        assert!(is_non_negative_amount(0.0));
        assert!(is_non_negative_amount(10.0));
        assert!(!is_non_negative_amount(-0.01));
        assert!(!is_non_negative_amount(f64::NAN));
    }
}
