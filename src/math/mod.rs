//! Arithmetic detection and evaluation for the calculator route.

mod parser;

pub use parser::{MathError, evaluate};

/// True iff the trimmed input is non-empty and made entirely of digits,
/// whitespace, and `+ - * / . ( )`. A full-string property: one stray
/// letter anywhere disqualifies the whole input.
pub fn is_expression(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && trimmed.chars().all(|c| {
            c.is_ascii_digit()
                || c.is_whitespace()
                || matches!(c, '+' | '-' | '*' | '/' | '.' | '(' | ')')
        })
}

/// Evaluates `expression` and renders the outcome as a user-facing line.
/// Always returns a string; faults become descriptions, never panics.
pub fn verdict(expression: &str) -> String {
    match evaluate(expression) {
        Ok(value) => format!("The result is: {}", format_number(value)),
        Err(e) => format!("Error evaluating expression: {e}"),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
