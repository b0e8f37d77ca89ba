//! Input checks on contract text, applied before any model call.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractTextError {
    #[error("Contract text is required")]
    Empty,

    #[error("Contract text exceeds maximum length of {max} characters")]
    TooLong { max: usize, actual: usize },
}

/// Accept text that is non-blank and at most `max_chars` characters long.
///
/// The limit counts Unicode scalar values, not bytes.
pub fn check_contract_text(text: &str, max_chars: usize) -> Result<&str, ContractTextError> {
    if text.trim().is_empty() {
        return Err(ContractTextError::Empty);
    }
    let actual = text.chars().count();
    if actual > max_chars {
        return Err(ContractTextError::TooLong {
            max: max_chars,
            actual,
        });
    }
    Ok(text)
}
