//! Result type alias for RRA

use super::errors::RraError;

/// Result type alias for RRA operations
///
/// # Examples
///
/// ```
/// use rra::domain::result::Result;
/// use rra::domain::errors::RraError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RraError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RraError>;
