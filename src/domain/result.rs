//! Result type alias for Medcart

use super::errors::MedcartError;

/// Result type alias for Medcart operations
///
/// # Examples
///
/// ```
/// use medcart::domain::result::Result;
/// use medcart::domain::errors::MedcartError;
///
/// fn failing_function() -> Result<()> {
///     Err(MedcartError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MedcartError>;
