//! Filter for first-party Hue hardware.
//!
//! Genuine Hue fixtures already speak the accessory protocol natively,
//! so they are excluded from translation. Their model ids follow a fixed
//! naming scheme: three uppercase letters followed by three digits.

use regex::Regex;

/// Matcher for first-party model ids, compiled once and reused.
///
/// # Examples
///
/// ```
/// use huelink::NativeModelMatcher;
///
/// let matcher = NativeModelMatcher::new();
/// assert!(matcher.is_native("LTW012"));
/// assert!(!matcher.is_native("Plug"));
/// ```
#[derive(Debug, Clone)]
pub struct NativeModelMatcher {
    pattern: Regex,
}

impl NativeModelMatcher {
    /// Compile the model id pattern.
    pub fn new() -> Self {
        NativeModelMatcher {
            // The pattern is a literal and always compiles.
            pattern: Regex::new(r"^[A-Z]{3}[0-9]{3}$").expect("model id pattern"),
        }
    }

    /// Check whether `model_id` names a first-party Hue product.
    pub fn is_native(&self, model_id: &str) -> bool {
        self.pattern.is_match(model_id)
    }
}

impl Default for NativeModelMatcher {
    fn default() -> Self {
        Self::new()
    }
}
