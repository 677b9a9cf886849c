use serde::Serialize;

/// Outcome of validating a field or a whole record
///
/// Serializes as `{ "valid": bool, "errors": [string] }`. A verdict is valid
/// exactly when it carries no messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    valid: bool,
    errors: Vec<String>,
}

impl ValidationVerdict {
    /// Passing verdict
    #[must_use]
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Failing verdict with one message
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![message.into()],
        }
    }

    /// Valid when `errors` is empty
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Append the messages of `other`
    pub fn merge(&mut self, other: ValidationVerdict) {
        self.errors.extend(other.errors);
        self.valid = self.errors.is_empty();
    }
}

impl Default for ValidationVerdict {
    fn default() -> Self {
        Self::valid()
    }
}

impl FromIterator<ValidationVerdict> for ValidationVerdict {
    fn from_iter<I: IntoIterator<Item = ValidationVerdict>>(iter: I) -> Self {
        iter.into_iter().fold(Self::valid(), |mut acc, verdict| {
            acc.merge(verdict);
            acc
        })
    }
}
