/// Control modes and the policy points where they differ.
use serde::{Deserialize, Serialize};

use super::errors::ChoicesError;

/// Which native control the engine stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Free-text tag input.
    Text,
    /// Single-value select.
    SelectOne,
    /// Multi-value select.
    SelectMultiple,
}

impl Mode {
    /// Parse a native element type string (`text`, `select-one`, `select-multiple`).
    ///
    /// # Errors
    ///
    /// Returns `ChoicesError::UnrecognisedElement` for any other type.
    pub fn from_element_type(kind: &str) -> Result<Self, ChoicesError> {
        match kind {
            "text" => Ok(Self::Text),
            "select-one" => Ok(Self::SelectOne),
            "select-multiple" => Ok(Self::SelectMultiple),
            other => Err(ChoicesError::UnrecognisedElement {
                kind: other.to_owned(),
            }),
        }
    }

    /// The native element type string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::SelectOne => "select-one",
            Self::SelectMultiple => "select-multiple",
        }
    }

    #[must_use]
    pub fn is_select(self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Adding an item replaces every other item.
    #[must_use]
    pub fn is_exclusive(self) -> bool {
        matches!(self, Self::SelectOne)
    }

    /// Selecting a choice closes the dropdown and refocuses the container.
    #[must_use]
    pub fn closes_on_select(self) -> bool {
        matches!(self, Self::SelectOne)
    }

    /// Removing the last item re-selects the placeholder choice.
    #[must_use]
    pub fn reselects_placeholder(self) -> bool {
        matches!(self, Self::SelectOne)
    }

    /// The first preset choice is selected when none is marked selected.
    #[must_use]
    pub fn preselects_first(self) -> bool {
        matches!(self, Self::SelectOne)
    }

    /// Typed text can become an item without a matching choice.
    #[must_use]
    pub fn accepts_free_text(self) -> bool {
        matches!(self, Self::Text)
    }

    /// Item sorting is meaningless for a single value.
    #[must_use]
    pub fn supports_item_sorting(self) -> bool {
        !matches!(self, Self::SelectOne)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_element_type() {
        assert_eq!(Mode::from_element_type("select-one").unwrap(), Mode::SelectOne);
        assert_eq!(Mode::from_element_type("text").unwrap(), Mode::Text);
        assert_eq!(Mode::SelectMultiple.as_str(), "select-multiple");
        assert!(matches!(
            Mode::from_element_type("textarea"),
            Err(ChoicesError::UnrecognisedElement { .. })
        ));
    }

    #[test]
    fn test_policy_points() {
        assert!(Mode::SelectOne.is_exclusive());
        assert!(!Mode::SelectMultiple.is_exclusive());
        assert!(Mode::Text.accepts_free_text());
        assert!(Mode::SelectOne.closes_on_select());
    }
}
