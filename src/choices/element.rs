/// DOM-free description of the native form control being upgraded.
///
/// The rendering layer extracts this from the page; the engine only reads it.
use serde::Deserialize;

/// An `<option>`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionSpec {
    pub value: String,
    /// Inner text. Falls back to `value` when empty.
    pub label: String,
    pub selected: bool,
    pub disabled: bool,
    /// Carries the `placeholder` attribute.
    pub placeholder: bool,
}

/// An `<optgroup>` with its options.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptgroupSpec {
    pub label: String,
    pub id: Option<u64>,
    pub disabled: bool,
    pub options: Vec<OptionSpec>,
}

/// The source element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceElement {
    /// Native type: `text`, `select-one` or `select-multiple`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Current value attribute (text inputs), split by the configured delimiter.
    #[serde(default)]
    pub value: Option<String>,
    /// Options directly under the select.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default)]
    pub optgroups: Vec<OptgroupSpec>,
    /// A placeholder option that is a direct child of the select.
    #[serde(default)]
    pub placeholder_option: Option<OptionSpec>,
    /// Already marked as upgraded (`data-choice="active"`).
    #[serde(default)]
    pub already_active: bool,
}

impl SourceElement {
    /// A bare element of the given type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            options: Vec::new(),
            optgroups: Vec::new(),
            placeholder_option: None,
            already_active: false,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<OptionSpec>) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl OptionSpec {
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_owned(),
            label: label.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}
