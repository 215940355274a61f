use crate::rules::ValidationRule;

/// What kind of input widget a field renders as, and how its raw string
/// input is coerced before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Enumerated choice; valid values come from the descriptor's options.
    Select,
    /// Calendar date entered as YYYY-MM-DD.
    Date,
    /// Numeric amount; coerced to a number before rules run.
    Currency { non_negative: bool },
    /// Multi-line text spanning the full row width.
    TextBlock,
    /// Layout marker: starts a new section, optionally labeled.
    SectionBreak,
    /// Layout marker: advances the column cursor within the current row.
    ColumnBreak,
}

impl FieldKind {
    /// Layout markers carry no value and are skipped by validation.
    pub fn is_input(&self) -> bool {
        !matches!(self, Self::SectionBreak | Self::ColumnBreak)
    }
}

/// Declarative description of a single form field.
///
/// Descriptors are loaded once from a static schema source and are immutable
/// at runtime. Only trusted schema sources may supply rules: rule parameters
/// are data, but custom predicates resolve to functions registered in code.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<String>,
    pub rules: Vec<ValidationRule>,
    pub default: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
            rules: Vec::new(),
            default: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut field = Self::new(name, label, FieldKind::Select);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn currency(name: impl Into<String>, label: impl Into<String>, non_negative: bool) -> Self {
        Self::new(name, label, FieldKind::Currency { non_negative })
    }

    pub fn text_block(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::TextBlock)
    }

    pub fn section_break(label: impl Into<String>) -> Self {
        Self::new("", label, FieldKind::SectionBreak)
    }

    pub fn column_break() -> Self {
        Self::new("", "", FieldKind::ColumnBreak)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}
