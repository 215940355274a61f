//! Row/section layout computation for schema-driven forms.
//!
//! Input widgets flow left-to-right into rows of at most the configured
//! column count. A section break flushes the current section and labels the
//! next one; a column break advances the column cursor without emitting a
//! widget, widening the row budget when markers outnumber the default
//! columns. Text blocks span the full row.

use crate::field::{FieldDescriptor, FieldKind};

pub const DEFAULT_COLUMNS: usize = 4;

/// Render-ready ordering of field names grouped into rows and sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormLayout {
    pub sections: Vec<FormSection>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSection {
    pub label: Option<String>,
    pub rows: Vec<Vec<String>>,
}

impl FormLayout {
    /// Every laid-out field name in render order.
    pub fn field_order(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .flat_map(|row| row.iter())
            .map(String::as_str)
            .collect()
    }
}

struct LayoutBuilder {
    columns: usize,
    sections: Vec<FormSection>,
    pending_label: Option<String>,
    current_rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    cursor: usize,
    row_budget: usize,
}

impl LayoutBuilder {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            sections: Vec::new(),
            pending_label: None,
            current_rows: Vec::new(),
            current_row: Vec::new(),
            cursor: 0,
            row_budget: columns,
        }
    }

    fn flush_row(&mut self) {
        if !self.current_row.is_empty() {
            self.current_rows.push(std::mem::take(&mut self.current_row));
        }
        self.cursor = 0;
        self.row_budget = self.columns;
    }

    fn flush_section(&mut self, next_label: Option<String>) {
        self.flush_row();
        if !self.current_rows.is_empty() || self.pending_label.is_some() {
            self.sections.push(FormSection {
                label: self.pending_label.take(),
                rows: std::mem::take(&mut self.current_rows),
            });
        }
        self.pending_label = next_label;
    }

    fn place(&mut self, name: &str, span: usize) {
        let span = span.min(self.row_budget).max(1);
        if self.cursor + span > self.row_budget {
            self.flush_row();
        }
        self.current_row.push(name.to_string());
        self.cursor += span;
    }

    fn finish(mut self) -> FormLayout {
        self.flush_section(None);
        FormLayout {
            sections: self.sections,
        }
    }
}

/// Lay out a field schema into at most `columns` columns per row.
pub fn layout(fields: &[FieldDescriptor], columns: usize) -> FormLayout {
    let columns = columns.max(1);
    let mut builder = LayoutBuilder::new(columns);

    for field in fields {
        match &field.kind {
            FieldKind::SectionBreak => {
                let label = (!field.label.is_empty()).then(|| field.label.clone());
                builder.flush_section(label);
            }
            FieldKind::ColumnBreak => {
                // Advances the cursor without a widget; markers beyond the
                // default column count widen this row's budget.
                builder.cursor += 1;
                builder.row_budget = builder.row_budget.max(builder.cursor);
            }
            FieldKind::TextBlock => {
                let span = builder.row_budget;
                builder.place(&field.name, span);
            }
            _ => builder.place(&field.name, 1),
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;

    fn text(name: &str) -> FieldDescriptor {
        FieldDescriptor::text(name, name)
    }

    #[test]
    fn fields_wrap_at_the_column_count() {
        let fields = vec![text("a"), text("b"), text("c"), text("d"), text("e")];
        let layout = layout(&fields, 4);
        assert_eq!(layout.sections.len(), 1);
        let rows = &layout.sections[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b", "c", "d"]);
        assert_eq!(rows[1], vec!["e"]);
    }

    #[test]
    fn section_break_labels_the_following_fields() {
        let fields = vec![
            FieldDescriptor::section_break("Identity"),
            text("givenName"),
            text("familyName"),
            FieldDescriptor::section_break("Contact"),
            text("phone"),
        ];
        let layout = layout(&fields, 4);
        assert_eq!(layout.sections.len(), 2);
        assert_eq!(layout.sections[0].label.as_deref(), Some("Identity"));
        assert_eq!(layout.sections[0].rows[0], vec!["givenName", "familyName"]);
        assert_eq!(layout.sections[1].label.as_deref(), Some("Contact"));
        assert_eq!(layout.sections[1].rows[0], vec!["phone"]);
    }

    #[test]
    fn unlabeled_leading_fields_form_their_own_section() {
        let fields = vec![
            text("a"),
            FieldDescriptor::section_break("Later"),
            text("b"),
        ];
        let layout = layout(&fields, 4);
        assert_eq!(layout.sections.len(), 2);
        assert_eq!(layout.sections[0].label, None);
        assert_eq!(layout.sections[1].label.as_deref(), Some("Later"));
    }

    #[test]
    fn column_break_consumes_a_slot() {
        let fields = vec![
            text("a"),
            FieldDescriptor::column_break(),
            text("b"),
            text("c"),
            text("d"),
        ];
        let layout = layout(&fields, 4);
        let rows = &layout.sections[0].rows;
        // a, gap, b, c fill the first row; d wraps.
        assert_eq!(rows[0], vec!["a", "b", "c"]);
        assert_eq!(rows[1], vec!["d"]);
    }

    #[test]
    fn column_breaks_beyond_the_budget_force_a_wrap() {
        let mut fields = vec![text("a")];
        for _ in 0..4 {
            fields.push(FieldDescriptor::column_break());
        }
        fields.push(text("b"));
        let layout = layout(&fields, 4);
        // The cursor consumed the whole (widened) row, so b starts a new one.
        let rows = &layout.sections[0].rows;
        assert_eq!(rows[0], vec!["a"]);
        assert_eq!(rows[1], vec!["b"]);
    }

    #[test]
    fn text_block_spans_the_full_row() {
        let fields = vec![
            text("a"),
            FieldDescriptor::text_block("notes", "Notes"),
            text("b"),
        ];
        let layout = layout(&fields, 4);
        let rows = &layout.sections[0].rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["a"]);
        assert_eq!(rows[1], vec!["notes"]);
        assert_eq!(rows[2], vec!["b"]);
    }

    #[test]
    fn field_order_is_preserved_end_to_end() {
        let fields = vec![
            FieldDescriptor::section_break("S1"),
            text("a"),
            text("b"),
            FieldDescriptor::section_break("S2"),
            text("c"),
        ];
        let layout = layout(&fields, 2);
        assert_eq!(layout.field_order(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_schema_produces_empty_layout() {
        let layout = layout(&[], 4);
        assert!(layout.sections.is_empty());
    }

    #[test]
    fn zero_columns_is_clamped_to_one() {
        let fields = vec![text("a"), text("b")];
        let layout = layout(&fields, 0);
        assert_eq!(layout.sections[0].rows.len(), 2);
    }
}
