//! Table rendering for terminal output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dsnorm_core::GetterTable;
use dsnorm_model::{FieldName, FieldValue, NormalizedRecord, VocabularyTerm};

/// One row of the `units` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    pub position: usize,
    pub name: String,
    /// Supported fields as rendered by [`supported_fields`].
    pub fields: String,
    pub description: String,
    pub terminal: bool,
}

/// Compact list of the fields a unit has getters for.
pub fn supported_fields(getters: &GetterTable) -> String {
    if getters.is_empty() {
        "-".to_string()
    } else if getters.len() == FieldName::ALL.len() {
        "all".to_string()
    } else {
        getters
            .fields()
            .map(|field| field.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `(field, value)` pairs of a record in canonical order, values as shown
/// in tables. Unset fields render as `-`.
pub fn record_rows(record: &NormalizedRecord) -> Vec<(FieldName, String)> {
    let mut rows: Vec<(FieldName, String)> = record
        .scalars()
        .map(|(field, value)| (field, value.map_or_else(|| "-".to_string(), display_value)))
        .collect();
    let parameters: Vec<String> = record.parameters().iter().map(display_value).collect();
    let position = rows
        .iter()
        .position(|(field, _)| *field > FieldName::DatasetParameters)
        .unwrap_or(rows.len());
    rows.insert(position, (FieldName::DatasetParameters, parameters.join("\n")));
    rows
}

/// Terms show their full representation, everything else its display form.
fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Term(term) => term.representation(),
        FieldValue::List(items) => items.iter().map(display_value).collect::<Vec<_>>().join("\n"),
        other => other.to_string(),
    }
}

pub fn record_table(record: &NormalizedRecord) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (field, value) in record_rows(record) {
        let value_cell = if value == "-" {
            dim_cell("-")
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(field.as_str()).fg(Color::Cyan), value_cell]);
    }
    table
}

pub fn term_table(term: &VocabularyTerm) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Slot"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (key, value) in term.iter() {
        let value_cell = if value.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(key), value_cell]);
    }
    table
}

pub fn units_table(rows: &[UnitRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Unit"),
        header_cell("Fields"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in rows {
        let name = if row.terminal {
            Cell::new(&row.name).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&row.name)
        };
        let fields = if row.fields == "-" {
            dim_cell("-")
        } else {
            Cell::new(&row.fields)
        };
        table.add_row(vec![
            Cell::new(row.position),
            name,
            fields,
            Cell::new(&row.description),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsnorm_model::VocabularyCategory;

    #[test]
    fn parameters_sit_at_their_canonical_position() {
        let mut record = NormalizedRecord::all_fields();
        record.try_set(FieldName::EntryId, FieldValue::text("x"));
        record.push_parameter(FieldValue::Term(VocabularyTerm::placeholder(
            VocabularyCategory::Parameter,
            "wind_speed",
            "",
        )));
        let rows = record_rows(&record);
        let fields: Vec<FieldName> = rows.iter().map(|(field, _)| *field).collect();
        assert_eq!(fields, FieldName::ALL.to_vec());
        assert_eq!(rows[0].1, "x");
        assert_eq!(rows[1].1, "-");
        assert_eq!(rows[9].1, "wind_speed > Unknown");
    }

    #[test]
    fn supported_fields_are_listed_in_canonical_order() {
        use dsnorm_model::RawMetadata;

        let getters = GetterTable::new()
            .with(FieldName::Platform, |_: &RawMetadata| Ok(None))
            .with(FieldName::EntryId, |_: &RawMetadata| Ok(None));
        assert_eq!(supported_fields(&getters), "entry_id, platform");
        assert_eq!(supported_fields(&GetterTable::new()), "-");

        let mut everything = GetterTable::new();
        for field in FieldName::ALL {
            everything.insert(field, |_: &RawMetadata| Ok(None));
        }
        assert_eq!(supported_fields(&everything), "all");
    }
}
