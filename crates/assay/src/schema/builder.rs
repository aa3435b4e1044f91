//! Derives a [`SchemaDescriptor`] from a reference table.

use indexmap::IndexMap;

use super::descriptor::SchemaDescriptor;
use crate::input::DataTable;

/// Measure fields excluded from the categorical vocabulary.
const MEASURE_FIELDS: &[&str] = &[
    "Revenue",
    "Volume",
    "Month",
    "Production Volume",
    "Total",
    "Calendar Year",
];

/// Fields that must not contain empty cells, unless overridden.
/// The misspellings are faithful to the upstream datasets.
const DEFAULT_REQUIRED_FIELDS: &[&str] = &[
    "Calendar Year",
    "Corperate Name",
    "Ficsal Year",
    "Mineral Lease Type",
    "Month",
    "Onshore/Offshore",
    "Volume",
];

/// Raw item values the datasets record under a different canonical name.
const DEFAULT_SUBSTITUTIONS: &[(&str, &str)] = &[("Mining-Unspecified", "Humate")];

/// Position of the item column: a field literally named "Commodity" wins
/// over "Product"; neither means the table has no item column.
pub fn resolve_item_column(table: &DataTable) -> Option<usize> {
    table
        .column_index("Commodity")
        .or_else(|| table.column_index("Product"))
}

/// Split an item cell into (item, unit).
///
/// Two-branch rule: a cell containing `(` splits on the last `" ("` with
/// the trailing `)` stripped from the unit; otherwise a cell containing
/// `,` splits on the first `", "` (the comma form is used for Geothermal);
/// otherwise the whole cell is the item and the unit is empty. Returns
/// `None` when the marker character is present but the separator is not,
/// i.e. the cell is malformed.
pub fn split_unit(cell: &str) -> Option<(String, String)> {
    if cell.contains('(') {
        let idx = cell.rfind(" (")?;
        let item = cell[..idx].to_string();
        let unit = cell[idx + 2..].trim_end_matches(')').to_string();
        Some((item, unit))
    } else if cell.contains(',') {
        let idx = cell.find(", ")?;
        Some((cell[..idx].to_string(), cell[idx + 2..].to_string()))
    } else {
        Some((cell.to_string(), String::new()))
    }
}

/// Builds schema descriptors from reference tables.
///
/// Derivation never fails: an empty table or a table without an item
/// column simply produces empty vocabularies.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    required_fields: Vec<String>,
    substitution_rules: IndexMap<String, String>,
}

impl SchemaBuilder {
    /// Builder with the domain-default required fields and substitutions.
    pub fn new() -> Self {
        Self {
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            substitution_rules: DEFAULT_SUBSTITUTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Override the required-field list.
    pub fn with_required_fields(mut self, fields: Vec<String>) -> Self {
        self.required_fields = fields;
        self
    }

    /// Override the substitution rules.
    pub fn with_substitution_rules(mut self, rules: IndexMap<String, String>) -> Self {
        self.substitution_rules = rules;
        self
    }

    /// Derive a descriptor from a reference table.
    pub fn derive(&self, table: &DataTable) -> SchemaDescriptor {
        let item_column = resolve_item_column(table);

        SchemaDescriptor {
            header: table.headers.clone(),
            unit_vocabulary: derive_unit_vocabulary(table, item_column),
            categorical_vocabulary: derive_categorical_vocabulary(table, item_column),
            required_fields: self.required_fields.clone(),
            substitution_rules: self.substitution_rules.clone(),
        }
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold every item-column cell into item -> units. Malformed cells are
/// skipped here; validation reports them per row.
fn derive_unit_vocabulary(
    table: &DataTable,
    item_column: Option<usize>,
) -> IndexMap<String, Vec<String>> {
    let mut units: IndexMap<String, Vec<String>> = IndexMap::new();
    let Some(col) = item_column else {
        return units;
    };

    for cell in table.column_values(col) {
        let Some((item, unit)) = split_unit(cell) else {
            continue;
        };
        let entry = units.entry(item).or_default();
        if !entry.contains(&unit) {
            entry.push(unit);
        }
    }
    units
}

/// Distinct observed values for every field outside the measure set and
/// the item column, in first-observed order.
fn derive_categorical_vocabulary(
    table: &DataTable,
    item_column: Option<usize>,
) -> IndexMap<String, Vec<String>> {
    let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();

    for (idx, name) in table.headers.iter().enumerate() {
        if Some(idx) == item_column || MEASURE_FIELDS.contains(&name.as_str()) {
            continue;
        }
        let mut values: Vec<String> = Vec::new();
        for cell in table.column_values(idx) {
            if !values.iter().any(|v| v == cell) {
                values.push(cell.to_string());
            }
        }
        fields.insert(name.clone(), values);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            b',',
        )
    }

    #[test]
    fn test_split_unit_parenthesized() {
        assert_eq!(
            split_unit("Coal (Short Tons)"),
            Some(("Coal".to_string(), "Short Tons".to_string()))
        );
    }

    #[test]
    fn test_split_unit_nested_parentheses_use_last() {
        assert_eq!(
            split_unit("Oil (Cond) (Barrels)"),
            Some(("Oil (Cond)".to_string(), "Barrels".to_string()))
        );
    }

    #[test]
    fn test_split_unit_comma() {
        assert_eq!(
            split_unit("Steam, MCF"),
            Some(("Steam".to_string(), "MCF".to_string()))
        );
    }

    #[test]
    fn test_split_unit_no_unit() {
        assert_eq!(split_unit("Gold"), Some(("Gold".to_string(), String::new())));
    }

    #[test]
    fn test_split_unit_malformed() {
        assert_eq!(split_unit("Coal(Short Tons)"), None);
        assert_eq!(split_unit("Steam,MCF"), None);
    }

    #[test]
    fn test_commodity_wins_over_product() {
        let t = table(&["Product", "Commodity"], &[&["a", "b"]]);
        assert_eq!(resolve_item_column(&t), Some(1));
    }

    #[test]
    fn test_derive_unit_vocabulary() {
        let t = table(
            &["Commodity", "State"],
            &[
                &["Coal (Short Tons)", "TX"],
                &["Coal (Tons)", "TX"],
                &["Coal (Short Tons)", "NM"],
                &["Gold", "NV"],
            ],
        );
        let descriptor = SchemaBuilder::new().derive(&t);

        assert_eq!(
            descriptor.unit_vocabulary.get("Coal"),
            Some(&vec!["Short Tons".to_string(), "Tons".to_string()])
        );
        assert_eq!(
            descriptor.unit_vocabulary.get("Gold"),
            Some(&vec![String::new()])
        );
    }

    #[test]
    fn test_derive_categorical_excludes_measures_and_item() {
        let t = table(
            &["Commodity", "State", "Volume", "Calendar Year"],
            &[&["Coal (Tons)", "TX", "10", "2020"]],
        );
        let descriptor = SchemaBuilder::new().derive(&t);

        assert!(descriptor.categorical_vocabulary.contains_key("State"));
        assert!(!descriptor.categorical_vocabulary.contains_key("Commodity"));
        assert!(!descriptor.categorical_vocabulary.contains_key("Volume"));
        assert!(
            !descriptor
                .categorical_vocabulary
                .contains_key("Calendar Year")
        );
    }

    #[test]
    fn test_derive_empty_table_does_not_fail() {
        let t = table(&["State"], &[]);
        let descriptor = SchemaBuilder::new().derive(&t);
        assert!(descriptor.unit_vocabulary.is_empty());
        assert_eq!(
            descriptor.categorical_vocabulary.get("State"),
            Some(&Vec::new())
        );
    }

    #[test]
    fn test_derive_without_item_column() {
        let t = table(&["State"], &[&["TX"]]);
        let descriptor = SchemaBuilder::new().derive(&t);
        assert!(descriptor.unit_vocabulary.is_empty());
    }
}
