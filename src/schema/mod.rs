//! Schema registry: field constraints and per-entity record shapes.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Validating a [`RawRow`] against a schema checks
//! every field independently and either yields a [`ValidatedRow`] (all constraints hold) or the
//! full list of [`Violation`]s for that row. There is no partial acceptance.
//!
//! The three built-in schemas live in [`records`] and are reached through [`schema_for`] and
//! [`validate`].

pub mod records;

use std::fmt;

use crate::types::{CellValue, DisplayNumber, RawRow};

pub use records::{ClientRecord, Record, TaskRecord, WorkerRecord, schema_for, validate};

/// Logical type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// UTF-8 string. Numeric and boolean cells are accepted and rendered as text.
    Utf8,
    /// Floating point number. Numeric strings are coerced.
    Number,
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bound {
    /// Lower bound, if any.
    pub min: Option<f64>,
    /// Upper bound, if any.
    pub max: Option<f64>,
}

impl Bound {
    /// True when `v` lies within the bounds.
    pub fn contains(&self, v: f64) -> bool {
        self.min.is_none_or(|min| v >= min) && self.max.is_none_or(|max| v <= max)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                write!(f, "between {} and {}", DisplayNumber(min), DisplayNumber(max))
            }
            (Some(min), None) => write!(f, "at least {}", DisplayNumber(min)),
            (None, Some(max)) => write!(f, "at most {}", DisplayNumber(max)),
            (None, None) => f.write_str("any number"),
        }
    }
}

/// Content validators applied to the text of a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCheck {
    /// The text must parse as JSON. The shape of the parsed value is not checked.
    Json,
}

impl ContentCheck {
    fn apply(self, text: &str) -> Result<(), ViolationKind> {
        match self {
            ContentCheck::Json => serde_json::from_str::<serde_json::Value>(text)
                .map(|_| ())
                .map_err(|e| ViolationKind::InvalidJson {
                    message: e.to_string(),
                }),
        }
    }
}

/// A single named, constrained field in a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Column header the field is read from.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
    /// Missing cells are violations when set.
    pub required: bool,
    /// Whitespace-only text is a violation when set.
    pub non_empty: bool,
    /// Range applied to coerced numbers.
    pub bound: Bound,
    /// Optional content validator for text.
    pub check: Option<ContentCheck>,
}

impl Field {
    /// Create a required, unconstrained field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: true,
            non_empty: false,
            bound: Bound::default(),
            check: None,
        }
    }

    /// Shorthand for a required string field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Utf8)
    }

    /// Shorthand for a required number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Number)
    }

    /// Allow the cell to be absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Reject whitespace-only text.
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.bound.min = Some(min);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.bound.max = Some(max);
        self
    }

    /// Attach a content validator.
    pub fn content(mut self, check: ContentCheck) -> Self {
        self.check = Some(check);
        self
    }

    fn check_cell(&self, cell: Option<&CellValue>) -> Result<FieldValue, ViolationKind> {
        let cell = cell.filter(|c| !matches!(c, CellValue::Text(s) if s.is_empty()));
        let Some(cell) = cell else {
            return if self.required {
                Err(ViolationKind::Required)
            } else {
                Ok(FieldValue::Missing)
            };
        };

        match self.data_type {
            DataType::Utf8 => {
                let text = cell.to_string();
                if self.non_empty && text.trim().is_empty() {
                    return Err(ViolationKind::Empty);
                }
                if let Some(check) = self.check {
                    check.apply(&text)?;
                }
                Ok(FieldValue::Text(text))
            }
            DataType::Number => {
                let n = coerce_number(cell)?;
                if !self.bound.contains(n) {
                    return Err(ViolationKind::OutOfRange {
                        value: n,
                        bound: self.bound,
                    });
                }
                Ok(FieldValue::Number(n))
            }
        }
    }
}

fn coerce_number(cell: &CellValue) -> Result<f64, ViolationKind> {
    let n = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| ViolationKind::NotANumber {
            raw: s.clone(),
        })?,
        CellValue::Bool(b) => {
            return Err(ViolationKind::NotANumber { raw: b.to_string() });
        }
    };
    if n.is_finite() {
        Ok(n)
    } else {
        Err(ViolationKind::NotANumber {
            raw: cell.to_string(),
        })
    }
}

/// An ordered list of fields describing one record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Human-readable column headers, e.g. `PriorityLevel` -> `Priority Level`.
    pub fn display_headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| humanize(&f.name)).collect()
    }

    /// Check every field of `row`.
    ///
    /// All fields are evaluated even after a failure so the error lists every violation.
    /// Columns the schema does not declare are ignored.
    pub fn validate_row(&self, row: &RawRow) -> Result<ValidatedRow, Vec<Violation>> {
        let mut values = Vec::with_capacity(self.fields.len());
        let mut violations = Vec::new();

        for field in &self.fields {
            match field.check_cell(row.get(&field.name)) {
                Ok(v) => values.push((field.name.clone(), v)),
                Err(kind) => violations.push(Violation {
                    field: field.name.clone(),
                    kind,
                }),
            }
        }

        if violations.is_empty() {
            Ok(ValidatedRow { values })
        } else {
            Err(violations)
        }
    }
}

/// A field value that passed its constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Accepted text.
    Text(String),
    /// Accepted (coerced) number.
    Number(f64),
    /// Absent optional field.
    Missing,
}

/// The typed values of a row that satisfied every field of its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    values: Vec<(String, FieldValue)>,
}

impl ValidatedRow {
    /// Value of a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Text value of a field; empty for missing or non-text fields.
    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Some(FieldValue::Text(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Numeric value of a field; `0.0` for missing or non-number fields.
    pub fn number(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(FieldValue::Number(n)) => *n,
            _ => 0.0,
        }
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// The cell is absent or blank.
    Required,
    /// The cell holds whitespace only.
    Empty,
    /// The cell could not be coerced to a number.
    NotANumber { raw: String },
    /// The coerced number is outside the declared bounds.
    OutOfRange { value: f64, bound: Bound },
    /// The text is not syntactically valid JSON.
    InvalidJson { message: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Required => f.write_str("required"),
            ViolationKind::Empty => f.write_str("required (must not be empty)"),
            ViolationKind::NotANumber { raw } => write!(f, "expected a number (got '{raw}')"),
            ViolationKind::OutOfRange { value, bound } => {
                write!(f, "must be {bound} (got {})", DisplayNumber(*value))
            }
            ViolationKind::InvalidJson { message } => write!(f, "must be valid JSON ({message})"),
        }
    }
}

/// One failed field constraint on a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Field the violation applies to.
    pub field: String,
    /// What went wrong.
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Join a row's violations into the single message stored in [`crate::types::RowErrors`].
pub fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn humanize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            // "XMLParser" splits before the 'P'; a trailing plural "IDs" stays whole.
            let acronym_end = prev.is_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_lowercase())
                && !is_plural_suffix(&chars, i + 1);
            if prev.is_lowercase() || prev.is_ascii_digit() || acronym_end {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

fn is_plural_suffix(chars: &[char], idx: usize) -> bool {
    chars[idx] == 's' && chars.get(idx + 1).is_none_or(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Field::text("id").non_empty(),
            Field::number("score").min(1.0).max(5.0),
            Field::text("meta").content(ContentCheck::Json),
            Field::text("note").optional(),
        ])
    }

    fn sample_row() -> RawRow {
        RawRow::new()
            .with_text("id", "a1")
            .with_text("score", "3")
            .with_text("meta", r#"{"k":1}"#)
    }

    #[test]
    fn accepts_row_and_skips_missing_optional_field() {
        let row = sample_schema().validate_row(&sample_row()).unwrap();
        assert_eq!(row.text("id"), "a1");
        assert_eq!(row.number("score"), 3.0);
        assert_eq!(row.get("note"), Some(&FieldValue::Missing));
    }

    #[test]
    fn reports_every_violation_in_field_order() {
        let row = RawRow::new()
            .with_text("id", "  ")
            .with_text("score", "abc")
            .with_text("meta", "not-json");

        let errs = sample_schema().validate_row(&row).unwrap_err();
        let fields: Vec<&str> = errs.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "score", "meta"]);
        assert_eq!(errs[0].kind, ViolationKind::Empty);
        assert!(matches!(errs[1].kind, ViolationKind::NotANumber { .. }));
        assert!(matches!(errs[2].kind, ViolationKind::InvalidJson { .. }));
    }

    #[test]
    fn missing_required_field_reports_required() {
        let row = RawRow::new().with_text("score", "2").with_text("meta", "[]");
        let errs = sample_schema().validate_row(&row).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].to_string(), "id: required");
    }

    #[test]
    fn empty_text_cell_counts_as_missing() {
        let row = sample_row().with_text("id", "");
        let errs = sample_schema().validate_row(&row).unwrap_err();
        assert_eq!(errs[0].kind, ViolationKind::Required);
    }

    #[test]
    fn range_message_names_bounds_and_value() {
        let row = sample_row().with_number("score", 9.0);
        let errs = sample_schema().validate_row(&row).unwrap_err();
        assert_eq!(errs[0].to_string(), "score: must be between 1 and 5 (got 9)");
    }

    #[test]
    fn number_coercion_rejects_non_finite_and_bool() {
        let schema = Schema::new(vec![Field::number("n")]);
        for cell in [
            CellValue::Text("NaN".to_string()),
            CellValue::Text("inf".to_string()),
            CellValue::Bool(true),
        ] {
            let row = RawRow::new().with("n", cell);
            assert!(schema.validate_row(&row).is_err());
        }
        let row = RawRow::new().with_text("n", " 2.5 ");
        assert_eq!(schema.validate_row(&row).unwrap().number("n"), 2.5);
    }

    #[test]
    fn text_field_renders_numeric_cells() {
        let schema = Schema::new(vec![Field::text("t")]);
        let row = RawRow::new().with_number("t", 42.0);
        assert_eq!(schema.validate_row(&row).unwrap().text("t"), "42");
    }

    #[test]
    fn json_check_accepts_any_json_value() {
        let schema = Schema::new(vec![Field::text("j").content(ContentCheck::Json)]);
        for ok in ["{}", "[1,2]", "\"s\"", " 3 ", "null"] {
            let row = RawRow::new().with_text("j", ok);
            assert!(schema.validate_row(&row).is_ok(), "{ok}");
        }
    }

    #[test]
    fn humanize_splits_words_and_keeps_acronyms() {
        assert_eq!(humanize("PriorityLevel"), "Priority Level");
        assert_eq!(humanize("ClientID"), "Client ID");
        assert_eq!(humanize("RequestedTaskIDs"), "Requested Task IDs");
        assert_eq!(humanize("AttributesJSON"), "Attributes JSON");
        assert_eq!(humanize("MaxLoadPerPhase"), "Max Load Per Phase");
    }

    #[test]
    fn join_uses_semicolons() {
        let v = vec![
            Violation {
                field: "a".into(),
                kind: ViolationKind::Required,
            },
            Violation {
                field: "b".into(),
                kind: ViolationKind::Required,
            },
        ];
        assert_eq!(join_violations(&v), "a: required; b: required");
    }
}
