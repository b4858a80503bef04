//! In-memory tabular dataset

use anyhow::{Result, bail};

use super::value::{ColumnKind, Value};

/// Lowercase a column name and replace spaces with underscores
///
/// Applying it to an already normalized name returns the name unchanged.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Infer the kind of a column from its values
///
/// Mirrors how dataframe libraries type a freshly imported column:
/// - only integers, no nulls -> Integer
/// - integers/floats, possibly with nulls (or nothing but nulls) -> Float
/// - only booleans, no nulls -> Boolean
/// - only timestamps, possibly with nulls -> Timestamp
/// - anything else -> Text
pub fn infer_kind(values: &[Value]) -> ColumnKind {
    if values.is_empty() {
        return ColumnKind::Text;
    }

    let (mut nulls, mut ints, mut floats, mut bools, mut timestamps) = (0, 0, 0, 0, 0);
    for value in values {
        match value {
            Value::Null => nulls += 1,
            Value::Int(_) => ints += 1,
            Value::Float(_) => floats += 1,
            Value::Bool(_) => bools += 1,
            Value::Timestamp(_) => timestamps += 1,
            Value::Text(_) => {}
        }
    }

    let present = values.len() - nulls;
    let has_nulls = nulls > 0;

    if present == 0 {
        ColumnKind::Float
    } else if ints == present && !has_nulls {
        ColumnKind::Integer
    } else if ints + floats == present {
        ColumnKind::Float
    } else if bools == present && !has_nulls {
        ColumnKind::Boolean
    } else if timestamps == present {
        ColumnKind::Timestamp
    } else {
        ColumnKind::Text
    }
}

/// Convert values so that every non-null value matches `kind`
fn coerce_values(values: Vec<Value>, kind: &ColumnKind) -> Vec<Value> {
    match kind {
        ColumnKind::Float => values
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => Value::Float(i as f64),
                other => other,
            })
            .collect(),
        ColumnKind::Text => values
            .into_iter()
            .map(|v| match v.to_text() {
                Some(text) => Value::Text(text),
                None => Value::Null,
            })
            .collect(),
        _ => values,
    }
}

fn filled_text(value: &Value) -> Option<String> {
    match value {
        Value::Float(f) => Some(f.to_string()),
        other => other.to_text(),
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<Value>,
}

impl Column {
    /// Create a column with an explicit kind
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Create a column whose kind is inferred from its values
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let kind = infer_kind(&values);
        let values = coerce_values(values, &kind);
        Self::new(name, kind, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// Ordered collection of equally long columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, rejecting columns of unequal length
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                bail!(
                    "Column '{}' has {} values, expected {} (from column '{}')",
                    bad.name(),
                    bad.len(),
                    expected,
                    first.name()
                );
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Values of one row in column order
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values()[index]).collect())
    }

    /// Iterate rows in their original order
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).filter_map(move |i| self.row(i))
    }

    /// Rewrite every column name with `f`
    pub fn map_column_names(&mut self, f: impl Fn(&str) -> String) {
        for column in &mut self.columns {
            column.name = f(&column.name);
        }
    }

    /// Lowercase names and replace spaces with underscores
    pub fn normalize_column_names(&mut self) {
        self.map_column_names(normalize_column_name);
    }

    /// Replace every occurrence of `from` in column names with `to`
    pub fn replace_in_column_names(&mut self, from: &str, to: &str) {
        self.map_column_names(|name| name.replace(from, to));
    }

    /// Rename a column, returns false when it does not exist
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_mut(from) {
            Some(column) => {
                column.name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Replace nulls in a column with `fill`
    ///
    /// A column that contains nulls becomes a Text column. Existing values
    /// are rendered the way PostgreSQL casts them to text, so a whole float
    /// becomes "29" rather than "29.0". Without nulls the column is left
    /// untouched. Returns false when the column does not exist.
    pub fn fill_nulls(&mut self, name: &str, fill: &str) -> bool {
        let Some(column) = self.column_mut(name) else {
            return false;
        };

        if column.null_count() == 0 {
            return true;
        }

        column.values = column
            .values
            .iter()
            .map(|v| Value::Text(filled_text(v).unwrap_or_else(|| fill.to_string())))
            .collect();
        column.kind = ColumnKind::Text;
        true
    }

    /// Set `name` to the 0-based row index, replacing an existing column of that name
    pub fn with_index_column(&mut self, name: &str) {
        let values: Vec<Value> = (0..self.row_count() as i64).map(Value::Int).collect();
        let column = Column::new(name, ColumnKind::Integer, values);

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }
}
