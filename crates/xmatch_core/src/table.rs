//! Ordered, column-addressable in-memory table.
//!
//! This is the hand-off format between the core and its collaborators: the
//! table reader builds one, the core transforms it, the writer persists it.
//! Every column has the same number of rows.
//!
//! Float columns mark absent values with NaN. Other value types have a
//! nullable variant, produced by [`Table::outer_join`] when a row has no
//! partner on one side.

use std::collections::BTreeMap;

use crate::error::MatchError;

/// A typed column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
    NullableInt(Vec<Option<i64>>),
    NullableBool(Vec<Option<bool>>),
    NullableText(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::NullableInt(v) => v.len(),
            Self::NullableBool(v) => v.len(),
            Self::NullableText(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value type name, as used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::NullableInt(_) => "nullable int",
            Self::NullableBool(_) => "nullable bool",
            Self::NullableText(_) => "nullable text",
        }
    }

    fn remove(&mut self, index: usize) {
        match self {
            Self::Int(v) => {
                v.remove(index);
            }
            Self::Float(v) => {
                v.remove(index);
            }
            Self::Bool(v) => {
                v.remove(index);
            }
            Self::Text(v) => {
                v.remove(index);
            }
            Self::NullableInt(v) => {
                v.remove(index);
            }
            Self::NullableBool(v) => {
                v.remove(index);
            }
            Self::NullableText(v) => {
                v.remove(index);
            }
        }
    }

    fn reorder(&mut self, order: &[usize]) {
        fn pick<T: Clone>(v: &[T], order: &[usize]) -> Vec<T> {
            order.iter().map(|&i| v[i].clone()).collect()
        }
        match self {
            Self::Int(v) => *v = pick(v, order),
            Self::Float(v) => *v = pick(v, order),
            Self::Bool(v) => *v = pick(v, order),
            Self::Text(v) => *v = pick(v, order),
            Self::NullableInt(v) => *v = pick(v, order),
            Self::NullableBool(v) => *v = pick(v, order),
            Self::NullableText(v) => *v = pick(v, order),
        }
    }

    /// New column holding row `i` of `self` for each `Some(i)`.
    ///
    /// `None` rows are absent: NaN for floats, `None` otherwise. A non-float
    /// column with any absent row becomes its nullable variant.
    fn gather(&self, rows: &[Option<usize>]) -> Column {
        fn present<T: Clone>(v: &[T], rows: &[Option<usize>]) -> Vec<Option<T>> {
            rows.iter().map(|r| r.map(|i| v[i].clone())).collect()
        }
        fn nested<T: Clone>(v: &[Option<T>], rows: &[Option<usize>]) -> Vec<Option<T>> {
            rows.iter().map(|r| r.and_then(|i| v[i].clone())).collect()
        }

        let complete = rows.iter().all(Option::is_some);
        match self {
            Self::Float(v) => {
                Self::Float(rows.iter().map(|r| r.map_or(f64::NAN, |i| v[i])).collect())
            }
            _ if complete => {
                let order: Vec<usize> = rows.iter().flatten().copied().collect();
                let mut column = self.clone();
                column.reorder(&order);
                column
            }
            Self::Int(v) => Self::NullableInt(present(v, rows)),
            Self::Bool(v) => Self::NullableBool(present(v, rows)),
            Self::Text(v) => Self::NullableText(present(v, rows)),
            Self::NullableInt(v) => Self::NullableInt(nested(v, rows)),
            Self::NullableBool(v) => Self::NullableBool(nested(v, rows)),
            Self::NullableText(v) => Self::NullableText(nested(v, rows)),
        }
    }
}

/// Ordered table of named, equal-length columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a table from columns already known to share `rows` rows.
    pub(crate) fn from_columns(rows: usize, columns: Vec<(String, Column)>) -> Self {
        debug_assert!(columns.iter().all(|(_, c)| c.len() == rows));
        let (names, columns) = columns.into_iter().unzip();
        Self {
            names,
            columns,
            rows,
        }
    }

    /// Builder form of [`Table::add_column`].
    pub fn with_column(mut self, name: &str, column: Column) -> Result<Self, MatchError> {
        self.add_column(name, column)?;
        Ok(self)
    }

    /// Add a column, replacing any existing column of the same name.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn add_column(&mut self, name: &str, column: Column) -> Result<(), MatchError> {
        if !self.columns.is_empty() && column.len() != self.rows {
            return Err(MatchError::LengthMismatch {
                expected: self.rows,
                found: column.len(),
            });
        }
        self.rows = column.len();
        match self.position(name) {
            Some(idx) => self.columns[idx] = column,
            None => {
                self.names.push(name.to_string());
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<&Column, MatchError> {
        self.position(name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| MatchError::MissingColumn(name.to_string()))
    }

    pub fn int_column(&self, name: &str) -> Result<&[i64], MatchError> {
        match self.column(name)? {
            Column::Int(v) => Ok(v),
            _ => Err(type_error(name, "int")),
        }
    }

    pub fn float_column(&self, name: &str) -> Result<&[f64], MatchError> {
        match self.column(name)? {
            Column::Float(v) => Ok(v),
            _ => Err(type_error(name, "float")),
        }
    }

    pub fn bool_column(&self, name: &str) -> Result<&[bool], MatchError> {
        match self.column(name)? {
            Column::Bool(v) => Ok(v),
            _ => Err(type_error(name, "bool")),
        }
    }

    pub fn text_column(&self, name: &str) -> Result<&[String], MatchError> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            _ => Err(type_error(name, "text")),
        }
    }

    pub fn nullable_int_column(&self, name: &str) -> Result<&[Option<i64>], MatchError> {
        match self.column(name)? {
            Column::NullableInt(v) => Ok(v),
            _ => Err(type_error(name, "nullable int")),
        }
    }

    /// Remove one row, shifting every later row up by one.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn remove_row(&mut self, index: usize) {
        assert!(index < self.rows, "row {index} out of range for {} rows", self.rows);
        for column in &mut self.columns {
            column.remove(index);
        }
        self.rows -= 1;
    }

    /// Stable ascending sort of all rows by an integer column.
    pub fn sort_by_int_column(&mut self, name: &str) -> Result<(), MatchError> {
        let keys = self.int_column(name)?;
        let mut order: Vec<usize> = (0..self.rows).collect();
        order.sort_by_key(|&i| keys[i]);
        if order.iter().enumerate().all(|(pos, &i)| pos == i) {
            return Ok(());
        }
        for column in &mut self.columns {
            column.reorder(&order);
        }
        Ok(())
    }

    /// Full outer join with `other` on an integer key column.
    ///
    /// Rows sharing a key are paired (every left row with every right row of
    /// that key); rows whose key appears on one side only are kept with the
    /// other side's cells absent. Output rows are ordered by key, then by
    /// left row, then by right row. The key column comes first, followed by
    /// the remaining columns of `self`, then of `other`; a non-key name present
    /// in both tables gets a `_1` suffix on the left and `_2` on the right.
    pub fn outer_join(&self, other: &Table, key: &str) -> Result<Table, MatchError> {
        let left_keys = self.int_column(key)?;
        let right_keys = other.int_column(key)?;

        let mut groups: BTreeMap<i64, (Vec<usize>, Vec<usize>)> = BTreeMap::new();
        for (i, &k) in left_keys.iter().enumerate() {
            groups.entry(k).or_default().0.push(i);
        }
        for (i, &k) in right_keys.iter().enumerate() {
            groups.entry(k).or_default().1.push(i);
        }

        let mut keys = Vec::new();
        let mut left_rows = Vec::new();
        let mut right_rows = Vec::new();
        for (&k, (left, right)) in &groups {
            let pairs: Vec<(Option<usize>, Option<usize>)> = match (left.is_empty(), right.is_empty())
            {
                (false, false) => left
                    .iter()
                    .flat_map(|&l| right.iter().map(move |&r| (Some(l), Some(r))))
                    .collect(),
                (false, true) => left.iter().map(|&l| (Some(l), None)).collect(),
                _ => right.iter().map(|&r| (None, Some(r))).collect(),
            };
            for (l, r) in pairs {
                keys.push(k);
                left_rows.push(l);
                right_rows.push(r);
            }
        }

        let rows = keys.len();
        let mut columns = vec![(key.to_string(), Column::Int(keys))];
        for (name, column) in self.names.iter().zip(&self.columns) {
            if name != key {
                let out = if other.has_column(name) {
                    format!("{name}_1")
                } else {
                    name.clone()
                };
                columns.push((out, column.gather(&left_rows)));
            }
        }
        for (name, column) in other.names.iter().zip(&other.columns) {
            if name != key {
                let out = if self.has_column(name) {
                    format!("{name}_2")
                } else {
                    name.clone()
                };
                columns.push((out, column.gather(&right_rows)));
            }
        }
        Ok(Table::from_columns(rows, columns))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

fn type_error(column: &str, expected: &'static str) -> MatchError {
    MatchError::ColumnType {
        column: column.to_string(),
        expected,
    }
}
