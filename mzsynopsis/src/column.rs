use std::{fmt::Debug, hash::Hash, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::csv::CsvLine;

/// A closed set of semantic columns for one synopsis file format. Every column has exactly one
/// canonical header, the canonical headers are unique within the format and never change once
/// published, as downstream tools depend on them.
pub trait Column: Copy + Debug + Eq + Hash + 'static {
    /// All columns in the canonical order
    const ALL: &'static [Self];

    /// The canonical header for this column
    fn header(self) -> &'static str;

    /// Find the column with this header, ignoring case
    fn from_header(header: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|column| column.header().eq_ignore_ascii_case(header.trim()))
            .copied()
    }

    /// The default schema, all columns with their canonical header in the canonical order
    fn schema() -> impl Iterator<Item = (Self, &'static str)> {
        Self::ALL.iter().map(|column| (*column, column.header()))
    }
}

/// The position of each known column in the header line of one specific file. Columns that are
/// not present in the header (tool versions vary) are absent from the map.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(bound(
    serialize = "C: Serialize",
    deserialize = "C: Deserialize<'de> + Eq + Hash"
))]
pub struct ColumnMap<C: Column> {
    indices: IndexMap<C, usize>,
}

impl<C: Column> Default for ColumnMap<C> {
    fn default() -> Self {
        Self {
            indices: IndexMap::new(),
        }
    }
}

impl<C: Column> ColumnMap<C> {
    /// Resolve a header line. For each canonical header the first header field that matches it
    /// (ignoring case and surrounding whitespace) gives the 0-based index of that column.
    pub fn resolve<S: AsRef<str>>(header: impl IntoIterator<Item = S>) -> Self {
        let header: Vec<S> = header.into_iter().collect();
        Self {
            indices: C::schema()
                .filter_map(|(column, name)| {
                    header
                        .iter()
                        .position(|field| field.as_ref().trim().eq_ignore_ascii_case(name))
                        .map(|index| (column, index))
                })
                .collect(),
        }
    }

    /// The index of the given column, if it is present
    pub fn index(&self, column: C) -> Option<usize> {
        self.indices.get(&column).copied()
    }

    /// Check if the given column is present
    pub fn contains(&self, column: C) -> bool {
        self.indices.contains_key(&column)
    }

    /// The number of present columns
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if no known column was found
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// All present columns with their index, in the canonical order
    pub fn iter(&self) -> impl Iterator<Item = (C, usize)> + '_ {
        self.indices.iter().map(|(column, index)| (*column, *index))
    }

    /// The raw text for this column on this line. `None` if the column is absent from the file
    /// or if the line is too short.
    pub fn value<'a>(&self, line: &'a CsvLine, column: C) -> Option<&'a str> {
        self.index(column).and_then(|index| line.get(index))
    }

    /// Parse the text for this column, if the column is absent, the line too short, or the text
    /// cannot be parsed as `T` the default for `T` is returned.
    pub fn parse_or_default<T: FromStr + Default>(&self, line: &CsvLine, column: C) -> T {
        self.value(line, column)
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or_default()
    }
}
