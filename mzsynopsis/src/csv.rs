//! Methods for reading and writing character separated files. (Internal use mostly).

use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Write},
    ops::Range,
    path::Path,
};

use context_error::{BasicKind, BoxedError, Context, CreateError};
use flate2::bufread::GzDecoder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::helper_functions::check_extension;

/// A single data line in a character separated file. The fields are not bound to the header, the
/// header is resolved separately (see [`crate::ColumnMap`]) so lines with fewer fields than the
/// header are still readable.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct CsvLine {
    line_index: usize,
    line: String,
    fields: Vec<Range<usize>>,
}

impl CsvLine {
    /// Split a line on the given separator, no quoting is taken into account
    pub fn new(line_index: usize, line: String, separator: u8) -> Self {
        let fields = csv_separate(&line, separator);
        Self {
            line_index,
            line,
            fields,
        }
    }

    /// Get the line index (0 based)
    pub const fn line_index(&self) -> usize {
        self.line_index
    }

    /// Get the full line
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Get the number of columns
    pub fn number_of_columns(&self) -> usize {
        self.fields.len()
    }

    /// Get the text of the specified column, if this line has that many columns
    pub fn get(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(|range| &self.line[range.clone()])
    }

    /// Get the range of a specified column
    pub fn range(&self, column: usize) -> Option<&Range<usize>> {
        self.fields.get(column)
    }

    /// Get the context applicable to the specified column, or the whole line if the column does
    /// not exist on this line
    pub fn column_context(&self, column: usize) -> Context<'_> {
        self.fields.get(column).map_or_else(
            || self.full_context(),
            |range| {
                Context::line(
                    Some(self.line_index as u32),
                    &self.line,
                    range.start,
                    range.len(),
                )
            },
        )
    }

    /// Get the context for the whole line
    pub fn full_context(&self) -> Context<'_> {
        Context::full_line(self.line_index as u32, &self.line)
    }
}

impl std::ops::Index<usize> for CsvLine {
    type Output = str;
    fn index(&self, index: usize) -> &str {
        &self.line[self.fields[index].clone()]
    }
}

impl std::fmt::Display for CsvLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}",
            Context::default()
                .line_index(self.line_index as u32)
                .lines(0, &self.line)
                .add_highlights(self.fields.iter().map(|f| (0, f.clone())))
        )
    }
}

/// Open a character separated file, gzipped files (`.gz`) are decompressed on the fly.
/// # Errors
/// If the file cannot be opened or if the header line cannot be read.
pub fn parse_csv(
    path: impl AsRef<Path>,
    separator: u8,
) -> Result<CsvLineIter<Box<dyn Read>>, BoxedError<'static, BasicKind>> {
    let file = File::open(path.as_ref()).map_err(|e| {
        BoxedError::new(
            BasicKind::Error,
            "Could not open file",
            e.to_string(),
            Context::none()
                .source(path.as_ref().to_string_lossy())
                .to_owned(),
        )
    })?;
    let reader: Box<dyn Read> = if check_extension(path.as_ref(), "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(file)
    };
    parse_csv_raw(reader, separator)
}

/// Parse a character separated file from a raw reader, the first line has to be the header.
/// # Errors
/// If the file is empty or the header line could not be read.
pub fn parse_csv_raw<T: Read>(
    reader: T,
    separator: u8,
) -> Result<CsvLineIter<T>, BoxedError<'static, BasicKind>> {
    let mut lines = BufReader::new(reader).lines().enumerate();
    let (_, header_line) = lines.next().ok_or_else(|| {
        BoxedError::new(
            BasicKind::Error,
            "Could not parse file",
            "The file is empty, the header line is missing",
            Context::none(),
        )
    })?;
    let header_line = header_line.map_err(|err| {
        BoxedError::new(
            BasicKind::Error,
            "Could not read header line",
            err.to_string(),
            Context::none().line_index(0),
        )
    })?;
    let header = csv_separate(&header_line, separator)
        .into_iter()
        .map(|range| header_line[range].trim().to_string())
        .collect();

    Ok(CsvLineIter {
        lines,
        header,
        separator,
    })
}

/// An iterator returning the data lines of a character separated file, blank lines are skipped
#[derive(Debug)]
pub struct CsvLineIter<T: Read> {
    lines: std::iter::Enumerate<std::io::Lines<BufReader<T>>>,
    header: Vec<String>,
    separator: u8,
}

impl<T: Read> CsvLineIter<T> {
    /// The header fields of this file, trimmed but in their original case
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl<T: Read> Iterator for CsvLineIter<T> {
    type Item = Result<CsvLine, BoxedError<'static, BasicKind>>;
    fn next(&mut self) -> Option<Self::Item> {
        for (line_index, line) in self.lines.by_ref() {
            match line {
                Err(err) => {
                    return Some(Err(BoxedError::new(
                        BasicKind::Error,
                        "Could not read line",
                        err.to_string(),
                        Context::none().line_index(line_index as u32),
                    )));
                }
                Ok(line) if line.trim().is_empty() => (),
                Ok(line) => return Some(Ok(CsvLine::new(line_index, line, self.separator))),
            }
        }
        None
    }
}

/// Split the line on every occurrence of the separator, a line ending in `\r` has it stripped.
fn csv_separate(line: &str, separator: u8) -> Vec<Range<usize>> {
    let end = line.strip_suffix('\r').map_or(line.len(), str::len);
    let mut row = Vec::new();
    let mut start = 0;
    for (index, byte) in line.as_bytes()[..end].iter().enumerate() {
        if *byte == separator {
            row.push(start..index);
            start = index + 1;
        }
    }
    row.push(start..end);
    row
}

/// Write a CSV file for use in other tools. Columns missing from a row are left empty and every
/// line gets the same number of columns. Values or headers containing the separator are wrapped in
/// double quotes (") with inner double quotes replaced by single quotes ('). Note that
/// [`parse_csv`] does not handle quoting, so these files are not meant to be read back.
/// # Errors
/// If the `Write` implementation errors.
pub fn write_csv(
    mut f: impl Write,
    data: impl IntoIterator<Item = impl IntoIterator<Item = (String, String)>>,
    separator: char,
) -> Result<(), std::io::Error> {
    let mut order: Vec<String> = Vec::new();
    let sorted: Vec<Vec<String>> = data
        .into_iter()
        .map(|row| {
            let mut new_row = vec![String::new(); order.len()];
            for (mut column, mut value) in row {
                if value.contains(separator) {
                    value = format!("\"{}\"", value.replace('\"', "\'"));
                }
                if let Some(index) = order.iter().position(|i| *i == column) {
                    new_row[index] = value;
                } else {
                    if column.contains(separator) {
                        column = format!("\"{}\"", column.replace('\"', "\'"));
                    }
                    order.push(column);
                    new_row.push(value);
                }
            }
            new_row
        })
        .collect_vec();
    let separator = separator.to_string();
    writeln!(f, "{}", order.iter().join(&separator))?;
    for row in sorted {
        let len = order.len() - row.len();
        writeln!(
            f,
            "{}",
            row.into_iter()
                .chain(std::iter::repeat_n(String::new(), len))
                .join(&separator)
        )?;
    }
    Ok(())
}
