use std::{io::Read, marker::PhantomData, path::Path};

use context_error::{BasicKind, BoxedError, CreateError};

use crate::{
    Column, ColumnMap, PSM, ReadOptions, SearchEngineParameters,
    csv::{CsvLine, CsvLineIter, parse_csv, parse_csv_raw},
};

/// A synopsis file format of one search engine. Each format has its own closed set of columns,
/// its own way of reading a line, and its own way of interpreting the parameter file.
pub trait SynopsisFormat {
    /// The columns of this format
    type Column: Column;

    /// The name of the search engine
    const NAME: &'static str;

    /// The separator between columns
    const SEPARATOR: u8 = b'\t';

    /// Resolve the header line of a file into the position of each known column
    fn resolve_header<S: AsRef<str>>(
        header: impl IntoIterator<Item = S>,
    ) -> ColumnMap<Self::Column> {
        ColumnMap::resolve(header)
    }

    /// Parse a single data line.
    /// # Errors
    /// If the line cannot be read as a PSM, generally because the scan number is missing.
    fn parse_line(
        line: &CsvLine,
        columns: &ColumnMap<Self::Column>,
        options: ReadOptions,
    ) -> Result<PSM, BoxedError<'static, BasicKind>>;

    /// Read and interpret the parameter file of a search, non fatal problems are returned as warnings.
    /// # Errors
    /// If the file could not be read.
    fn read_parameters(
        path: impl AsRef<Path>,
    ) -> Result<
        (SearchEngineParameters, Vec<BoxedError<'static, BasicKind>>),
        BoxedError<'static, BasicKind>,
    >;

    /// Open a synopsis file, the header is resolved once and every following line is parsed
    /// lazily. Gzipped files (`.gz`) are supported.
    /// # Errors
    /// If the file could not be opened or the header could not be read.
    fn parse_file(
        path: impl AsRef<Path>,
        options: ReadOptions,
    ) -> Result<PSMIter<Self, Box<dyn Read>>, BoxedError<'static, BasicKind>>
    where
        Self: Sized,
    {
        let source = path.as_ref().to_string_lossy().to_string();
        parse_csv(path, Self::SEPARATOR).map(|lines| PSMIter::new(lines, options, Some(source)))
    }

    /// Read a synopsis file from a reader, see [`Self::parse_file`].
    /// # Errors
    /// If the header could not be read.
    fn parse_reader<R: Read>(
        reader: R,
        options: ReadOptions,
    ) -> Result<PSMIter<Self, R>, BoxedError<'static, BasicKind>>
    where
        Self: Sized,
    {
        parse_csv_raw(reader, Self::SEPARATOR).map(|lines| PSMIter::new(lines, options, None))
    }
}

/// An iterator over all PSMs in a synopsis file. Lines that cannot be read are returned as an
/// error, after which the following lines are still read.
#[derive(Debug)]
pub struct PSMIter<Format: SynopsisFormat, R: Read> {
    lines: CsvLineIter<R>,
    columns: ColumnMap<Format::Column>,
    options: ReadOptions,
    source: Option<String>,
    format: PhantomData<Format>,
}

impl<Format: SynopsisFormat, R: Read> PSMIter<Format, R> {
    fn new(lines: CsvLineIter<R>, options: ReadOptions, source: Option<String>) -> Self {
        let columns = Format::resolve_header(lines.header());
        Self {
            lines,
            columns,
            options,
            source,
            format: PhantomData,
        }
    }

    /// The resolved columns of this file
    pub const fn columns(&self) -> &ColumnMap<Format::Column> {
        &self.columns
    }

    /// The original header of this file
    pub fn header(&self) -> &[String] {
        self.lines.header()
    }
}

impl<Format: SynopsisFormat, R: Read> Iterator for PSMIter<Format, R> {
    type Item = Result<PSM, BoxedError<'static, BasicKind>>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(error) => return Some(Err(error)),
        };
        Some(
            Format::parse_line(&line, &self.columns, self.options).map_err(|error| {
                let context = line.full_context();
                let context = match &self.source {
                    Some(source) => context.source(source.clone()),
                    None => context,
                };
                BoxedError::new(
                    BasicKind::Error,
                    format!("Invalid {} line", Format::NAME),
                    format!("Line {} is skipped", line.line_index() + 1),
                    context.to_owned(),
                )
                .add_underlying_errors(vec![error])
            }),
        )
    }
}
