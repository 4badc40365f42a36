use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use context_error::{BasicKind, BoxedError, Context, CreateError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::PrecursorTolerance;

/// The search settings of one dataset as read from the parameter file of the search engine
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SearchEngineParameters {
    /// The name of the search engine
    pub search_engine: String,
    /// The file these parameters were read from
    pub source: Option<PathBuf>,
    /// All parameters as read from the file, in file order
    pub parameters: IndexMap<String, String>,
    /// The enzyme name, empty if not specified
    pub enzyme: String,
    /// The minimal number of enzymatic termini, `None` if the parameter file did not (correctly)
    /// specify it. Note that this is distinct from [`EnzymaticTermini::NonSpecific`].
    pub enzymatic_termini: Option<EnzymaticTermini>,
    /// The precursor mass tolerance, zero if it could not be determined
    pub precursor_tolerance: PrecursorTolerance,
}

impl SearchEngineParameters {
    /// Get the raw value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

/// The number of peptide termini that have to be the result of enzymatic cleavage
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum EnzymaticTermini {
    /// No terminus has to be enzymatic (0)
    NonSpecific,
    /// At least one terminus has to be enzymatic (1)
    SemiSpecific,
    /// Both termini have to be enzymatic (2)
    FullySpecific,
}

impl EnzymaticTermini {
    /// The number of termini
    pub const fn count(self) -> u8 {
        match self {
            Self::NonSpecific => 0,
            Self::SemiSpecific => 1,
            Self::FullySpecific => 2,
        }
    }

    /// Read the parameter value `0`, `1`, or `2`
    pub fn from_parameter(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Self::NonSpecific),
            "1" => Some(Self::SemiSpecific),
            "2" => Some(Self::FullySpecific),
            _ => None,
        }
    }
}

impl std::fmt::Display for EnzymaticTermini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonSpecific => write!(f, "non-specific"),
            Self::SemiSpecific => write!(f, "semi-specific"),
            Self::FullySpecific => write!(f, "fully specific"),
        }
    }
}

/// Read a `key = value` parameter file.
/// # Errors
/// If the file could not be opened or read.
pub fn read_key_value_parameters(
    path: impl AsRef<Path>,
) -> Result<IndexMap<String, String>, BoxedError<'static, BasicKind>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        BoxedError::new(
            BasicKind::Error,
            "Could not open parameter file",
            e.to_string(),
            Context::none().source(path.to_string_lossy()).to_owned(),
        )
    })?;
    parse_key_value_parameters(file).map_err(|e| {
        BoxedError::new(
            BasicKind::Error,
            "Could not read parameter file",
            "The parameter file could not be read",
            Context::none().source(path.to_string_lossy()).to_owned(),
        )
        .add_underlying_errors(vec![e])
    })
}

/// Parse `key = value` lines. Anything after a `#` is a comment, keys and values are trimmed,
/// lines without `=` are ignored, and for repeated keys the first value is kept.
/// # Errors
/// If any line could not be read.
pub fn parse_key_value_parameters(
    reader: impl Read,
) -> Result<IndexMap<String, String>, BoxedError<'static, BasicKind>> {
    let mut parameters = IndexMap::new();
    for (line_index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| {
            BoxedError::new(
                BasicKind::Error,
                "Could not read line",
                e.to_string(),
                Context::none().line_index(line_index as u32),
            )
        })?;
        let content = line.split_once('#').map_or(line.as_str(), |(c, _)| c);
        if let Some((key, value)) = content.split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                parameters
                    .entry(key.to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }
    }
    Ok(parameters)
}
