#![doc = include_str!("../README.md")]

mod column;
mod formats;
mod helper_functions;
pub mod mass;
mod parameters;
mod peptide;
mod psm;
mod reader;
mod tolerance;

pub mod csv;

pub use column::*;
pub use formats::*;
pub use parameters::*;
pub use peptide::*;
pub use psm::*;
pub use reader::*;
pub use tolerance::*;

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::{
        Column, Diann, DiannColumn, PSM, ReadOptions, SearchEngineParameters, SynopsisFormat,
    };
}
