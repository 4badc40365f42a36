//! The synopsis file formats of the supported search engines

mod diann;

pub use diann::*;

#[cfg(test)]
mod diann_tests;
