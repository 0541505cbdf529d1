#![warn(clippy::all)]
#![doc = include_str!("../README.md")]

// Modules that make up the CSV Chart library.
mod args;
mod dataset;
mod error;
mod file_extension;
mod filter;
mod ingest;
mod numeric;
mod state;
mod traits;
mod warning;

// Publicly expose the contents of these modules.
pub use self::{
    // add to lib
    args::Arguments,
    dataset::*,
    error::*,
    file_extension::*,
    filter::*,
    ingest::*,
    numeric::*,
    state::*,
    traits::*,
    warning::*,
};
