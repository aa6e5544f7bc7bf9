//! `demandcast` command line: forecast, merge, summary and generate over CSV files.

pub mod cli;
pub mod commands;
