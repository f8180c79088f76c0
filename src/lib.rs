#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod log;
pub mod error;
pub mod common;
pub mod loader;
pub mod chip_data;
pub mod circuit;
pub mod sizing;
pub mod switch_matrix;
pub mod scan_chain;
pub mod netlist;
pub mod exporter;
pub mod tools;
