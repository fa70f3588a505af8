// src/io/mod.rs

pub mod candidates;
pub mod reference;

pub use candidates::{read_table, write_table};
pub use reference::load_reference_names;
