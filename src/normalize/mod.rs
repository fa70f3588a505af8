// src/normalize/mod.rs

pub mod keys;
pub mod suffix;
pub mod tokens;

pub use keys::{acronym, derive_keys, symbol_base, NameKeys, STOPWORDS};
pub use suffix::strip_suffix;
pub use tokens::clean_tokens;
