pub mod config;
pub mod error;
pub mod divisions;
pub mod type_names;
pub mod naming;
pub mod metadata;
pub mod styles;
mod source_edit;
pub mod tidy;
pub mod person;
pub mod scrapers;
pub mod tasks;
pub mod parse_util;

#[cfg(test)]
mod testing;
