//! Lookups that the audit cannot continue without. These are never caught or retried.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error,Debug,Clone,PartialEq,Eq)]
pub enum LookupError {
    #[error("Division {0} not found")]
    DivisionNotFound(String),

    #[error("Division {0} has no parent")]
    NoParent(String),

    #[error("No province or territory divisions found")]
    NoProvinces,

    #[error("No province or territory with statistical code {0:?}")]
    UnknownProvinceCode(String),

    #[error("{id}: Unrecognized OCD type {division_type}")]
    UnrecognizedType { id: String, division_type: String },

    #[error("{0} has no classification")]
    MissingClassification(String),

    /// The census type tables have no entry for the division's classification code.
    #[error("No {table} type name for classification {code:?}")]
    UnknownTypeName { table: &'static str, code: String },

    /// No table in a definition file carries a division_id.
    #[error("No jurisdiction definition with a division_id in {0}")]
    DefinitionNotFound(PathBuf),
}
