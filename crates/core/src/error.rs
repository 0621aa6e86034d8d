use std::collections::TryReserveError;

/// Errors that can occur when building or formatting domain capabilities.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to set enum {name} value {value}")]
    InvalidEnumValue { name: String, value: u32 },

    #[error("failed to allocate room for {requested} CPU models")]
    AllocationFailure {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("no string mapping for value {value} of {table}")]
    MissingStringMapping { table: String, value: u32 },

    #[error("CPU model name length {len} is not a character boundary of '{name}'")]
    InvalidModelName { name: String, len: usize },

    #[error("unknown {table} value '{value}'")]
    UnknownValue { table: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
