use std::result;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = result::Result<T, Error>;
