use foodie_error::ext::ResultExt;
use foodie_error::{Error, Result};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to load .env file")]
pub struct LoadDotenvError;

/// Loads environment variables from the nearest `.env` file found in the
/// current directory or any of its ancestors.
pub fn load_dotenv() -> Result<PathBuf, LoadDotenvError> {
    dotenvy::dotenv()
        .change_context(LoadDotenvError)
        .attach_printable("could not find or read `.env` file")
}

#[derive(Debug, Error)]
#[error("Could not get value of an environment variable")]
pub struct VarError;

/// Gets the value of an environment variable, returning `None`
/// if it is not set.
#[track_caller]
pub fn var_opt(key: &str) -> Result<Option<String>, VarError> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(Error::unknown(error)
            .change_context(VarError)
            .attach_printable(format!("{key:?} has an invalid UTF-8 value"))),
    }
}
