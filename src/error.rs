// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Error hierarchy for the shell. Every variant is fatal: the program
/// exits with a diagnostic rather than retrying, because a single-window
/// terminal with no shell (or no usable background) has nothing left to do.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("failed to read configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("referenced file does not exist: {path}")]
    MissingFile { path: PathBuf },

    #[error("failed to decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("failed to scale background image to {width}x{height}: {message}")]
    Scale {
        width: u32,
        height: u32,
        message: String,
    },

    #[error("failed to spawn shell process {program}: {message}")]
    Spawn { program: String, message: String },
}

pub type ShellResult<T> = Result<T, ShellError>;
