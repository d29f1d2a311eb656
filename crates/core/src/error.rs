use std::{io, path::PathBuf};

use crate::values::ValuesError;

/// Which input a read failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Template,
    Values,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template => f.write_str("template"),
            Self::Values => f.write_str("values"),
        }
    }
}

/// Every failure is fatal to the invocation.
#[derive(Debug, thiserror::Error)]
pub enum SubstError {
    #[error("Usage: varsubst --template=<template> --values=<values> [--output=<output>]")]
    Usage,

    #[error("Error reading {what} file {}: {source}", .path.display())]
    Read {
        what: InputKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error unmarshaling values file {}: {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: ValuesError,
    },

    #[error("Error writing to the output file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = SubstError> = std::result::Result<T, E>;
