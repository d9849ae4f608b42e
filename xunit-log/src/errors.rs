// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{XunitLogExitCode, output::StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use xunit_report::errors::{ConfigParseError, DispatchError};

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that xunit-log expects and knows how to report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("current directory is invalid")]
    CurrentDirInvalid {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { path: std::path::PathBuf },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("no report path specified")]
    NoReportPath,
    #[error("failed to open input `{path}`")]
    InputOpenError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read input `{input}`")]
    InputReadError {
        input: String,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to echo input to stdout")]
    EchoWriteError {
        #[source]
        err: std::io::Error,
    },
    #[error("failed to write report")]
    WriteReportError {
        #[source]
        err: DispatchError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirInvalid { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. }
            | Self::NoReportPath
            | Self::InputOpenError { .. }
            | Self::InputReadError { .. } => XunitLogExitCode::SETUP_ERROR,
            Self::EchoWriteError { .. } | Self::WriteReportError { .. } => {
                XunitLogExitCode::WRITE_OUTPUT_ERROR
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirInvalid { err } => {
                tracing::error!("could not read the current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { path } => {
                tracing::error!(
                    "current directory `{}` is not valid UTF-8",
                    path.display().style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                tracing::error!(
                    "failed to parse config at `{}`",
                    err.config_file().style(styles.bold)
                );
                err.source()
            }
            Self::NoReportPath => {
                tracing::error!(
                    "no report path specified (pass in {}, or set {} in the config)",
                    "--output".style(styles.bold),
                    "report.path".style(styles.bold),
                );
                None
            }
            Self::InputOpenError { path, err } => {
                tracing::error!("failed to open input `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::InputReadError { input, err } => {
                tracing::error!("failed to read from {}", input.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::EchoWriteError { err } => {
                tracing::error!("failed to echo input to stdout");
                Some(err as &dyn Error)
            }
            Self::WriteReportError { err } => {
                tracing::error!("{}", "failed to write xunit report".style(styles.failure));
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: "xunit_log::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xunit_report::errors::WriteReportError;

    #[test]
    fn exit_codes() {
        assert_eq!(
            ExpectedError::NoReportPath.process_exit_code(),
            XunitLogExitCode::SETUP_ERROR
        );

        let err = ExpectedError::WriteReportError {
            err: DispatchError::Write(WriteReportError::Fs {
                file: "out/report.xml".into(),
                error: std::io::Error::other("disk full"),
            }),
        };
        assert_eq!(err.process_exit_code(), XunitLogExitCode::WRITE_OUTPUT_ERROR);
        assert!(
            err.source().is_some(),
            "write error carries its cause: {err:?}"
        );
    }
}
