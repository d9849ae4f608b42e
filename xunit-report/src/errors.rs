// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by xunit-report.

use crate::EventKind;
use camino::Utf8PathBuf;
use config::ConfigError;
use thiserror::Error;

/// An error that occurred while dispatching an event to a
/// [`ReportWriter`](crate::ReportWriter).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// A `pass` or `fail` event arrived before any test case was started.
    #[error("received `{kind}` event with no active test case")]
    NoActiveCase {
        /// The kind of event that was received.
        kind: EventKind,
    },

    /// An event arrived after the report was already written.
    #[error("received `{kind}` event after the report was written to {path}")]
    Closed {
        /// The kind of event that was received.
        kind: EventKind,

        /// The path the report was written to.
        path: Utf8PathBuf,
    },

    /// Writing the report failed.
    #[error(transparent)]
    Write(#[from] WriteReportError),
}

/// An error that occurred while writing out a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while producing XML.
    #[error("error serializing xunit report")]
    Serialize(#[source] quick_xml::Error),

    /// An error occurred while operating on the file system.
    #[error("error writing xunit report to {file}")]
    Fs {
        /// The file being written.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse xunit-log config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    err: ConfigError,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, err: ConfigError) -> Self {
        Self {
            config_file: config_file.into(),
            err,
        }
    }

    /// The config file that failed to parse.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }
}
