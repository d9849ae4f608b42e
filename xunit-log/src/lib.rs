// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Convert test-runner log output into an xUnit XML report.
//!
//! `xunit-log` reads the log produced by a UI Automation run under `instruments` (from a file
//! or standard input), and writes an xUnit report once the run completes. Report settings can
//! be provided on the command line, through environment variables, or in
//! `.config/xunit-log.toml`.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
pub use exit_codes::XunitLogExitCode;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter};
