// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn a stream of classified test-runner log events into an xUnit XML report.
//!
//! The main entry point is [`ReportWriter`]: feed it [`Event`]s (usually produced by a
//! [`Classify`] implementation such as [`InstrumentsClassifier`]) and call
//! [`ReportWriter::on_complete`] to write out the report.

mod classify;
mod clock;
pub mod config;
pub mod errors;
mod event;
mod report;
mod serialize;
mod writer;

pub use classify::*;
pub use clock::*;
pub use event::*;
pub use report::*;
pub use serialize::{serialize_suite, xml_escape};
pub use writer::*;
