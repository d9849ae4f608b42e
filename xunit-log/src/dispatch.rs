// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command-line application.

use crate::{
    ExpectedError, Result, XunitLogExitCode,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::Utf8PathBuf;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
};
use xunit_report::{
    Classify, Clock, InstrumentsClassifier, ReportWriter, SystemClock, config::ReportConfig,
    errors::DispatchError,
};

/// Convert test-runner log output into an xUnit XML report.
///
/// Log lines are read from INPUT, or from standard input if INPUT is omitted. The report is
/// written when the runner reports that the run is complete, or when the input ends.
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct XunitLogApp {
    /// Log file to read [default: standard input]
    #[arg(value_name = "INPUT")]
    input: Option<Utf8PathBuf>,

    /// Path to write the xUnit report to
    #[arg(long, short, value_name = "PATH", env = "XUNIT_LOG_OUTPUT")]
    output: Option<Utf8PathBuf>,

    /// Name of the test suite [default: the file stem of the report path]
    #[arg(long, value_name = "NAME", env = "XUNIT_LOG_SUITE_NAME")]
    suite_name: Option<String>,

    /// Record error lines as messages only if they contain this text
    #[arg(long, value_name = "TEXT", env = "XUNIT_LOG_ERROR_FILTER")]
    error_filter: Option<String>,

    /// Config file [default: .config/xunit-log.toml if it exists]
    #[arg(long, value_name = "PATH", env = "XUNIT_LOG_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Copy every input line to standard output
    #[arg(long)]
    echo: bool,

    #[command(flatten)]
    output_opts: OutputOpts,
}

impl XunitLogApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output_opts.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let current_dir = current_dir()?;
        let mut config = ReportConfig::from_sources(&current_dir, self.config.as_deref())?;
        if let Some(suite_name) = self.suite_name {
            config.suite_name = Some(suite_name);
        }
        if let Some(error_filter) = self.error_filter {
            config.error_filter = error_filter;
        }

        let mut writer = ReportWriter::from_config(&config, self.output.as_deref(), SystemClock)
            .ok_or(ExpectedError::NoReportPath)?;

        let mut stdout = output_writer.stdout_writer();
        let echo = self.echo.then_some(&mut stdout as &mut dyn Write);

        let summary = match &self.input {
            Some(path) => {
                let file = File::open(path).map_err(|err| ExpectedError::InputOpenError {
                    path: path.clone(),
                    err,
                })?;
                let input = LogInput::new(format!("`{path}`"), BufReader::new(file));
                feed_lines(input, &InstrumentsClassifier, &mut writer, echo)?
            }
            None => {
                let input = LogInput::new("standard input", io::stdin().lock());
                feed_lines(input, &InstrumentsClassifier, &mut writer, echo)?
            }
        };

        summary.log();
        Ok(summary.exit_code())
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let current_dir =
        std::env::current_dir().map_err(|err| ExpectedError::CurrentDirInvalid { err })?;
    Utf8PathBuf::try_from(current_dir)
        .map_err(|err| ExpectedError::CurrentDirInvalidUtf8 { path: err.into_path_buf() })
}

/// A named source of log lines.
pub(crate) struct LogInput<R> {
    name: String,
    reader: R,
}

impl<R: BufRead> LogInput<R> {
    pub(crate) fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }
}

/// What happened over the course of a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RunSummary {
    pub(crate) path: Utf8PathBuf,
    pub(crate) tests: usize,
    pub(crate) failures: usize,
    pub(crate) completed: bool,
}

impl RunSummary {
    fn log(&self) {
        tracing::info!("{}", self.describe());
    }

    fn describe(&self) -> String {
        let mut description = format!(
            "wrote {} tests ({} failed) to {}",
            self.tests, self.failures, self.path,
        );
        if !self.completed {
            description.push_str(" from a run that never completed");
        }
        description
    }

    pub(crate) fn exit_code(&self) -> i32 {
        if self.failures > 0 {
            XunitLogExitCode::TEST_RUN_FAILED
        } else {
            XunitLogExitCode::OK
        }
    }
}

/// Classifies every line of `input` and dispatches the resulting events to `writer`.
///
/// Lines after the run completes are still echoed, but otherwise ignored. If the input ends
/// before the run completes, the report is written anyway.
pub(crate) fn feed_lines<R, C, K>(
    input: LogInput<R>,
    classifier: &C,
    writer: &mut ReportWriter<K>,
    mut echo: Option<&mut dyn Write>,
) -> Result<RunSummary>
where
    R: BufRead,
    C: Classify + ?Sized,
    K: Clock,
{
    let LogInput { name, reader } = input;

    for line in reader.lines() {
        let line = line.map_err(|err| ExpectedError::InputReadError {
            input: name.clone(),
            err,
        })?;

        if let Some(echo) = echo.as_deref_mut() {
            writeln!(echo, "{line}").map_err(|err| ExpectedError::EchoWriteError { err })?;
        }

        if writer.is_closed() {
            continue;
        }
        let Some(event) = classifier.classify(&line) else {
            continue;
        };

        match writer.dispatch(event) {
            Ok(()) => {}
            Err(DispatchError::NoActiveCase { kind }) => {
                tracing::warn!("ignoring `{kind}` event with no active test case: {line}");
            }
            Err(err) => return Err(ExpectedError::WriteReportError { err }),
        }
    }

    if let Some(echo) = echo {
        echo.flush()
            .map_err(|err| ExpectedError::EchoWriteError { err })?;
    }

    let completed = writer.is_closed();
    if !completed {
        tracing::warn!(
            "{name} ended before the run completed, writing report for {} tests",
            writer.suite().tests()
        );
        writer
            .on_complete()
            .map_err(|err| ExpectedError::WriteReportError { err })?;
    }

    Ok(RunSummary {
        path: writer.path().to_owned(),
        tests: writer.suite().tests(),
        failures: writer.suite().failures(),
        completed,
    })
}
