// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Accumulate events into a [`TestSuite`] and write it out as xUnit XML.

use crate::{
    Clock, Event, EventKind, SystemClock, TestCase, TestSuite,
    config::ReportConfig,
    errors::{DispatchError, WriteReportError},
    serialize::serialize_suite,
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Receives classified events for a single test suite, and writes the xUnit report on
/// completion.
///
/// A `ReportWriter` is either open, accepting events, or closed after
/// [`on_complete`](Self::on_complete) has written the report. [`dispatch`](Self::dispatch) and
/// every `on_*` handler reject events sent to a closed writer with [`DispatchError::Closed`].
#[derive(Debug)]
pub struct ReportWriter<C = SystemClock> {
    path: Utf8PathBuf,
    error_filter: String,
    clock: C,
    suite: TestSuite,
    current: Option<usize>,
    state: WriterState,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum WriterState {
    Open,
    Closed,
}

impl ReportWriter {
    /// Creates a new writer for `path` using the system clock.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> ReportWriter<C> {
    /// Creates a new writer for `path` using the given clock.
    ///
    /// The suite is named after the file stem of `path`.
    pub fn with_clock(path: impl Into<Utf8PathBuf>, clock: C) -> Self {
        let path = path.into();
        let name = suite_name_for(&path);
        Self::build(path, name, ReportConfig::default_config().error_filter, clock)
    }

    /// Creates a new writer from a config, using the given clock.
    ///
    /// `path` overrides the path in `config`. Returns `None` if neither specifies a path.
    pub fn from_config(
        config: &ReportConfig,
        path: Option<&Utf8Path>,
        clock: C,
    ) -> Option<Self> {
        let path = path.or(config.path.as_deref())?.to_owned();
        let name = config
            .suite_name
            .clone()
            .unwrap_or_else(|| suite_name_for(&path));
        Some(Self::build(path, name, config.error_filter.clone(), clock))
    }

    fn build(path: Utf8PathBuf, name: String, error_filter: String, clock: C) -> Self {
        let suite = TestSuite::new(name, clock.now());
        Self {
            path,
            error_filter,
            clock,
            suite,
            current: None,
            state: WriterState::Open,
        }
    }

    /// The path the report is written to.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The suite accumulated so far.
    pub fn suite(&self) -> &TestSuite {
        &self.suite
    }

    /// Returns true once the report has been written.
    pub fn is_closed(&self) -> bool {
        self.state == WriterState::Closed
    }

    /// Routes `event` to the matching handler.
    ///
    /// [`Event::Error`] is recorded as a message only if its text contains the configured error
    /// filter, and is dropped otherwise.
    pub fn dispatch(&mut self, event: Event) -> Result<(), DispatchError> {
        self.ensure_open(event.kind())?;

        match event {
            Event::Start(name) => self.on_start(name),
            Event::Pass => self.on_pass(),
            Event::Fail => self.on_fail(),
            Event::Message(text) => self.on_message(text),
            Event::Error(text) => {
                if text.contains(self.error_filter.as_str()) {
                    self.on_message(text)
                } else {
                    tracing::debug!("dropping error without `{}`: {text}", self.error_filter);
                    Ok(())
                }
            }
            Event::Complete => self.on_complete(),
        }
    }

    /// Starts a new test case, which becomes the current one.
    pub fn on_start(&mut self, name: impl Into<String>) -> Result<(), DispatchError> {
        self.ensure_open(EventKind::Start)?;
        let name = name.into();
        tracing::debug!("test case started: {name}");
        let index = self
            .suite
            .add_test_case(TestCase::new(name, self.clock.now()));
        self.current = Some(index);
        Ok(())
    }

    /// Marks the current test case as passed.
    pub fn on_pass(&mut self) -> Result<(), DispatchError> {
        self.ensure_open(EventKind::Pass)?;
        let now = self.clock.now();
        self.current_case(EventKind::Pass)?.pass(now);
        Ok(())
    }

    /// Records that the current test case finished.
    ///
    /// A case that already passed stays passed.
    pub fn on_fail(&mut self) -> Result<(), DispatchError> {
        self.ensure_open(EventKind::Fail)?;
        let now = self.clock.now();
        self.current_case(EventKind::Fail)?.fail(now);
        Ok(())
    }

    /// Adds a message to the current test case.
    ///
    /// Messages that arrive before any test case has started are dropped.
    pub fn on_message(&mut self, text: impl Into<String>) -> Result<(), DispatchError> {
        self.ensure_open(EventKind::Message)?;
        let text = text.into();
        match self.current_case(EventKind::Message) {
            Ok(case) => {
                case.append(text);
            }
            Err(_) => tracing::debug!("dropping message with no active test case: {text}"),
        }
        Ok(())
    }

    /// Serializes the suite and writes it to the report path, then closes this writer.
    ///
    /// Existing content at the path is replaced atomically. On failure the writer stays open.
    pub fn on_complete(&mut self) -> Result<(), DispatchError> {
        self.ensure_open(EventKind::Complete)?;

        let mut buf = Vec::new();
        serialize_suite(&self.suite, &mut buf).map_err(WriteReportError::Serialize)?;
        write_atomic(&self.path, &buf)?;

        tracing::debug!(
            "wrote xunit report with {} tests ({} failures) to {}",
            self.suite.tests(),
            self.suite.failures(),
            self.path,
        );
        self.state = WriterState::Closed;
        Ok(())
    }

    fn ensure_open(&self, kind: EventKind) -> Result<(), DispatchError> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Closed => Err(DispatchError::Closed {
                kind,
                path: self.path.clone(),
            }),
        }
    }

    fn current_case(&mut self, kind: EventKind) -> Result<&mut TestCase, DispatchError> {
        self.current
            .and_then(|index| self.suite.test_case_mut(index))
            .ok_or(DispatchError::NoActiveCase { kind })
    }
}

fn suite_name_for(path: &Utf8Path) -> String {
    path.file_stem().unwrap_or(path.as_str()).to_owned()
}

fn write_atomic(path: &Utf8Path, contents: &[u8]) -> Result<(), WriteReportError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|error| WriteReportError::Fs {
            file: dir.to_owned(),
            error,
        })?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(contents))
        .map_err(|err| match err {
            atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => {
                WriteReportError::Fs {
                    file: path.to_owned(),
                    error,
                }
            }
        })
}
