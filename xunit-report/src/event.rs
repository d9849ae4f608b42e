// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

/// A classified signal from a test runner's log stream.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// A test case with the given name started.
    Start(String),

    /// The current test case passed.
    Pass,

    /// The current test case failed.
    Fail,

    /// A diagnostic message for the current test case.
    Message(String),

    /// An error reported by the runner.
    ///
    /// Only errors matching the writer's error filter are recorded, as messages.
    Error(String),

    /// The run is over and the report should be written.
    Complete,
}

impl Event {
    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Start(_) => EventKind::Start,
            Self::Pass => EventKind::Pass,
            Self::Fail => EventKind::Fail,
            Self::Message(_) => EventKind::Message,
            Self::Error(_) => EventKind::Error,
            Self::Complete => EventKind::Complete,
        }
    }
}

/// The kind of an [`Event`], without its payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    Start,
    Pass,
    Fail,
    Message,
    Error,
    Complete,
}

impl EventKind {
    /// Returns the lowercase name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Message => "message",
            Self::Error => "error",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
