// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, FixedOffset};
use std::time::Duration;

/// Represents a single testsuite: every test case seen for one report target.
#[derive(Clone, Debug)]
pub struct TestSuite {
    name: String,
    timestamp: DateTime<FixedOffset>,
    test_cases: Vec<TestCase>,
}

impl TestSuite {
    /// Creates a new, empty `TestSuite` stamped with the given creation time.
    pub fn new(name: impl Into<String>, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            name: name.into(),
            timestamp,
            test_cases: vec![],
        }
    }

    /// The name of this testsuite.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The time at which this testsuite was created.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// The test cases in this suite, in the order they were started.
    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Appends a test case and returns its index.
    pub fn add_test_case(&mut self, test_case: TestCase) -> usize {
        self.test_cases.push(test_case);
        self.test_cases.len() - 1
    }

    pub(crate) fn test_case_mut(&mut self, index: usize) -> Option<&mut TestCase> {
        self.test_cases.get_mut(index)
    }

    /// The total number of test cases.
    pub fn tests(&self) -> usize {
        self.test_cases.len()
    }

    /// The number of test cases that did not pass, including ones that never finished.
    pub fn failures(&self) -> usize {
        self.test_cases.iter().filter(|case| case.is_failed()).count()
    }

    /// The sum of the elapsed time of every test case.
    pub fn total_time(&self) -> Duration {
        self.test_cases.iter().map(TestCase::elapsed).sum()
    }
}

/// Represents a single test case.
#[derive(Clone, Debug)]
pub struct TestCase {
    name: String,
    messages: Vec<String>,
    started_at: DateTime<FixedOffset>,
    status: TestCaseStatus,
}

impl TestCase {
    /// Creates a new, running `TestCase`.
    pub fn new(name: impl Into<String>, started_at: DateTime<FixedOffset>) -> Self {
        Self {
            name: name.into(),
            messages: vec![],
            started_at,
            status: TestCaseStatus::Running,
        }
    }

    /// The name of this test case.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diagnostic messages recorded for this test case, in arrival order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The time at which this test case was started.
    pub fn started_at(&self) -> DateTime<FixedOffset> {
        self.started_at
    }

    /// The current status.
    pub fn status(&self) -> TestCaseStatus {
        self.status
    }

    /// Records a diagnostic message.
    pub fn append(&mut self, message: impl Into<String>) -> &mut Self {
        self.messages.push(message.into());
        self
    }

    /// Marks this test case as passed at `finished_at`.
    ///
    /// Calling this again, or after [`fail`](Self::fail), overwrites the earlier finish time.
    pub fn pass(&mut self, finished_at: DateTime<FixedOffset>) -> &mut Self {
        self.status = TestCaseStatus::Passed { finished_at };
        self
    }

    /// Records that this test case finished at `finished_at`.
    ///
    /// A case that already passed stays passed, and only its finish time moves.
    pub fn fail(&mut self, finished_at: DateTime<FixedOffset>) -> &mut Self {
        self.status = match self.status {
            TestCaseStatus::Passed { .. } => TestCaseStatus::Passed { finished_at },
            TestCaseStatus::Running | TestCaseStatus::Failed { .. } => {
                TestCaseStatus::Failed { finished_at }
            }
        };
        self
    }

    /// Returns true unless this test case was ever marked as passed.
    ///
    /// A test case that is still running counts as failed.
    pub fn is_failed(&self) -> bool {
        !matches!(self.status, TestCaseStatus::Passed { .. })
    }

    /// The time between start and finish, or zero if the test case hasn't finished.
    ///
    /// A finish time earlier than the start time (e.g. the clock went backwards) is treated as
    /// zero.
    pub fn elapsed(&self) -> Duration {
        match self.status.finished_at() {
            Some(finished_at) => (finished_at - self.started_at).to_std().unwrap_or_default(),
            None => Duration::ZERO,
        }
    }
}

/// The status of a [`TestCase`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TestCaseStatus {
    /// The test case was started but hasn't reported an outcome.
    Running,

    /// The test case passed.
    Passed {
        /// The time at which the test case finished.
        finished_at: DateTime<FixedOffset>,
    },

    /// The test case failed.
    Failed {
        /// The time at which the test case finished.
        finished_at: DateTime<FixedOffset>,
    },
}

impl TestCaseStatus {
    /// The time at which the test case finished, if it has.
    pub fn finished_at(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Running => None,
            Self::Passed { finished_at } | Self::Failed { finished_at } => Some(*finished_at),
        }
    }
}
