// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `xunit-log`.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum XunitLogExitCode {}

impl XunitLogExitCode {
    /// The report was written and every test case passed.
    pub const OK: i32 = 0;

    /// The report was written, and at least one test case failed or never finished.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// A user issue happened while setting up an invocation, e.g. an invalid config file or an
    /// unreadable input.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing the report, or echoing input to stdout, produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
