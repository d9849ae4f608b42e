// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classify raw log lines into [`Event`]s.

use crate::Event;

/// Turns a raw log line into an [`Event`].
pub trait Classify {
    /// Classifies `line`, returning `None` if it doesn't carry an event.
    fn classify(&self, line: &str) -> Option<Event>;
}

impl<C: Classify + ?Sized> Classify for &C {
    fn classify(&self, line: &str) -> Option<Event> {
        (**self).classify(line)
    }
}

static TRACE_COMPLETE: &str = "Instruments Trace Complete";
static TRACE_ERROR: &str = "Instruments Trace Error";
static UNCAUGHT_JS_ERROR: &str = "Script threw an uncaught JavaScript error";

// Date, time and UTC offset come before the kind token.
const KIND_TOKEN: usize = 3;

/// Classifier for the output of UI Automation under `instruments`.
///
/// Logged lines look like:
///
/// ```text
/// 2012-11-20 14:55:03 +0000 Start: login screen
/// 2012-11-20 14:55:04 +0000 Debug: target.frontMostApp().mainWindow().tap()
/// 2012-11-20 14:55:05 +0000 Pass: login screen
/// ```
///
/// The payload of an event is everything after the kind token, with runs of whitespace
/// collapsed to a single space. `Debug`, `Default`, `Message` and `Warning` lines carry no
/// event: the only messages a case records come from `Error` lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstrumentsClassifier;

impl InstrumentsClassifier {
    /// Creates a new classifier.
    pub fn new() -> Self {
        Self
    }
}

impl Classify for InstrumentsClassifier {
    fn classify(&self, line: &str) -> Option<Event> {
        if line.contains(TRACE_ERROR) {
            return Some(Event::Fail);
        }

        if starts_with_year(line) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let kind = tokens.get(KIND_TOKEN).copied().unwrap_or_default();
            let payload = || tokens.get(KIND_TOKEN + 1..).unwrap_or_default().join(" ");

            let event = if kind.contains("Pass") {
                Event::Pass
            } else if kind.contains("Start") {
                Event::Start(payload())
            } else if kind.contains("Fail") || line.contains(UNCAUGHT_JS_ERROR) {
                Event::Fail
            } else if kind.contains("Error") {
                Event::Error(payload())
            } else {
                return None;
            };
            return Some(event);
        }

        if line.contains(TRACE_COMPLETE) {
            return Some(Event::Complete);
        }

        None
    }
}

fn starts_with_year(line: &str) -> bool {
    line.len() >= 4 && line.as_bytes()[..4].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(
        "2012-11-20 14:55:03 +0000 Start: login screen",
        Some(Event::Start("login screen".to_owned()))
        ; "start"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Pass: login screen",
        Some(Event::Pass)
        ; "pass"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Fail: login screen",
        Some(Event::Fail)
        ; "fail"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Error: Script threw an uncaught JavaScript error: bad",
        Some(Event::Fail)
        ; "uncaught javascript error"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Error: NSInternalInconsistencyException   raised",
        Some(Event::Error("NSInternalInconsistencyException raised".to_owned()))
        ; "error collapses whitespace"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Debug: target.tap()",
        None
        ; "debug"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Warning: slow animation",
        None
        ; "warning"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Default: Log In tapped",
        None
        ; "default"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Screenshot: captured",
        None
        ; "unknown kind"
    )]
    #[test_case(
        "2012-11-20 14:55:03 +0000 Start:",
        Some(Event::Start(String::new()))
        ; "start without name"
    )]
    #[test_case("2012", None ; "truncated timestamp")]
    #[test_case(
        "Instruments Trace Complete (Duration : 9.8s; Output : /tmp/trace)",
        Some(Event::Complete)
        ; "complete"
    )]
    #[test_case(
        "Instruments Trace Error : Target failed to run",
        Some(Event::Fail)
        ; "trace error"
    )]
    #[test_case("random noise", None ; "noise")]
    #[test_case("", None ; "empty")]
    fn classify_instruments_line(line: &str, expected: Option<Event>) {
        assert_eq!(InstrumentsClassifier::new().classify(line), expected);
    }
}
