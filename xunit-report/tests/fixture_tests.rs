// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::DateTime;
use goldenfile::Mint;
use std::time::Duration;
use xunit_report::{
    Classify, Event, InstrumentsClassifier, ManualClock, ReportWriter, serialize_suite,
};

static INSTRUMENTS_LOG: &str = r#"Instruments Trace Started
2013-01-05 16:20:01 +0000 Start: login screen
2013-01-05 16:20:01 +0000 Debug: target.frontMostApp().mainWindow().buttons()["Log In"].tap()
2013-01-05 16:20:03 +0000 Pass: login screen
2013-01-05 16:20:03 +0000 Start: search  <results> & "filters"
2013-01-05 16:20:04 +0000 Debug: typing 'rust'
2013-01-05 16:20:04 +0000 Error: NSInvalidArgumentException: -[__NSCFString count]: unrecognized selector
2013-01-05 16:20:05 +0000 Error: element is not visible
2013-01-05 16:20:05 +0000 Fail: search
2013-01-05 16:20:06 +0000 Start: logout
Instruments Trace Complete (Duration : 6.1s; Output : /tmp/instrumentscli0.trace)
"#;

#[test]
fn fixtures() {
    let mut mint = Mint::new("tests/fixtures");

    let f = mint
        .new_goldenfile("instruments_run.xml")
        .expect("creating new goldenfile succeeds");

    let clock = ManualClock::new(
        DateTime::parse_from_rfc3339("2013-01-05T16:20:00+00:00").expect("valid timestamp"),
    );
    let mut writer = ReportWriter::with_clock("instruments_run.xml", clock.clone());
    let classifier = InstrumentsClassifier::new();

    // Every log line arrives half a second after the previous one.
    for line in INSTRUMENTS_LOG.lines() {
        clock.advance(Duration::from_millis(500));
        match classifier.classify(line) {
            Some(Event::Complete) => break,
            Some(event) => writer.dispatch(event).expect("events are well-ordered"),
            None => {}
        }
    }

    serialize_suite(writer.suite(), f).expect("serializing instruments_run succeeds");
}
