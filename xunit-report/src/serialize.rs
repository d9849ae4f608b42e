// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `TestSuite`.

use crate::{TestCase, TestSuite};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::Attribute},
    name::QName,
};
use std::{borrow::Cow, io, time::Duration};

static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";
static FAILURE_TAG: &str = "failure";

const INDENT: usize = 2;

/// Escapes `input` for use in XML text or a quoted attribute value.
///
/// `&`, `<`, `>`, `'` and `"` are replaced by their entity references. The input is scanned
/// once, so existing entity references are escaped again rather than passed through.
pub fn xml_escape(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(['&', '<', '>', '\'', '"']) else {
        return Cow::Borrowed(input);
    };

    let mut escaped = String::with_capacity(input.len() + 16);
    escaped.push_str(&input[..first]);
    for c in input[first..].chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Serializes `suite` as an xUnit XML document into `writer`.
pub fn serialize_suite(suite: &TestSuite, writer: impl io::Write) -> quick_xml::Result<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', INDENT);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), Some("yes"));
    writer.write_event(Event::Decl(decl))?;

    serialize_testsuite(suite, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

fn serialize_testsuite(
    suite: &TestSuite,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut testsuite_tag = BytesStart::new(TESTSUITE_TAG);
    push_attribute(&mut testsuite_tag, "name", suite.name());
    push_attribute(
        &mut testsuite_tag,
        "timestamp",
        &suite.timestamp().format("%+").to_string(),
    );
    push_attribute(&mut testsuite_tag, "time", &serialize_time(suite.total_time()));
    push_attribute(&mut testsuite_tag, "tests", &suite.tests().to_string());
    push_attribute(&mut testsuite_tag, "failures", &suite.failures().to_string());
    writer.write_event(Event::Start(testsuite_tag))?;

    for test_case in suite.test_cases() {
        serialize_testcase(test_case, writer)?;
    }

    serialize_end_tag(TESTSUITE_TAG, writer)
}

fn serialize_testcase(
    test_case: &TestCase,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut testcase_tag = BytesStart::new(TESTCASE_TAG);
    push_attribute(&mut testcase_tag, "name", test_case.name());
    push_attribute(&mut testcase_tag, "time", &serialize_time(test_case.elapsed()));
    writer.write_event(Event::Start(testcase_tag))?;

    if test_case.is_failed() {
        let description = test_case
            .messages()
            .iter()
            .map(|message| xml_escape(message))
            .collect::<Vec<_>>()
            .join("\n");

        writer.write_event(Event::Start(BytesStart::new(FAILURE_TAG)))?;
        writer.write_event(Event::Text(BytesText::from_escaped(description)))?;
        serialize_end_tag(FAILURE_TAG, writer)?;
    }

    serialize_end_tag(TESTCASE_TAG, writer)
}

// quick-xml's own attribute escaping is bypassed so that the output is exactly what
// `xml_escape` produces.
fn push_attribute(tag: &mut BytesStart<'_>, key: &'static str, value: &str) {
    tag.push_attribute(Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(xml_escape(value).into_owned().into_bytes()),
    });
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))?;
    Ok(())
}

// Serialize time as fractional seconds in the shortest form that round-trips, so zero is "0".
fn serialize_time(time: Duration) -> String {
    time.as_secs_f64().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeDelta};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn t0() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-01T10:00:00+00:00").unwrap()
    }

    fn to_string(suite: &TestSuite) -> String {
        let mut buf = vec![];
        serialize_suite(suite, &mut buf).expect("serializing to a Vec succeeds");
        String::from_utf8(buf).expect("output is UTF-8")
    }

    #[test_case("plain", "plain" ; "nothing to escape")]
    #[test_case("&<>'\"", "&amp;&lt;&gt;&apos;&quot;" ; "all reserved characters")]
    #[test_case("&amp;", "&amp;amp;" ; "entity is escaped again")]
    #[test_case("a < b && c > d", "a &lt; b &amp;&amp; c &gt; d" ; "mixed")]
    #[test_case("caf\u{e9} \"\u{1f600}\"", "caf\u{e9} &quot;\u{1f600}&quot;" ; "non-ascii")]
    fn escape(input: &str, expected: &str) {
        assert_eq!(xml_escape(input), expected);
    }

    #[test]
    fn escape_borrows_clean_input() {
        assert!(matches!(xml_escape("no entities here"), Cow::Borrowed(_)));
    }

    #[test]
    fn empty_suite() {
        let suite = TestSuite::new("empty", t0());
        assert_eq!(
            to_string(&suite),
            indoc! {r#"
                <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
                <testsuite name="empty" timestamp="2024-03-01T10:00:00+00:00" time="0" tests="0" failures="0">
                </testsuite>
            "#}
        );
    }

    #[test]
    fn failed_and_passed_cases() {
        let mut suite = TestSuite::new("fake_file_path", t0());

        let mut failed = TestCase::new("failed case", t0());
        failed
            .append("foo")
            .append("<bar> & 'baz'")
            .fail(t0() + TimeDelta::milliseconds(1500));
        suite.add_test_case(failed);

        let mut passed = TestCase::new("passed \"case\"", t0());
        passed.append("ignored").pass(t0() + TimeDelta::milliseconds(250));
        suite.add_test_case(passed);

        assert_eq!(
            to_string(&suite),
            indoc! {r#"
                <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
                <testsuite name="fake_file_path" timestamp="2024-03-01T10:00:00+00:00" time="1.75" tests="2" failures="1">
                  <testcase name="failed case" time="1.5">
                    <failure>foo
                &lt;bar&gt; &amp; &apos;baz&apos;</failure>
                  </testcase>
                  <testcase name="passed &quot;case&quot;" time="0.25">
                  </testcase>
                </testsuite>
            "#}
        );
    }

    #[test]
    fn running_case_has_empty_failure() {
        let mut suite = TestSuite::new("running", t0());
        suite.add_test_case(TestCase::new("never finished", t0()));

        let output = to_string(&suite);
        assert!(
            output.contains(
                "  <testcase name=\"never finished\" time=\"0\">\n    <failure></failure>\n"
            ),
            "unexpected output:\n{output}"
        );
        assert!(output.contains("tests=\"1\" failures=\"1\""));
    }
}
