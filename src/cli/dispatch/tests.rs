use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::reporting::{print_navigation_to, print_report_diagnostics_to, report_error_to};
use super::{DispatchDriver, dispatch_command, run_check};
use crate::cli::Command;
use crate::diagnostics::{ErrorFormat, FormatOptions};
use crate::driver::{CheckOptions, CheckReport, CompilerDriver};
use crate::error::{Error, Result};
use crate::logging::LogLevel;

const CLEAN: &str = r#"
class Customer(public string name) {
    public int Age => 40;
}
class Shop {
    Customer customer;
    string Name() => customer?.name;
    int? Age() => customer?.Age;
}
"#;

const FAULTY: &str = r#"
class Person(string name) {
    string Greeting() => "hi " + name;
}
"#;

/// Checks an in-memory source and records the options it was called with.
struct StubDriver {
    source: &'static str,
    calls: RefCell<Vec<(PathBuf, CheckOptions)>>,
}

impl StubDriver {
    fn new(source: &'static str) -> Self {
        Self {
            source,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl DispatchDriver for StubDriver {
    fn check(&self, input: &Path, options: &CheckOptions) -> Result<CheckReport> {
        self.calls
            .borrow_mut()
            .push((input.to_path_buf(), *options));
        CompilerDriver::new().check_source(input, self.source, options)
    }
}

fn report_for(source: &str) -> CheckReport {
    CompilerDriver::new()
        .check_source(Path::new("shop.cl"), source, &CheckOptions::default())
        .unwrap_or_else(|err| panic!("check failed: {err}"))
}

fn check_command(emit_lowered: bool, sequential: bool) -> Command {
    Command::Check {
        input: PathBuf::from("shop.cl"),
        emit_lowered,
        sequential,
        trace_pipeline: false,
    }
}

fn run_to_string(
    driver: &StubDriver,
    command: Command,
    format: ErrorFormat,
) -> (Result<()>, String) {
    let mut out = Vec::new();
    let result = dispatch_command(
        driver,
        command,
        LogLevel::Warn,
        FormatOptions::new(format),
        &mut out,
    );
    (result, String::from_utf8(out).expect("utf8 output"))
}

#[test]
fn check_forwards_options_to_the_driver() {
    let driver = StubDriver::new(CLEAN);
    let (result, output) = run_to_string(&driver, check_command(false, true), ErrorFormat::Short);
    assert!(result.is_ok(), "{result:?}");
    assert!(
        output.contains("check passed for shop.cl (2 declaration(s), 2 null-conditional chain(s))"),
        "{output}"
    );

    let calls = driver.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, PathBuf::from("shop.cl"));
    assert!(!calls[0].1.parallel);
    assert!(!calls[0].1.trace_pipeline);
}

#[test]
fn check_with_errors_fails_after_printing_diagnostics() {
    let driver = StubDriver::new(FAULTY);
    let (result, output) = run_to_string(&driver, check_command(false, false), ErrorFormat::Short);
    let Err(Error::Cli(err)) = result else {
        panic!("expected a CLI error, found {result:?}");
    };
    assert_eq!(
        err.to_string(),
        "1 error(s) reported for shop.cl; see diagnostics above"
    );
    assert!(output.contains("CAP001"), "{output}");
    assert!(!output.contains("check passed"), "{output}");
}

#[test]
fn emit_lowered_lists_chains_in_source_order() {
    let report = report_for(CLEAN);
    let mut out = Vec::new();
    print_navigation_to(&report, false, &mut out).expect("write navigation");
    let text = String::from_utf8(out).expect("utf8 output");
    expect_test::expect![[r#"
        null-conditional chains:
          7:22 customer?.name : reference string
            let $t0 = customer in ($t0 == null ? null : $t0.name)
          8:19 customer?.Age : lifted int?
            let $t0 = customer in ($t0 == null ? null : (int?)($t0.Age))
    "#]]
    .assert_eq(&text);
}

#[test]
fn emit_lowered_in_json_mode_prints_one_object_per_chain() {
    let report = report_for(CLEAN);
    let mut out = Vec::new();
    run_check(&report, true, FormatOptions::new(ErrorFormat::Json), &mut out).expect("clean run");
    let text = String::from_utf8(out).expect("utf8 output");
    let lines: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2, "{text}");
    assert_eq!(lines[0]["kind"], "navigation");
    assert_eq!(lines[0]["text"], "customer?.name");
    assert_eq!(lines[1]["result"], "lifted int?");
    assert_eq!(lines[1]["line"], 8);
    assert!(lines[1]["lowered"].as_str().is_some_and(|form| form.starts_with("let $t0")));
}

#[test]
fn clean_reports_print_no_diagnostics_block() {
    let report = report_for(CLEAN);
    let mut out = Vec::new();
    print_report_diagnostics_to(&report, FormatOptions::new(ErrorFormat::Human), &mut out)
        .expect("write diagnostics");
    assert!(out.is_empty());
}

#[test]
fn help_and_version_write_to_the_output() {
    let driver = StubDriver::new(CLEAN);
    let (result, output) = run_to_string(
        &driver,
        Command::Help {
            topic: Some("resolve".into()),
        },
        ErrorFormat::Human,
    );
    assert!(result.is_ok());
    assert!(output.starts_with("chic-resolve check"), "{output}");

    let (result, output) = run_to_string(&driver, Command::Version, ErrorFormat::Human);
    assert!(result.is_ok());
    assert_eq!(output.trim(), format!("chic-resolve {}", env!("CARGO_PKG_VERSION")));

    let (result, _) = run_to_string(
        &driver,
        Command::Help {
            topic: Some("build".into()),
        },
        ErrorFormat::Human,
    );
    assert!(matches!(result, Err(Error::Cli(_))));
    assert!(driver.calls.borrow().is_empty());
}

#[test]
fn parse_errors_are_reported_with_their_sources() {
    let err = CompilerDriver::new()
        .check_source(Path::new("broken.cl"), "class { ", &CheckOptions::default())
        .expect_err("syntax error");
    let mut out = Vec::new();
    report_error_to(&err, &mut out).expect("write error");
    let text = String::from_utf8(out).expect("utf8 output");
    assert!(text.starts_with("error: "), "{text}");
    assert!(text.contains("broken.cl"), "{text}");
}
