//! End-to-end runs of the command-line application.

use clap::Parser;
use concordance::cli::Cli;
use concordance::input::Corpus;
use concordance::lines::{LineFilter, LineOptions};
use concordance::output::{JsonOutput, Report};
use concordance::{run_app, Concordance, ConcordanceError, ExitCode, NeverCancel, SearchOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ORIGINAL: &str = "fn parse(input: &str) {\n    let x = 1;\n    let y = 2;\n}\n";

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<ExitCode> {
        let config = self.config.to_string_lossy().into_owned();
        let mut argv = vec!["concordance", "-q", "--no-color", "--config", config.as_str()];
        argv.extend_from_slice(args);
        run_app(Cli::try_parse_from(argv).unwrap())
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_scan_finds_duplicate_across_files() {
    let fx = Fixture::new();
    let a = fx.file("a.rs", ORIGINAL);
    let b = fx.file("b.rs", &format!("// copy\n{ORIGINAL}"));
    assert_eq!(fx.run(&["scan", arg(&a), arg(&b)]).unwrap(), ExitCode::Success);
}

#[test]
fn test_scan_without_repeats_reports_no_blocks() {
    let fx = Fixture::new();
    let a = fx.file("a.txt", "one\ntwo\nthree\n");
    assert_eq!(fx.run(&["scan", arg(&a)]).unwrap(), ExitCode::NoBlocks);
}

#[test]
fn test_scan_json_and_csv_output() {
    let fx = Fixture::new();
    let a = fx.file("a.txt", "x\ny\nx\ny\n");
    assert_eq!(
        fx.run(&["scan", "--output", "json", arg(&a)]).unwrap(),
        ExitCode::Success
    );
    assert_eq!(
        fx.run(&["scan", "-o", "csv", arg(&a)]).unwrap(),
        ExitCode::Success
    );
}

#[test]
fn test_min_parts_can_leave_nothing() {
    let fx = Fixture::new();
    let a = fx.file("a.txt", "x\n1\nx\n2\n");
    assert_eq!(
        fx.run(&["scan", "--min-parts", "2", arg(&a)]).unwrap(),
        ExitCode::NoBlocks
    );
}

#[test]
fn test_negative_min_parts_is_rejected() {
    let fx = Fixture::new();
    let a = fx.file("a.txt", "x\nx\n");
    let err = fx.run(&["scan", "--min-parts", "-1", arg(&a)]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConcordanceError>(),
        Some(ConcordanceError::InvalidArgument { name: "min_parts", .. })
    ));
}

#[test]
fn test_invalid_regex_is_rejected() {
    let fx = Fixture::new();
    let a = fx.file("a.txt", "x\nx\n");
    let err = fx.run(&["scan", "--exclude", "(", arg(&a)]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConcordanceError>(),
        Some(ConcordanceError::Pattern { .. })
    ));
}

#[test]
fn test_missing_input_is_io_error() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("missing.txt");
    let err = fx.run(&["scan", arg(&missing)]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConcordanceError>(),
        Some(ConcordanceError::Io { .. })
    ));
}

#[test]
fn test_config_subcommand() {
    let fx = Fixture::new();
    fs::write(&fx.config, "min_parts = 2\n").unwrap();
    assert_eq!(fx.run(&["config"]).unwrap(), ExitCode::Success);
}

#[test]
fn test_report_locations_from_files() {
    let fx = Fixture::new();
    let a = fx.file("a.rs", ORIGINAL);
    let b = fx.file("b.rs", &format!("// copy\n{ORIGINAL}"));

    let corpus = Corpus::read_paths(&[&a, &b]).unwrap();
    let filter = LineFilter::new(&LineOptions::default()).unwrap();
    let outcome = Concordance::new(corpus.lines(), filter)
        .find_blocks(&SearchOptions::new(), &NeverCancel);
    let report = Report::new(&outcome, &corpus);

    assert_eq!(report.blocks.len(), 1);
    let block = &report.blocks[0];
    assert_eq!(block.part_count, 4);
    assert_eq!(block.occurrences[0].source, a.display().to_string());
    assert_eq!(block.occurrences[0].start_line, 1);
    assert_eq!(block.occurrences[1].source, b.display().to_string());
    assert_eq!(block.occurrences[1].start_line, 2);
    assert_eq!(block.occurrences[1].end_line, 5);

    let json = JsonOutput::new(&report, ExitCode::Success).to_json().unwrap();
    assert!(json.contains("\"exit_code_name\":\"CC000\""));
}
