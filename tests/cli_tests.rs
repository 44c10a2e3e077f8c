use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    layout_path: PathBuf,
    corpus_dir: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let layout_path = dir.path().join("layout.json");
        let corpus_dir = dir.path().join("corpus");
        fs::create_dir(&corpus_dir).unwrap();

        fs::write(
            &layout_path,
            r#"{
                "name": "cli",
                "template": [["esc", null, null, null], [null, null, "space", "enter"]],
                "counted": ["a", "b", "c", "d", "e", "space", "enter"],
                "permutable": ["a", "b", "c", "d", "e"]
            }"#,
        )
        .unwrap();

        fs::write(corpus_dir.join("one.txt"), "a bad cab\ndeed ace\n").unwrap();
        fs::write(corpus_dir.join("two.txt"), "bead dab\n").unwrap();

        Self {
            dir,
            layout_path,
            corpus_dir,
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn gridforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gridforge"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn build_bigrams(ctx: &TestContext) -> PathBuf {
    let out = ctx.path("bigrams.csv");
    let output = gridforge(&[
        "bigrams",
        "--corpus",
        ctx.corpus_dir.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--layout",
        ctx.layout_path.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "bigrams failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    out
}

#[test]
fn test_cli_bigrams_writes_csv() {
    let ctx = TestContext::new();
    let out = build_bigrams(&ctx);

    let csv = fs::read_to_string(out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("first,second,probability"));
    assert!(csv.contains("a,space,"));
    assert!(csv.contains("b,enter,"));
}

#[test]
fn test_cli_optimize_json_is_reproducible() {
    let ctx = TestContext::new();
    let bigrams = build_bigrams(&ctx);

    let run = || {
        let output = gridforge(&[
            "optimize",
            "--bigrams",
            bigrams.to_str().unwrap(),
            "--layout",
            ctx.layout_path.to_str().unwrap(),
            "--population-size",
            "12",
            "--max-generation",
            "5",
            "--seed",
            "42",
            "--json",
        ]);
        assert!(
            output.status.success(),
            "optimize failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    };

    let first = run();
    let report: serde_json::Value = serde_json::from_str(&first).expect("stdout is JSON");
    assert_eq!(report["layoutName"], "cli");
    assert_eq!(report["logbook"].as_array().unwrap().len(), 6);
    assert_eq!(report["best"]["rows"][0][0], "esc");
    assert_eq!(first, run(), "same seed must print the same report");
}

#[test]
fn test_cli_config_file_with_override() {
    let ctx = TestContext::new();
    let bigrams = build_bigrams(&ctx);
    let config = ctx.path("config.json");
    fs::write(
        &config,
        r#"{"search": {"population_size": 6, "max_generation": 9, "seed": 1}}"#,
    )
    .unwrap();

    let output = gridforge(&[
        "optimize",
        "--bigrams",
        bigrams.to_str().unwrap(),
        "--layout",
        ctx.layout_path.to_str().unwrap(),
        "--config-file",
        config.to_str().unwrap(),
        "--max-generation",
        "2",
        "--json",
    ]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["logbook"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_table_output() {
    let ctx = TestContext::new();
    let bigrams = build_bigrams(&ctx);
    let output = gridforge(&[
        "optimize",
        "--bigrams",
        bigrams.to_str().unwrap(),
        "--layout",
        ctx.layout_path.to_str().unwrap(),
        "--max-generation",
        "1",
        "--population-size",
        "4",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Best layout"));
    assert!(stdout.contains("esc"));
}

#[test]
fn test_cli_invalid_config_exits_non_zero() {
    let ctx = TestContext::new();
    let bigrams = build_bigrams(&ctx);
    let output = gridforge(&[
        "optimize",
        "--bigrams",
        bigrams.to_str().unwrap(),
        "--layout",
        ctx.layout_path.to_str().unwrap(),
        "--p-mutation",
        "2.0",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("p_mutation"));
}

#[test]
fn test_cli_requires_a_layout_source() {
    let output = gridforge(&["optimize", "--bigrams", "x.csv"]);
    assert!(!output.status.success());
}
