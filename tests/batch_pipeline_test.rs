//! End-to-end pipeline tests using fake validator executables.
//!
//! A shell script stands in for the Java runtime: dispatching on the jar
//! argument, it either writes a canned JHOVE report to the `-out` path
//! (structural validator) or prints a canned SVRL report to stdout
//! (schema-rule validator). Markers embedded in the EPUB stand-in files
//! steer which canned report each one gets.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use validate_epub::config::ToolConfig;
use validate_epub::file_discovery::FileDiscovery;
use validate_epub::logs::{LINE_SEP, RunLogs};
use validate_epub::orchestrator::BatchOrchestrator;

const FAKE_JAVA: &str = r#"#!/bin/sh
jar="$2"
case "$jar" in
*epubcheck*)
    input="$3"
    out="$5"
    if grep -q STRUCTURAL_BAD "$input" 2>/dev/null; then
        cat > "$out" <<'XML'
<jhove xmlns="http://hul.harvard.edu/ois/xml/ns/jhove">
  <repInfo>
    <status>Not well-formed</status>
    <version>2.0.1</version>
    <messages>
      <message>container.opf missing</message>
      <message>spine is empty</message>
    </messages>
  </repInfo>
</jhove>
XML
    elif grep -q RULE_BAD "$input" 2>/dev/null; then
        cat > "$out" <<'XML'
<jhove xmlns="http://hul.harvard.edu/ois/xml/ns/jhove">
  <repInfo>
    <status>Well-formed</status>
    <version>2.0.1</version>
    <comment>RULE_BAD</comment>
  </repInfo>
</jhove>
XML
    else
        cat > "$out" <<'XML'
<jhove xmlns="http://hul.harvard.edu/ois/xml/ns/jhove">
  <repInfo>
    <status>Well-formed</status>
    <version>2.0.1</version>
  </repInfo>
</jhove>
XML
    fi
    ;;
*probatron*)
    report="$3"
    if grep -q RULE_BAD "$report" 2>/dev/null; then
        cat <<'XML'
<svrl:schematron-output xmlns:svrl="http://purl.oclc.org/dsdl/svrl">
  <svrl:failed-assert test="rule-1">
    <svrl:text>missing alt-text</svrl:text>
  </svrl:failed-assert>
</svrl:schematron-output>
XML
    else
        cat <<'XML'
<svrl:schematron-output xmlns:svrl="http://purl.oclc.org/dsdl/svrl"/>
XML
    fi
    ;;
esac
exit 0
"#;

struct Fixture {
    _temp: TempDir,
    batch_dir: PathBuf,
    out_dir: PathBuf,
    config: ToolConfig,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let batch_dir = root.join("batch");
    let out_dir = root.join("out");
    std::fs::create_dir_all(&batch_dir).unwrap();
    std::fs::create_dir_all(&out_dir).unwrap();

    let java = root.join("fake-java");
    std::fs::write(&java, FAKE_JAVA).unwrap();
    make_executable(&java);

    let epubcheck_jar = root.join("epubcheck.jar");
    let probatron_jar = root.join("probatron.jar");
    std::fs::write(&epubcheck_jar, "stub").unwrap();
    std::fs::write(&probatron_jar, "stub").unwrap();

    Fixture {
        _temp: temp,
        batch_dir,
        out_dir,
        config: ToolConfig {
            java,
            epubcheck_jar,
            probatron_jar,
        },
    }
}

fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

fn orchestrator(fixture: &Fixture) -> BatchOrchestrator {
    BatchOrchestrator::new(
        fixture.config.clone(),
        "file:///schemas/master.sch".to_string(),
        fixture.out_dir.clone(),
        Duration::from_secs(10),
    )
}

async fn run_batch(fixture: &Fixture) -> (String, String) {
    let discovery = FileDiscovery::new("epub");
    let files = discovery.discover(&fixture.batch_dir).await.unwrap();

    let mut logs = RunLogs::create(&fixture.out_dir).await.unwrap();
    let summary = orchestrator(fixture)
        .run(&files, &mut logs)
        .await
        .unwrap();
    assert_eq!(summary.total, files.len());

    (
        std::fs::read_to_string(logs.status_path()).unwrap(),
        std::fs::read_to_string(logs.details_path()).unwrap(),
    )
}

#[tokio::test]
async fn test_mixed_batch_verdicts() {
    let fixture = fixture();
    std::fs::write(fixture.batch_dir.join("clean.epub"), "fine").unwrap();
    std::fs::write(fixture.batch_dir.join("broken.epub"), "STRUCTURAL_BAD").unwrap();
    std::fs::write(fixture.batch_dir.join("rules.epub"), "RULE_BAD").unwrap();

    let (status, details) = run_batch(&fixture).await;

    let rows: Vec<&str> = status.lines().collect();
    assert_eq!(rows.len(), 3);
    // Discovery sorts, so rows are in file-name order.
    assert!(rows[0].ends_with("broken.epub,fail"));
    assert!(rows[1].ends_with("clean.epub,pass"));
    assert!(rows[2].ends_with("rules.epub,fail"));

    // Structural failure block: status, version and both messages in order.
    assert!(details.contains("validation status: Not well-formed"));
    let opf = details.find("container.opf missing").unwrap();
    let spine = details.find("spine is empty").unwrap();
    assert!(opf < spine);

    // Rule failure block carries the formatted assertion message.
    assert!(details.contains(r#"Test "rule-1" failed (missing alt-text)"#));

    // Clean file block has no error sections.
    let clean_block = details
        .split("####")
        .find(|block| block.contains("clean.epub"))
        .unwrap();
    assert!(clean_block.contains("validation status: Well-formed"));
    assert!(clean_block.contains("epub version: 2.0.1"));
    assert!(!clean_block.contains("***"));

    // One record separator per file.
    assert_eq!(details.matches("####").count(), 3);
}

#[tokio::test]
async fn test_missing_validator_never_drops_records() {
    let fixture = fixture();
    std::fs::write(fixture.batch_dir.join("a.epub"), "fine").unwrap();
    std::fs::write(fixture.batch_dir.join("b.epub"), "fine").unwrap();

    let broken = Fixture {
        config: ToolConfig {
            java: PathBuf::from("/nonexistent/java"),
            ..fixture.config.clone()
        },
        ..fixture
    };

    let (status, details) = run_batch(&broken).await;

    let rows: Vec<&str> = status.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.ends_with(",fail")));

    assert!(details.contains("Error running structural validator"));
    assert!(details.contains("Error running schema validator"));
    assert!(details.contains("epub version: unavailable"));
}

#[tokio::test]
async fn test_empty_batch_creates_empty_logs() {
    let fixture = fixture();

    let (status, details) = run_batch(&fixture).await;

    assert!(status.is_empty());
    assert!(details.is_empty());
    assert!(fixture.out_dir.join("status.csv").is_file());
    assert!(fixture.out_dir.join("details.txt").is_file());
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let fixture = fixture();
    std::fs::write(fixture.batch_dir.join("clean.epub"), "fine").unwrap();
    std::fs::write(fixture.batch_dir.join("rules.epub"), "RULE_BAD").unwrap();

    let (first_status, first_details) = run_batch(&fixture).await;
    let (second_status, second_details) = run_batch(&fixture).await;

    assert_eq!(first_status, second_status);
    assert_eq!(first_details, second_details);
}

#[tokio::test]
async fn test_status_lines_use_native_separator() {
    let fixture = fixture();
    std::fs::write(fixture.batch_dir.join("clean.epub"), "fine").unwrap();

    let (status, _) = run_batch(&fixture).await;
    assert!(status.ends_with(LINE_SEP));
}
