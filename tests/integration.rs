use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const NEVER_SET_KEY: &str = "RAG_ADVISOR_INTEGRATION_KEY_NEVER_SET";

fn advisor_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("advisor");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let docs_dir = root.join("docs");
    fs::create_dir_all(&docs_dir).unwrap();
    fs::write(
        docs_dir.join("alpha.md"),
        "# Delegation\n\nDelegation builds trust between managers and teams.\n\nDelegation also frees time for strategy.",
    )
    .unwrap();
    fs::write(
        docs_dir.join("beta.md"),
        "# Hiring\n\nHiring managers should write clear job descriptions.\n\nStructured interviews reduce bias.",
    )
    .unwrap();
    fs::write(
        docs_dir.join("gamma.txt"),
        "Budget reviews happen quarterly.\n\nFinance teams track spending against plan.",
    )
    .unwrap();

    let config_content = format!(
        r#"[chunking]
max_chars = 400
overlap_chars = 80

[retrieval]
top_k = 3

[generation]
api_key_env = "{}"
"#,
        NEVER_SET_KEY
    );

    let config_path = config_dir.join("advisor.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_advisor(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = advisor_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove(NEVER_SET_KEY)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run advisor binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn docs_arg(tmp: &TempDir) -> String {
    tmp.path().join("docs").to_str().unwrap().to_string()
}

#[test]
fn test_prompt_without_documents_is_standard() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_advisor(&config_path, &["prompt", "How do I delegate?"]);
    assert!(success, "prompt failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Provide professional, strategic advice on the following question:"));
    assert!(stdout.contains("User Question: How do I delegate?"));
    assert!(!stdout.contains("Context from management documents"));
    assert!(stderr.contains("mode: no-corpus"));
}

#[test]
fn test_prompt_with_documents_includes_context() {
    let (tmp, config_path) = setup_test_env();
    let docs = docs_arg(&tmp);

    let (stdout, stderr, success) = run_advisor(
        &config_path,
        &["--progress", "off", "prompt", "Why does delegation matter?", "--docs", &docs],
    );
    assert!(success, "prompt failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Context from management documents:"));
    assert!(stdout.contains("Delegation builds trust between managers and teams."));
    assert!(stdout.contains("User Question: Why does delegation matter?"));
    assert!(!stdout.contains("Structured interviews"));
    assert!(stderr.contains("mode: augmented"));
}

#[test]
fn test_prompt_without_matches_falls_back() {
    let (tmp, config_path) = setup_test_env();
    let docs = docs_arg(&tmp);

    let (stdout, stderr, success) = run_advisor(
        &config_path,
        &["prompt", "Pricing?", "--docs", &docs],
    );
    assert!(success, "prompt failed: stdout={}, stderr={}", stdout, stderr);
    assert!(!stdout.contains("Context from management documents"));
    assert!(stdout.contains("User Question: Pricing?"));
    assert!(stderr.contains("mode: retrieval-empty"));
}

#[test]
fn test_search_orders_by_overlap() {
    let (tmp, config_path) = setup_test_env();
    let docs = docs_arg(&tmp);

    let (stdout, stderr, success) = run_advisor(
        &config_path,
        &["search", "delegation teams", "--docs", &docs],
    );
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);

    let alpha = stdout.find("alpha.md").expect("alpha.md missing");
    let gamma = stdout.find("gamma.txt").expect("gamma.txt missing");
    assert!(alpha < gamma, "expected alpha before gamma: {}", stdout);
    assert!(stdout.contains("[score 2]"));
    assert!(stdout.contains("[score 1]"));
    assert!(!stdout.contains("beta.md"));
}

#[test]
fn test_search_limit() {
    let (tmp, config_path) = setup_test_env();
    let docs = docs_arg(&tmp);

    let (stdout, _, success) = run_advisor(
        &config_path,
        &["search", "delegation teams", "--docs", &docs, "--limit", "1"],
    );
    assert!(success);
    assert!(stdout.contains("alpha.md"));
    assert!(!stdout.contains("gamma.txt"));
}

#[test]
fn test_search_without_documents() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_advisor(&config_path, &["search", "delegation"]);
    assert!(success);
    assert!(stdout.contains("No documents loaded."));
}

#[test]
fn test_chunks_reports_each_document() {
    let (tmp, config_path) = setup_test_env();
    let docs = docs_arg(&tmp);

    let (stdout, stderr, success) = run_advisor(&config_path, &["chunks", "--docs", &docs]);
    assert!(success, "chunks failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("max_chars=400 overlap_chars=80"));
    assert!(stdout.contains("alpha.md  1 chunks"));
    assert!(stdout.contains("beta.md  1 chunks"));
    assert!(stdout.contains("gamma.txt  1 chunks"));
    assert!(stdout.contains("total: 3 chunks"));
}

#[test]
fn test_json_progress_on_stderr() {
    let (tmp, config_path) = setup_test_env();
    let docs = docs_arg(&tmp);

    let (stdout, stderr, success) = run_advisor(
        &config_path,
        &["--progress", "json", "prompt", "delegation", "--docs", &docs],
    );
    assert!(success);
    assert!(stderr.contains(r#""event":"extracting""#));
    assert!(stderr.contains(r#""event":"ready""#));
    assert!(!stdout.contains(r#""event""#));
}

#[test]
fn test_invalid_chunking_config_fails() {
    let (tmp, _) = setup_test_env();
    let bad_config = tmp.path().join("config").join("bad.toml");
    fs::write(&bad_config, "[chunking]\nmax_chars = 100\noverlap_chars = 100\n").unwrap();

    let (_, stderr, success) = run_advisor(&bad_config, &["prompt", "anything"]);
    assert!(!success);
    assert!(stderr.contains("chunking"), "stderr: {}", stderr);
}

#[test]
fn test_missing_document_path_fails() {
    let (tmp, config_path) = setup_test_env();
    let missing = tmp.path().join("nope.pdf");

    let (_, stderr, success) = run_advisor(
        &config_path,
        &["prompt", "anything", "--docs", missing.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("does not exist"), "stderr: {}", stderr);
}

#[test]
fn test_ask_without_api_key_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_advisor(&config_path, &["ask", "How do I delegate?"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains(NEVER_SET_KEY), "stderr: {}", stderr);
}

#[test]
fn test_check_key_without_api_key_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_advisor(&config_path, &["check-key"]);
    assert!(!success);
    assert!(stderr.contains("API key not provided"), "stderr: {}", stderr);
}

#[test]
fn test_missing_config_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("absent.toml");

    let (stdout, _, success) = run_advisor(&config_path, &["chunks"]);
    assert!(success);
    assert!(stdout.contains("max_chars=1000 overlap_chars=200"));
}
