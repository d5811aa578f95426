//! CLI integration tests
//!
//! These tests run the built binary against a fake `llmfit` shell script and
//! verify:
//! - The progress trace
//! - opencode.json updates and idempotence
//! - Launch script patching
//! - Exit codes for fatal errors

#![cfg(unix)]

use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const RECOMMENDATIONS: &str = r#"{
  "models": [
    {"name": "org/model-7b", "score": 97.5},
    {"name": "org/existing", "context_length": 8192, "best_quant": "Q8_0"},
    {"name": "org/small-3b", "context_length": 16000, "best_quant": "AWQ"}
  ]
}"#;

const OPENCODE: &str = r#"{
  "$schema": "https://opencode.ai/config.json",
  "provider": {
    "vllm": {
      "npm": "@ai-sdk/openai-compatible",
      "models": {
        "org/existing": {
          "name": "Existing (hand tuned)",
          "contextWindow": 4096,
          "maxTokens": 512
        }
      }
    }
  }
}"#;

const RUN_SH: &str = "#!/bin/bash\nvllm serve \\\n    --model org/existing \\\n    --port 8000\n";

fn setup_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_llmfit-setup"))
}

/// Writes an executable `llmfit` into `dir` that runs `body`
fn write_fake_llmfit(dir: &Path, body: &str) {
    let path = dir.join("llmfit");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write fake llmfit");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake llmfit executable");
}

fn recommending_llmfit(dir: &Path) {
    write_fake_llmfit(
        dir,
        &format!(
            "[ \"$1 $2\" = \"recommend --json\" ] || exit 9\nprintf '%s\\n' '{}'",
            RECOMMENDATIONS
        ),
    );
}

/// Creates a project directory with opencode.json, run.sh and a fake llmfit
fn create_project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("opencode.json"), OPENCODE).expect("Failed to write opencode.json");
    fs::write(dir.path().join("run.sh"), RUN_SH).expect("Failed to write run.sh");
    recommending_llmfit(dir.path());
    dir
}

fn run_setup(dir: &Path, extra_args: &[&str]) -> Output {
    let empty_path = dir.join("empty-path");
    fs::create_dir_all(&empty_path).expect("Failed to create empty PATH dir");

    run_setup_with_path(dir, &empty_path, extra_args)
}

/// Runs the binary with `search_path` as PATH and no `LLMFIT_SETUP_*` overrides
fn run_setup_with_path(dir: &Path, search_path: &Path, extra_args: &[&str]) -> Output {
    Command::new(setup_bin())
        .arg("-C")
        .arg(dir)
        .args(extra_args)
        .env("PATH", search_path)
        .env_remove("RUST_LOG")
        .env_remove("LLMFIT_SETUP_CONFIG")
        .env_remove("LLMFIT_SETUP_SCRIPT")
        .env_remove("LLMFIT_SETUP_UPDATE_SCRIPT")
        .env_remove("LLMFIT_SETUP_LLMFIT")
        .env_remove("LLMFIT_SETUP_LOG_LEVEL")
        .output()
        .expect("Failed to execute llmfit-setup")
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).expect("Failed to read file"))
        .expect("File is not valid JSON")
}

#[test]
#[serial]
fn test_cli_help() {
    let output = Command::new(setup_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute llmfit-setup");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("llmfit-setup"));
    assert!(stdout.contains("--update-script"));
    assert!(stdout.contains("--config"));
}

#[test]
#[serial]
fn test_cli_version() {
    let output = Command::new(setup_bin())
        .arg("--version")
        .output()
        .expect("Failed to execute llmfit-setup");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
#[serial]
fn test_adds_recommended_models() {
    let project = create_project();
    let output = run_setup(project.path(), &[]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("🚀 Starting auto-configuration process..."));
    assert!(stdout.contains("in current directory."));
    assert!(stdout.contains("➕ Added org/model-7b"));
    assert!(stdout.contains("➕ Added org/small-3b"));
    assert!(!stdout.contains("➕ Added org/existing"));
    assert!(stdout.contains("✅ Successfully added 2 models"));
    assert!(stdout.contains("🎉 Auto-configuration complete!"));

    let config = read_json(&project.path().join("opencode.json"));
    let models = &config["provider"]["vllm"]["models"];
    assert_eq!(
        models["org/model-7b"],
        serde_json::json!({"name": "model-7b (vLLM, auto)", "contextWindow": 32768, "maxTokens": 8192})
    );
    assert_eq!(
        models["org/small-3b"],
        serde_json::json!({"name": "small-3b (vLLM, AWQ)", "contextWindow": 16000, "maxTokens": 4000})
    );
    assert_eq!(
        models["org/existing"],
        serde_json::json!({"name": "Existing (hand tuned)", "contextWindow": 4096, "maxTokens": 512})
    );
    assert_eq!(config["$schema"], "https://opencode.ai/config.json");

    // Script patching is off by default
    assert_eq!(
        fs::read_to_string(project.path().join("run.sh")).unwrap(),
        RUN_SH
    );
}

#[test]
#[serial]
fn test_second_run_is_idempotent() {
    let project = create_project();
    let config_path = project.path().join("opencode.json");

    assert!(run_setup(project.path(), &[]).status.success());
    let after_first = fs::read_to_string(&config_path).unwrap();

    let output = run_setup(project.path(), &[]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&config_path).unwrap(), after_first);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is already up-to-date with llmfit recommendations."));
    assert!(!stdout.contains("➕"));
}

#[test]
#[serial]
fn test_update_script_sets_best_model() {
    let project = create_project();
    let output = run_setup(project.path(), &["--update-script"]);

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(project.path().join("run.sh")).unwrap(),
        "#!/bin/bash\nvllm serve \\\n    --model org/model-7b \\\n    --port 8000\n"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✅ Successfully set default model to org/model-7b"));
}

#[test]
#[serial]
fn test_missing_script_does_not_fail_run() {
    let project = create_project();
    fs::remove_file(project.path().join("run.sh")).unwrap();

    let output = run_setup(project.path(), &["--update-script"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run.sh not found."));
    assert!(stdout.contains("🎉 Auto-configuration complete!"));
}

#[test]
#[serial]
fn test_custom_config_path() {
    let project = create_project();
    fs::create_dir_all(project.path().join("conf")).unwrap();
    fs::rename(
        project.path().join("opencode.json"),
        project.path().join("conf/agent.json"),
    )
    .unwrap();

    let output = run_setup(project.path(), &["--config", "conf/agent.json"]);

    assert!(output.status.success());
    let config = read_json(&project.path().join("conf/agent.json"));
    assert!(config["provider"]["vllm"]["models"]
        .get("org/model-7b")
        .is_some());
}

#[test]
#[serial]
fn test_missing_config_exits_with_error() {
    let project = create_project();
    fs::remove_file(project.path().join("opencode.json")).unwrap();

    let output = run_setup(project.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("❌"));
    assert!(stderr.contains("opencode.json not found."));
}

#[test]
#[serial]
fn test_missing_vllm_provider_leaves_config_untouched() {
    let project = create_project();
    let original = r#"{"provider": {"ollama": {}}}"#;
    fs::write(project.path().join("opencode.json"), original).unwrap();

    let output = run_setup(project.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing provider.vllm"));
    assert_eq!(
        fs::read_to_string(project.path().join("opencode.json")).unwrap(),
        original
    );
}

#[test]
#[serial]
fn test_llmfit_failure_reports_stderr() {
    let project = create_project();
    write_fake_llmfit(project.path(), "echo 'no supported hardware' >&2\nexit 2");

    let output = run_setup(project.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("llmfit failed"));
    assert!(stderr.contains("no supported hardware"));
    assert_eq!(
        fs::read_to_string(project.path().join("opencode.json")).unwrap(),
        OPENCODE
    );
}

#[test]
#[serial]
fn test_llmfit_garbage_output() {
    let project = create_project();
    write_fake_llmfit(project.path(), "echo 'Scanning hardware...'");

    let output = run_setup(project.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse llmfit JSON output"));
    assert!(stderr.contains("Output was: Scanning hardware..."));
}

#[test]
#[serial]
fn test_llmfit_array_output_is_fatal() {
    let project = create_project();
    write_fake_llmfit(project.path(), "echo '[]'");

    let output = run_setup(project.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unexpected llmfit JSON output"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("no model recommendations"));
    assert_eq!(
        fs::read_to_string(project.path().join("opencode.json")).unwrap(),
        OPENCODE
    );
}

#[test]
#[serial]
fn test_llmfit_not_found() {
    let project = create_project();
    fs::remove_file(project.path().join("llmfit")).unwrap();

    let output = run_setup(project.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not find llmfit"));
    assert!(stderr.contains("cargo install llmfit"));
}

#[test]
#[serial]
fn test_llmfit_found_on_path() {
    let project = create_project();
    fs::remove_file(project.path().join("llmfit")).unwrap();
    let bin_dir = TempDir::new().unwrap();
    recommending_llmfit(bin_dir.path());

    let output = run_setup_with_path(project.path(), bin_dir.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✅ Found llmfit in PATH:"));
}

#[test]
#[serial]
fn test_llmfit_override() {
    let project = create_project();
    fs::remove_file(project.path().join("llmfit")).unwrap();
    let tools = TempDir::new().unwrap();
    recommending_llmfit(tools.path());
    let tool = tools.path().join("llmfit");

    let output = run_setup(project.path(), &["--llmfit", tool.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("✅ Using llmfit at"));
}

#[test]
#[serial]
fn test_quiet_mode_suppresses_progress() {
    let project = create_project();
    let output = run_setup(project.path(), &["-q"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
#[serial]
fn test_empty_recommendations_succeed() {
    let project = create_project();
    write_fake_llmfit(project.path(), "echo '{\"models\": []}'");

    let output = run_setup(project.path(), &["--update-script"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("⚠️ llmfit returned no model recommendations."));
    assert_eq!(
        fs::read_to_string(project.path().join("run.sh")).unwrap(),
        RUN_SH
    );
}
