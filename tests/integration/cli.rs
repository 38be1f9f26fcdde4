//! Command line behaviour of the `stargazers` binary

use assert_cmd::Command;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::{repo_body, star_page};

fn stargazers() -> Command {
    let mut cmd = Command::cargo_bin("stargazers").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_PAGE_SIZE")
        .env("RUST_LOG", "stargazers=warn");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let output = stargazers().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["info", "fetch", "compare"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn test_invalid_repo_fails() {
    let output = stargazers()
        .args(["fetch", "--repo", "not-a-repo"])
        .env("GITHUB_API_URL", "http://127.0.0.1:1")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_concurrency_out_of_range_is_rejected() {
    let output = stargazers()
        .args(["info", "--repos", "a/b", "--concurrency", "64"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceeds maximum"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_writes_csv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_body("a/b", 2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/stargazers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(star_page(0, 2)))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("stars.csv");
    let uri = server.uri();
    let out = output_path.clone();

    let output = tokio::task::spawn_blocking(move || {
        stargazers()
            .env("GITHUB_API_URL", uri)
            .args(["fetch", "--repo", "a/b", "--output"])
            .arg(&out)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let contents = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_json_honours_output_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_body("a/b", 2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/stargazers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(star_page(0, 2)))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("stars.jsonl");
    let uri = server.uri();
    let out = output_path.clone();

    let output = tokio::task::spawn_blocking(move || {
        stargazers()
            .env("GITHUB_API_URL", uri)
            .args(["fetch", "--repo", "a/b", "--format", "json", "--output"])
            .arg(&out)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let contents = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("starred_at"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_prints_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/small/one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_body("small/one", 1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/big/one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_name": "big/one",
            "stargazers_count": 99
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        stargazers()
            .env("GITHUB_API_URL", uri)
            .args(["info", "--repos", "small/one,big/one"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "big/one   : 99\nsmall/one : 1\n");
}
