//! `orgsync roster` end to end, with Asana and GitHub mocked by mockito.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const CONTENTS: &str = "/repos/cc/site/contents/databags/team.json";

fn write_config(dir: &Path, github: &str, asana: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let yaml = format!(
        "github:\n  org: cc\n  api_url: {github}\n  timeout_secs: 5\n\
         roster:\n  api_url: {asana}\n  section: \"42\"\n  target:\n    repository: cc/site\n    path: databags/team.json\n"
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

fn orgsync(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("orgsync").unwrap();
    cmd.env("HOME", home)
        .env("NO_COLOR", "1")
        .env("ADMIN_GITHUB_TOKEN", "gh")
        .env("ADMIN_ASANA_TOKEN", "as")
        .env_remove("RUST_LOG");
    cmd
}

fn mock_tasks(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/sections/42/tasks")
        .match_header("authorization", "Bearer as")
        .match_query(Matcher::Any)
        .with_body(
            json!({
                "data": [
                    {"name": "", "custom_fields": []},
                    {"name": "Alice", "custom_fields": [
                        {"name": "Role", "enum_value": {"name": "Lead"}},
                        {"name": "Project Name", "enum_value": {"name": "X"}},
                        {"name": "Repo(s)", "text_value": "x-app"}
                    ]},
                    {"name": "Bob", "custom_fields": []}
                ],
                "next_page": null
            })
            .to_string(),
        )
        .create()
}

#[test]
fn show_lists_members_with_summaries() {
    let mut asana = Server::new();
    let _m = mock_tasks(&mut asana);

    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), "http://127.0.0.1:9", &asana.url());
    orgsync(home.path())
        .args(["--config", config.to_str().unwrap(), "roster", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Lead for the X project, has privileges for the x-app repository",
        ))
        .stdout(predicate::str::contains("Bob"))
        .stdout(predicate::str::contains("2 members across 1 projects"));
}

#[test]
fn publish_dry_run_does_not_commit() {
    let mut asana = Server::new();
    let mut github = Server::new();
    let _m = mock_tasks(&mut asana);
    let _m = github
        .mock("GET", CONTENTS)
        .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create();
    let put = github.mock("PUT", CONTENTS).expect(0).create();

    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &github.url(), &asana.url());
    orgsync(home.path())
        .args(["--config", config.to_str().unwrap(), "roster", "publish", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"))
        .stdout(predicate::str::contains("cc/site:databags/team.json"));

    put.assert();
}

#[test]
fn publish_commits_rendered_databag() {
    let mut asana = Server::new();
    let mut github = Server::new();
    let _m = mock_tasks(&mut asana);
    let _m = github
        .mock("GET", CONTENTS)
        .match_query(Matcher::Any)
        .with_status(404)
        .create();
    let put = github
        .mock("PUT", CONTENTS)
        .match_header("authorization", "Bearer gh")
        .match_body(Matcher::PartialJson(json!({
            "message": "Update roster databag",
            "branch": "main"
        })))
        .with_status(201)
        .with_body(json!({"commit": {"sha": "f00d"}}).to_string())
        .expect(1)
        .create();

    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &github.url(), &asana.url());
    orgsync(home.path())
        .args(["--config", config.to_str().unwrap(), "roster", "publish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("commit f00d"));

    put.assert();
}

#[test]
fn diff_shows_added_lines_for_new_file() {
    let mut asana = Server::new();
    let mut github = Server::new();
    let _m = mock_tasks(&mut asana);
    let _m = github
        .mock("GET", CONTENTS)
        .match_query(Matcher::Any)
        .with_status(404)
        .create();

    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &github.url(), &asana.url());
    orgsync(home.path())
        .args(["--config", config.to_str().unwrap(), "roster", "diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+++ b/databags/team.json"))
        .stdout(predicate::str::contains("+            \"name\": \"X\""));
}

#[test]
fn missing_roster_section_is_an_error() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("config.yaml");
    std::fs::write(&path, "github:\n  org: cc\n").unwrap();

    orgsync(home.path())
        .args(["--config", path.to_str().unwrap(), "roster", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("roster"));
}

#[test]
fn missing_asana_token_names_the_variable() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), "http://127.0.0.1:9", "http://127.0.0.1:9");

    orgsync(home.path())
        .env_remove("ADMIN_ASANA_TOKEN")
        .args(["--config", config.to_str().unwrap(), "roster", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ADMIN_ASANA_TOKEN"));
}
