#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search-movie"))
        .stdout(predicate::str::contains("genres"));
}

#[test]
fn test_movie_requires_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.arg("movie")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<ID>"));
}

#[test]
fn test_movie_without_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.env_remove("TMDB_API_KEY")
        .args(["movie", "916224", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key is required"));
}

#[test]
fn test_config_init_writes_template() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success();

    // Assert
    let content = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(content.contains("[tmdb]"));
    assert!(content.contains("auto_retry = true"));
    assert!(content.contains("max_attempts = 5"));
}

#[test]
fn test_config_init_refuses_existing_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[tmdb]\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[tmdb\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.args(["genres", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_rate_out_of_range() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.args(["rate", "916224", "11", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("rating must be between 0.5 and 10.0"));
}

#[test]
fn test_unrate_without_session() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\napi_key = \"test-key\"\nbase_url = \"http://127.0.0.1:9/3\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinedb");
    cmd.env_remove("TMDB_API_KEY")
        .env_remove("TMDB_SESSION_ID")
        .args(["unrate", "916224", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("session id is not set"));
}
