//! End-to-end tests for command dispatch

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use clubtree::cli::args::Cli;
use clubtree::cli::commands::execute_command;
use clubtree::exitcode;

const MEMBERS: &str = r#"[
    {"id": "l1", "name": "Big Al", "lord": true, "years_attended": [2022, 2023, 2024, 2025, 2026]},
    {"id": "m1", "name": "Ali Hassan", "sponsor": "l1", "years_attended": [2024]},
    {"id": "m2", "name": "Joe Miller", "sponsor": "m1", "funny_story": "Fell in twice."}
]"#;

struct Club {
    dir: TempDir,
    data: PathBuf,
}

#[fixture]
fn club() -> Club {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("members.json");
    fs::write(&data, MEMBERS).unwrap();
    Club { dir, data }
}

fn run(args: &[&str]) -> Result<(), i32> {
    let cli = Cli::try_parse_from(std::iter::once("clubtree").chain(args.iter().copied()))
        .expect("valid arguments");
    execute_command(&cli).map_err(|e| e.exit_code())
}

#[rstest]
#[case(&["tree"])]
#[case(&["tree", "--collapse", "m1"])]
#[case(&["tree", "--collapse-all"])]
#[case(&["search", "ali"])]
#[case(&["year", "2024"])]
#[case(&["fit", "--width", "640", "--height", "480"])]
fn given_data_file_when_running_tree_commands_then_succeed(club: Club, #[case] args: &[&str]) {
    // Arrange
    let data = club.data.to_string_lossy().to_string();
    let mut full: Vec<&str> = args.to_vec();
    full.extend(["--file", data.as_str()]);

    // Act
    let result = run(&full);

    // Assert
    assert_eq!(result, Ok(()));
}

#[rstest]
fn given_known_member_when_showing_then_succeeds(club: Club) {
    let data = club.data.to_string_lossy().to_string();
    assert_eq!(run(&["show", "m2", "--file", data.as_str()]), Ok(()));
}

#[rstest]
fn given_unknown_member_when_showing_then_dataerr(club: Club) {
    let data = club.data.to_string_lossy().to_string();
    assert_eq!(run(&["show", "ghost", "--file", data.as_str()]), Err(exitcode::DATAERR));
}

#[rstest]
fn given_unknown_collapse_id_when_running_then_usage(club: Club) {
    let data = club.data.to_string_lossy().to_string();
    assert_eq!(
        run(&["tree", "--collapse", "ghost", "--file", data.as_str()]),
        Err(exitcode::USAGE)
    );
}

#[test]
fn given_missing_data_file_when_running_then_noinput() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");

    // Act
    let missing = missing.to_string_lossy().to_string();
    let result = run(&["tree", "--file", missing.as_str()]);

    // Assert
    assert_eq!(result, Err(exitcode::NOINPUT));
}

#[test]
fn given_dangling_sponsor_when_running_then_dataerr() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("members.json");
    fs::write(&data, r#"[{"id": "m1", "name": "Lost", "sponsor": "ghost"}]"#).unwrap();

    // Act
    let data = data.to_string_lossy().to_string();
    let result = run(&["tree", "--file", data.as_str()]);

    // Assert
    assert_eq!(result, Err(exitcode::DATAERR));
}

#[rstest]
fn given_config_file_with_data_file_when_running_without_file_then_uses_it(club: Club) {
    // Arrange
    let config = club.dir.path().join("clubtree.toml");
    fs::write(&config, format!("data_file = {:?}\n", club.data.to_string_lossy())).unwrap();

    // Act
    let config = config.to_string_lossy().to_string();
    let result = run(&["-c", config.as_str(), "tree"]);

    // Assert
    assert_eq!(result, Ok(()));
}
