use csv::Trim;
use std::{fs, fs::File, path::PathBuf, process::Command};
use vault_watch::engine::ProjectionRecord;

fn read_records(rdr: impl std::io::Read) -> Vec<ProjectionRecord> {
    let mut rdr = csv::ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
    let mut records: Vec<ProjectionRecord> = vec![];
    for record in rdr.deserialize() {
        records.push(record.unwrap());
    }
    // Sorting to avoid issues with order
    records.sort();
    records
}

#[test]
fn test_project_command() {
    let files_dir = PathBuf::from("./tests/files");

    for entry in fs::read_dir(&files_dir)
        .expect("cannot read files_dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
    {
        let case_dir = entry.path();

        let input_path = case_dir.join("input.csv");
        let expected_output_path = case_dir.join("output.csv");
        let now_path = case_dir.join("now.txt");

        assert!(input_path.exists());
        assert!(expected_output_path.exists());

        let now = fs::read_to_string(now_path).expect("cannot read now.txt");

        let output = Command::new("cargo")
            .arg("run")
            .arg("--")
            .arg("project")
            .arg(&input_path)
            .arg("--at")
            .arg(now.trim())
            .output()
            .expect("failed to execute cargo run");

        assert!(output.status.success(), "case {case_dir:?} failed");

        let generated_res = read_records(output.stdout.as_slice());
        let expected_res = read_records(File::open(expected_output_path).unwrap());

        assert_eq!(generated_res, expected_res, "case {case_dir:?}");
    }
}

#[test]
fn test_project_command_fails_on_missing_ledger() {
    let output = Command::new("cargo")
        .args(["run", "--", "project", "./tests/files/missing.csv", "--at", "0"])
        .output()
        .expect("failed to execute cargo run");

    assert!(!output.status.success());
}

#[test]
fn test_deposit_check_command() {
    let output = Command::new("cargo")
        .args(["run", "--", "deposit-check", "--balance", "1.5", "--amount", "1"])
        .output()
        .expect("failed to execute cargo run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "max_deposit=1.4990\ndeposit=1.0000 ok\n");

    let output = Command::new("cargo")
        .args(["run", "--", "deposit-check", "--balance", "1.5", "--amount", "0"])
        .output()
        .expect("failed to execute cargo run");

    assert!(!output.status.success());
}
