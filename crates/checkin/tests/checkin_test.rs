use docgen_checkin::rules::{
    DENY_LIST_WORD, FILE_NAME_SPACES, FILE_TOO_LARGE, POSSIBLE_ACCESS_KEY, SNIPPET_TAG,
};
use docgen_checkin::{progress_report, run_checks, write_csv, CheckinConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "python/example_code/s3/hello.py",
        "# snippet-start:[python.s3.hello]\nprint('hello')\nprint('world')\n# snippet-end:[python.s3.hello]\n",
    );
    write(
        root,
        "python/example_code/s3/legacy.py",
        "# snippet-sourcedescription:[Lists buckets.]\n# snippet-service:[s3]\nimport boto3\n",
    );
    write(
        root,
        "python/example_code/sqs/creds.py",
        "KEY = 'AKIAZZZZZZZZZZZZZZ12'\n# snippet-start:[python.sqs.send]\n",
    );
    write(
        root,
        "javascript/notes file.md",
        "Draft at https://integ-docs-aws.amazon.com/page\n",
    );
    write(root, "node_modules/pkg/index.js", "const k = 'AKIAZZZZZZZZZZZZZZ12';\n");
    dir
}

#[test]
fn test_run_checks_finds_each_rule() {
    let repo = fixture_repo();
    let report = run_checks(repo.path(), &CheckinConfig::default()).unwrap();

    // node_modules is never walked
    assert_eq!(report.files_checked, 4);
    assert!(!report.is_clean());

    let rules: Vec<(&str, &str)> = report
        .violations
        .iter()
        .map(|v| (v.rule, v.file.as_str()))
        .collect();
    assert_eq!(
        rules,
        vec![
            (FILE_NAME_SPACES, "javascript/notes file.md"),
            (DENY_LIST_WORD, "javascript/notes file.md"),
            (POSSIBLE_ACCESS_KEY, "python/example_code/sqs/creds.py"),
            (SNIPPET_TAG, "python/example_code/sqs/creds.py"),
        ]
    );
    assert_eq!(report.violations[3].line, Some(2));
}

#[test]
fn test_run_checks_respects_config() {
    let repo = fixture_repo();
    let config = CheckinConfig::from_yaml(
        "ignored_files:\n  - python/example_code/sqs/creds.py\nmax_file_size: 90\ndeny_list: []\n",
    )
    .unwrap();
    let report = run_checks(repo.path(), &config).unwrap();

    let rules: Vec<&str> = report.violations.iter().map(|v| v.rule).collect();
    assert_eq!(rules, vec![FILE_NAME_SPACES, FILE_TOO_LARGE]);
    assert_eq!(report.violations[1].file, "python/example_code/s3/hello.py");
}

#[test]
fn test_progress_report_and_csv() {
    let repo = fixture_repo();
    let report = progress_report(repo.path(), 2, &CheckinConfig::default()).unwrap();

    let groups: Vec<(&str, usize, usize, usize)> = report
        .groups
        .iter()
        .map(|g| (g.group.as_str(), g.total, g.clean, g.legacy))
        .collect();
    assert_eq!(
        groups,
        vec![("javascript", 1, 1, 0), ("python/example_code", 3, 2, 1)]
    );
    assert_eq!(report.totals().total, 4);

    let out = TempDir::new().unwrap();
    let csv_path = out.path().join("progress.csv");
    write_csv(&report, &csv_path).unwrap();

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,group,total,clean,legacy,percent_clean");
    let date = report.date.format("%Y-%m-%d").to_string();
    assert_eq!(lines[1], format!("{},javascript,1,1,0,100.0", date));
    assert_eq!(lines[2], format!("{},python/example_code,3,2,1,66.7", date));
}
