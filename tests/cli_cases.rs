mod common;

use std::process::Command;

use tempfile::tempdir;

#[test]
fn cli_exits_with_code_2_when_nothing_is_produced() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_utf8(dir.path(), "portfolio.txt", &[&["a", "b"]]);

    let status = Command::new(env!("CARGO_BIN_EXE_bcs2csv"))
        .args(["convert", &input.to_string_lossy()])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(2));
}

#[test]
fn cli_appends_metadata_columns() {
    let dir = tempdir().expect("tempdir should be created");
    let input = common::write_utf8(
        dir.path(),
        "B_k-1_Движение_денежных_средств_2020.txt",
        &[
            &["Валюта:", "USD"],
            &["Дата", "Операция", "Сумма зачисления", "Сумма списания"],
            &["01.02.2020", "Дивиденды", "12.5", "0"],
            &["", "Итого", "12.5", "0"],
        ],
    );

    let status = Command::new(env!("CARGO_BIN_EXE_bcs2csv"))
        .args([
            "normalize",
            &input.to_string_lossy(),
            "--meta",
            "Account=X1",
            "--meta",
            "Broker=BCS",
        ])
        .status()
        .expect("CLI should run");
    assert_eq!(status.code(), Some(0));

    let lines = common::read_tab_lines(&dir.path().join("B_k-1_Движение_денежных_средств_2020.csv"));
    assert_eq!(lines[0].last().map(String::as_str), Some("Broker"));
    assert_eq!(
        lines[1],
        vec!["01.02.2020", "Дивиденды", "12.5", "0", "USD", "X1", "BCS"]
    );
}

#[test]
fn cli_reports_failures_with_code_1() {
    let dir = tempdir().expect("tempdir should be created");
    let missing = dir.path().join("absent.xls");

    let status = Command::new(env!("CARGO_BIN_EXE_bcs2csv"))
        .args(["split", &missing.to_string_lossy()])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(1));
}
