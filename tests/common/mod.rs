#![allow(dead_code)]

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1251;

pub fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|cells| cells.iter().map(|cell| (*cell).to_string()).collect())
        .collect()
}

pub fn tab_text(lines: &[&[&str]]) -> String {
    lines
        .iter()
        .map(|cells| cells.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

pub fn write_utf8(dir: &Path, name: &str, lines: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, tab_text(lines)).expect("fixture should be written");
    path
}

pub fn write_cp1251(dir: &Path, name: &str, lines: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    let text = tab_text(lines);
    let (bytes, _, unmappable) = WINDOWS_1251.encode(&text);
    assert!(!unmappable, "fixture text should fit Windows-1251");
    std::fs::write(&path, bytes).expect("fixture should be written");
    path
}

pub fn read_tab_lines(path: &Path) -> Vec<Vec<String>> {
    std::fs::read_to_string(path)
        .expect("output should be readable")
        .lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

pub fn report_dump() -> Vec<&'static [&'static str]> {
    vec![
        &["Брокерский отчет", "", ""],
        &["", "", ""],
        &["1.1 Денежные средства", "", ""],
        &["", "", ""],
        &["Дата", "Операция", "Сумма"],
        &["01.02.2020", "Пополнение", "1000"],
        &["02.02.2020", "Комиссия", "12.5"],
        &["", "", ""],
        &["Итого", "987.5", ""],
        &["", "", ""],
        &["2.1 Сделки купли/продажи", "", ""],
        &["", "", ""],
        &["(1*) - сделки РЕПО", "", ""],
        &["", "", ""],
        &["Бумага", "Кол-во", "Цена"],
        &["SBER", "10", "250"],
        &["GAZP", "1", "200"],
        &["", "", ""],
    ]
}
