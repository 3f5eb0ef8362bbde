use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::classify::join_cells;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)*\.?|\w+").expect("hardcoded name word regex is valid")
});

pub fn section_name(header: &[String]) -> String {
    let joined = join_cells(header);
    WORD_RE
        .find_iter(&joined)
        .map(|word| word.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn table_file_name(section: &str, counter: usize, max_chars: usize) -> String {
    let name = section
        .replace(' ', "_")
        .chars()
        .take(max_chars)
        .collect::<String>();
    format!("{name}_T{counter}")
}

pub fn table_output_path(input: &Path, table_name: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_{table_name}.{extension}"))
}

pub fn report_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{report_output_path, section_name, table_file_name, table_output_path};

    #[test]
    fn section_name_keeps_numbering_and_words() {
        let header = vec![
            "1.2 Сделки купли/продажи ценных бумаг:".to_string(),
            String::new(),
        ];
        assert_eq!(section_name(&header), "1.2 Сделки купли продажи ценных бумаг");
        assert_eq!(
            section_name(&["3.1. Portfolio (closing)".to_string()]),
            "3.1. Portfolio closing"
        );
    }

    #[test]
    fn table_name_is_truncated_and_numbered() {
        assert_eq!(
            table_file_name("1.2 Purchases and Sales", 1, 50),
            "1.2_Purchases_and_Sales_T1"
        );
        let long = "x ".repeat(40);
        let name = table_file_name(long.trim(), 12, 50);
        assert_eq!(name.len(), 50 + "_T12".len());
        assert!(name.ends_with("_T12"));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let name = table_file_name("Движение", 2, 4);
        assert_eq!(name, "Движ_T2");
    }

    #[test]
    fn output_paths_sit_next_to_input() {
        let input = Path::new("/reports/B_k-123_Сделки_2020.xls");
        assert_eq!(
            table_output_path(input, "1.2_Deals_T1", "csv"),
            Path::new("/reports/B_k-123_Сделки_2020_1.2_Deals_T1.csv")
        );
        assert_eq!(
            report_output_path(Path::new("/reports/a.txt"), "csv"),
            Path::new("/reports/a.csv")
        );
    }
}
