use std::path::PathBuf;

use clap::Parser;

use crate::data::loader::{FileFormat, LoadOptions};

/// Explore which factors drive students' exam performance.
#[derive(Debug, Parser)]
#[command(name = "student-dashboard", version, about)]
pub struct Cli {
    /// Dataset to open at startup (CSV, TSV, JSON or Parquet).
    /// Without it the window opens empty; use File → Open….
    #[arg(env = "STUDENT_DASHBOARD_DATA")]
    pub path: Option<PathBuf>,

    /// Read the file as this format instead of guessing from its extension.
    #[arg(long, value_enum)]
    pub format: Option<FileFormat>,

    /// Field delimiter for delimited text (default ',' or tab for TSV).
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            format: self.format,
            delimiter: self.delimiter,
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_options() {
        let cli = Cli::try_parse_from([
            "student-dashboard",
            "data/students.txt",
            "--format",
            "csv",
            "--delimiter",
            ";",
        ])
        .unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("data/students.txt")));
        let opts = cli.load_options();
        assert_eq!(opts.format, Some(FileFormat::Csv));
        assert_eq!(opts.delimiter, Some(b';'));
    }

    #[test]
    fn delimiter_must_be_one_character() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let res = Cli::try_parse_from(["student-dashboard", "--format", "xlsx"]);
        assert!(res.is_err());
    }
}
