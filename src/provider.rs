//! Input providers for loading public keys from files

use crate::key::{PublicKey, PublicKeyInput};
use anyhow::{bail, Result};
use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    Csv,
    /// Generated key dataset: tab-separated rows headed by the literal
    /// `bin_size` token, with N in field 3, e in field 5 and d in field 6.
    Tsv,
}

pub fn load_keys(input: &str) -> Result<Vec<PublicKey>> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    parse_keys(&content)
}

pub fn parse_keys(content: &str) -> Result<Vec<PublicKey>> {
    let format = detect_format(content)?;
    let inputs = match format {
        Format::Json => parse_json(content)?,
        Format::Csv => parse_csv(content)?,
        Format::Tsv => parse_tsv(content)?,
    };

    inputs.into_iter().map(PublicKey::try_from).collect()
}

const BOM: &str = "\u{FEFF}";

pub fn detect_format(content: &str) -> Result<Format> {
    let trimmed = content.strip_prefix(BOM).unwrap_or(content).trim_start();

    if trimmed.starts_with('[') {
        return Ok(Format::Json);
    }

    if let Some(first_line) = trimmed.lines().next() {
        if first_line.split('\t').next() == Some("bin_size") {
            return Ok(Format::Tsv);
        }

        let columns: Vec<String> = first_line
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .collect();
        let has_e = columns.iter().any(|c| c == "e");
        let has_n = columns.iter().any(|c| c == "n");
        if has_e && has_n {
            return Ok(Format::Csv);
        }
    }

    bail!("Unable to detect input format. Use a JSON array, CSV with e,n header, or a bin_size dataset.")
}

fn parse_json(content: &str) -> Result<Vec<PublicKeyInput>> {
    Ok(serde_json::from_str(content)?)
}

fn parse_csv(content: &str) -> Result<Vec<PublicKeyInput>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut inputs = Vec::new();
    for result in reader.deserialize() {
        inputs.push(result?);
    }
    Ok(inputs)
}

fn parse_tsv(content: &str) -> Result<Vec<PublicKeyInput>> {
    let mut inputs = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        // repeated header rows appear in concatenated dataset files
        if fields[0] == "bin_size" {
            continue;
        }
        if fields.len() < 6 {
            bail!(
                "Dataset line {}: expected at least 6 tab-separated fields, got {}",
                lineno + 1,
                fields.len()
            );
        }
        inputs.push(PublicKeyInput {
            e: fields[5].trim().to_string(),
            n: fields[3].trim().to_string(),
            d: fields.get(6).map(|d| d.trim().to_string()),
        });
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_keys() {
        let json = r#"[{"e": "17993", "n": "90581"}]"#;
        let keys = parse_keys(json).unwrap();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_parse_csv_keys() {
        let csv = "e,n,d\n17993,90581,5";
        let keys = parse_keys(csv).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].expected_d, Some(5u64.into()));
    }

    #[test]
    fn test_parse_csv_without_d_column() {
        let csv = "e,n\n17993,90581";
        let keys = parse_keys(csv).unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].expected_d.is_none());
    }

    #[test]
    fn test_parse_tsv_dataset() {
        let tsv = "bin_size\tp\tq\tN\tphiN\te\td\n\
                   17\t239\t379\t90581\t89964\t17993\t5";
        let keys = parse_keys(tsv).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].e, 17993u64.into());
        assert_eq!(keys[0].n, 90581u64.into());
        assert_eq!(keys[0].expected_d, Some(5u64.into()));
    }

    #[test]
    fn test_parse_tsv_skips_repeated_headers() {
        let tsv = "bin_size\tp\tq\tN\tphiN\te\td\n\
                   17\t239\t379\t90581\t89964\t17993\t5\n\
                   bin_size\tp\tq\tN\tphiN\te\td\n\
                   17\t239\t379\t90581\t89964\t17993\t5";
        let keys = parse_keys(tsv).unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_parse_tsv_rejects_short_rows() {
        let tsv = "bin_size\tp\tq\tN\tphiN\te\td\n17\t239\t379";
        assert!(parse_keys(tsv).is_err());
    }

    #[test]
    fn test_auto_detect_json() {
        let json = r#"  [{"e": "1", "n": "2"}]"#;
        assert_eq!(detect_format(json).unwrap(), Format::Json);
    }

    #[test]
    fn test_auto_detect_csv() {
        assert_eq!(detect_format("e,n\n1,2").unwrap(), Format::Csv);
    }

    #[test]
    fn test_auto_detect_tsv() {
        assert_eq!(
            detect_format("bin_size\tp\tq\tN\tphiN\te\td\n").unwrap(),
            Format::Tsv
        );
    }

    #[test]
    fn test_invalid_input_error() {
        assert!(parse_keys("not a key file").is_err());
    }
}
