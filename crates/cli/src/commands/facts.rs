//! `storepilot facts import`: Load transaction rows into the fact store.

use storepilot_core::series::FactRow;

use super::{CmdResult, load_config, open_store};

/// Parse either a JSON array of rows or one JSON row per line.
pub fn parse_rows(content: &str) -> Result<Vec<FactRow>, serde_json::Error> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content);
    }
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}

/// Read and parse an export file.
pub async fn read_rows(path: &str) -> Result<Vec<FactRow>, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read {path}: {e}"))?;
    parse_rows(&content).map_err(|e| format!("Invalid fact rows in {path}: {e}"))
}

pub async fn import(path: String) -> CmdResult {
    let config = load_config()?;
    let store = open_store(&config);

    let rows = read_rows(&path).await?;
    let count = store.append_fact_rows(&rows).await?;

    println!("📥 Imported {count} fact row(s) into {}", store.facts_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_and_lines() {
        let array = r#"[{"identifier":"A","date":"2024-01-01","quantity":3}]"#;
        assert_eq!(parse_rows(array).unwrap().len(), 1);

        let lines = "{\"identifier\":\"A\",\"date\":\"2024-01-01\",\"quantity\":3}\n\n{\"identifier\":\"B\",\"date\":\"2024-01-02\"}\n";
        let rows = parse_rows(lines).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].quantity(), None);
    }

    #[test]
    fn bad_line_fails_the_import() {
        assert!(parse_rows("{\"identifier\":\"A\"}\nnope").is_err());
    }

    #[tokio::test]
    async fn read_rows_from_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.jsonl");
        tokio::fs::write(
            &path,
            "{\"identifier\":\"A\",\"date\":\"2024-01-01\",\"quantity\":3}\n",
        )
        .await
        .unwrap();

        let rows = read_rows(path.to_str().unwrap()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].identifier, "A");

        let missing = dir.path().join("missing.jsonl");
        let err = read_rows(missing.to_str().unwrap()).await.unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }
}
