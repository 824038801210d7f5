//! Rank command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spectral_compare::compare::write_ranking_csv;
use spectral_compare::import::load_series;
use spectral_compare::rank_matches;

use super::MetricArgs;

/// Run the rank command.
pub fn run(
    reference: PathBuf,
    library: Vec<PathBuf>,
    top: usize,
    csv: Option<PathBuf>,
    metric: &MetricArgs,
    verbose: bool,
) -> Result<()> {
    let config = metric.to_config()?;

    let reference_series = load_series(&reference)
        .with_context(|| format!("Failed to load {}", reference.display()))?;

    let files = collect_library_files(&library)?;
    if verbose {
        eprintln!("Loading {} library files", files.len());
    }

    let mut candidates = Vec::with_capacity(files.len());
    for path in &files {
        match load_series(path) {
            Ok(series) => candidates.push(series),
            Err(e) => log::warn!("skipping {}: {e}", path.display()),
        }
    }

    let ranked = rank_matches(&reference_series, &candidates, &config);

    println!(
        "Top matches for '{}' ({}, best first):",
        reference_series.display_name(),
        config.metric
    );
    for (rank, m) in ranked.iter().take(top).enumerate() {
        match &m.outcome {
            Ok(result) => println!("  {:>3}. {:<32} {result}", rank + 1, m.title),
            Err(e) => println!("  {:>3}. {:<32} error: {e}", rank + 1, m.title),
        }
    }

    if let Some(csv) = csv {
        write_ranking_csv(&csv, reference_series.display_name(), &ranked)
            .with_context(|| format!("Failed to write {}", csv.display()))?;
        if verbose {
            eprintln!("Wrote ranking to {}", csv.display());
        }
    }

    Ok(())
}

/// Expand directories into their `.csv` and `.json` files, sorted by name.
fn collect_library_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_series_file(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_series_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_library_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "value\n1\n").unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"values": [1.0]}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let extra = PathBuf::from("extra.csv");
        let files = collect_library_files(&[dir.path().to_path_buf(), extra.clone()]).unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("a.json"), dir.path().join("b.csv"), extra]
        );
    }
}
