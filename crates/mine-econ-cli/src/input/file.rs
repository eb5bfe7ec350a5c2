use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read an input file and deserialise into a typed struct.
///
/// The format is chosen by extension: `.yaml` and `.yml` parse as YAML,
/// anything else as JSON.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;

    let value: T = if is_yaml(&resolved) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    };
    Ok(value)
}

/// Read a headered CSV file into a vector of typed rows.
pub fn read_csv_rows<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let mut reader = csv::Reader::from_path(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T =
            record.map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
        rows.push(row);
    }
    Ok(rows)
}

/// True when the path names a CSV file by extension.
pub fn is_csv(path: &str) -> bool {
    has_extension(Path::new(path), &["csv"])
}

fn is_yaml(path: &Path) -> bool {
    has_extension(path, &["yaml", "yml"])
}

fn has_extension(path: &Path, candidates: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| candidates.iter().any(|c| ext.eq_ignore_ascii_case(c)))
        .unwrap_or(false)
}

/// Resolve the path against the working directory and check it names a file.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }
    if !resolved.is_file() {
        return Err(format!("Not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}
