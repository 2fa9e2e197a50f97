//! Reading layers and rendering results.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::cli::OutputFormat;

/// Load one layer. `.toml` files are parsed as TOML, anything else as JSON.
pub fn load_layer(path: &Path) -> anyhow::Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading layer {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&text).with_context(|| format!("parsing TOML layer {}", path.display()))
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("parsing JSON layer {}", path.display()))
    }
}

/// Parse a JSON argument given on the command line.
pub fn parse_inline(text: &str) -> anyhow::Result<Value> {
    serde_json::from_str(text).with_context(|| format!("invalid JSON: {text}"))
}

/// Render a value in the requested format, with a trailing newline.
pub fn render(value: &Value, format: OutputFormat) -> anyhow::Result<String> {
    let mut out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Toml => {
            toml::to_string_pretty(value).context("result cannot be represented as TOML")?
        }
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("a.json");
        let toml_path = dir.path().join("b.TOML");
        fs::write(&json_path, r#"{"server": {"port": 80}}"#).unwrap();
        fs::write(&toml_path, "[server]\nport = 8080\nname = \"edge\"\n").unwrap();

        assert_eq!(load_layer(&json_path).unwrap(), json!({"server": {"port": 80}}));
        assert_eq!(
            load_layer(&toml_path).unwrap(),
            json!({"server": {"port": 8080, "name": "edge"}})
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_layer(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn bad_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let err = load_layer(&path).unwrap_err();
        assert!(err.to_string().contains("parsing JSON layer"));
    }

    #[test]
    fn render_formats() {
        let value = json!({"a": 1});
        assert_eq!(render(&value, OutputFormat::Json).unwrap(), "{\n  \"a\": 1\n}\n");
        assert_eq!(render(&value, OutputFormat::Toml).unwrap(), "a = 1\n");
    }

    #[test]
    fn inline_arrays_parse() {
        assert_eq!(parse_inline("[1, 2]").unwrap(), json!([1, 2]));
        assert!(parse_inline("[1,").is_err());
    }
}
