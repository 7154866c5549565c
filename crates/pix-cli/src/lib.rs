//! # pix-cli -- PIX Data Command-Line Interface
//!
//! ## Subcommands
//!
//! - `inspect`: list every promoted object found in a JSON document
//! - `objectify`: show where a document is promoted, or print the result
//! - `fetch`: fetch a path from the configured PIX endpoint
//!
//! Argument parsing lives in `main.rs`; handlers here return an exit code.

pub mod fetch;
pub mod inspect;
pub mod objectify;

use std::path::Path;

use anyhow::Context;
use pix_core::{PixObject, Value};

/// Read a JSON document from disk.
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(Value::from(json))
}

/// One line describing an object: type name, key count, behaviors.
pub fn describe(object: &PixObject) -> String {
    format!(
        "{}\t{} keys\t[{}]",
        object.type_name(),
        object.len(),
        object.class().base_names().join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pix_core::{Factory, TypeRegistry};
    use std::sync::Arc;

    #[test]
    fn describe_lists_type_keys_and_bases() {
        let factory = Factory::with_registry(Arc::new(TypeRegistry::new()));
        let value = factory
            .objectify(Value::from(serde_json::json!({"class": "PIXShot", "name": "sh010"})))
            .unwrap();
        let line = describe(value.as_object().unwrap());
        assert_eq!(line, "PIXShot\t2 keys\t[PIXObject]");
    }

    #[test]
    fn load_document_reports_missing_file() {
        let err = load_document(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
