//! # Objectify Subcommand
//!
//! Promotes a JSON document and reports where objects were created. Tagged
//! mappings nested inside an object are not listed: promotion stops at the
//! object boundary.

use std::path::PathBuf;

use clap::Args;
use pix_core::{Factory, PixObject, Value};

/// Arguments for the objectify subcommand.
#[derive(Args, Debug)]
pub struct ObjectifyArgs {
    /// Path to a JSON document.
    pub file: PathBuf,

    /// Print the promoted tree as JSON instead of the object outline.
    #[arg(long)]
    pub json: bool,
}

/// Run the objectify subcommand.
pub fn run_objectify(args: &ObjectifyArgs, factory: &Factory) -> anyhow::Result<u8> {
    let document = crate::load_document(&args.file)?;
    let tree = factory.objectify(document)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(0);
    }

    let mut promoted = Vec::new();
    promoted_paths(&tree, "$", &mut promoted);
    tracing::info!(file = %args.file.display(), objects = promoted.len(), "objectified document");
    for (path, object) in promoted {
        println!("{path}\t{}", crate::describe(object));
    }
    Ok(0)
}

/// Collect the location of every object in an output tree, using `$` for
/// the root, `.key` for mapping entries and `[i]` for list positions.
/// Set elements have no stable position and are reported as `{}`.
pub fn promoted_paths<'a>(value: &'a Value, path: &str, out: &mut Vec<(String, &'a PixObject)>) {
    match value {
        Value::Object(object) => out.push((path.to_string(), object)),
        Value::Map(map) => {
            for (key, child) in map {
                promoted_paths(child, &format!("{path}.{key}"), out);
            }
        }
        Value::List(items) => {
            for (i, child) in items.iter().enumerate() {
                promoted_paths(child, &format!("{path}[{i}]"), out);
            }
        }
        Value::Set(set) => {
            for child in set {
                promoted_paths(child, &format!("{path}{{}}"), out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pix_core::TypeRegistry;
    use std::sync::Arc;

    #[test]
    fn paths_stop_at_object_boundary() {
        let factory = Factory::with_registry(Arc::new(TypeRegistry::new()));
        let tree = factory
            .objectify(Value::from(serde_json::json!({
                "owner": {"class": "PIXUser"},
                "results": [
                    {"class": "PIXShot", "notes": [{"class": "PIXNote"}]},
                    {"plain": {"class": "PIXShot"}}
                ]
            })))
            .unwrap();

        let mut found = Vec::new();
        promoted_paths(&tree, "$", &mut found);
        let found: Vec<(String, &str)> = found
            .into_iter()
            .map(|(path, object)| (path, object.type_name()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("$.owner".to_string(), "PIXUser"),
                ("$.results[0]".to_string(), "PIXShot"),
                ("$.results[1].plain".to_string(), "PIXShot"),
            ]
        );
    }
}
