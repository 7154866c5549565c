//! # Inspect Subcommand
//!
//! Lists every tagged mapping in a JSON document, depth-first pre-order,
//! including mappings nested inside other tagged mappings.

use std::path::PathBuf;

use clap::Args;
use pix_core::{Factory, PixObject, Value};

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a JSON document.
    pub file: PathBuf,

    /// Only report top-level objects; do not search their contents.
    #[arg(long)]
    pub shallow: bool,
}

/// Run the inspect subcommand.
pub fn run_inspect(args: &InspectArgs, factory: &Factory) -> anyhow::Result<u8> {
    let document = crate::load_document(&args.file)?;
    let objects = discover(factory, &document, !args.shallow)?;
    tracing::info!(file = %args.file.display(), objects = objects.len(), "inspected document");

    for object in &objects {
        println!("{}", crate::describe(object));
    }
    Ok(0)
}

/// Objects in `document`. A top-level list is searched element by element.
pub fn discover(
    factory: &Factory,
    document: &Value,
    recursive: bool,
) -> anyhow::Result<Vec<PixObject>> {
    let objects = factory
        .iter_objects(document, recursive)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(objects)
}
