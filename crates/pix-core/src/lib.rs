//! # pix-core -- Dynamic Objects for PIX API Data
//!
//! PIX endpoints return large generic structures: mappings, lists and
//! scalars. Any mapping carrying a `"class"` key names a PIX type. This crate
//! promotes those mappings into [`PixObject`]s so callers get an
//! object-oriented view without a hand-written type per PIX class.
//!
//! ## Pieces
//!
//! - [`TypeRegistry`] maps a PIX type name to the ordered list of
//!   [`Behavior`]s mixed into objects of that type. Unregistered names use
//!   the default [`PixObjectBase`].
//! - [`Factory`] synthesizes a [`PixClass`] per type name and runs the two
//!   traversals: [`Factory::objectify`] (rebuild a tree with tagged mappings
//!   promoted) and [`Factory::iter_children`] (depth-first discovery of every
//!   tagged mapping).
//! - [`Value`] is the closed set of node kinds the traversals understand.
//!
//! ## Example
//!
//! ```
//! use pix_core::{Behavior, Factory, PixObject, TypeRegistry, Value};
//! use std::sync::Arc;
//!
//! struct Image;
//!
//! impl Behavior for Image {
//!     fn name(&self) -> &str {
//!         "Image"
//!     }
//!
//!     fn attribute(&self, object: &PixObject, name: &str) -> Option<Value> {
//!         (name == "is_image").then(|| Value::Bool(object.contains_key("url")))
//!     }
//! }
//!
//! let factory = Factory::with_registry(Arc::new(TypeRegistry::new()));
//! factory.register("PIXImage", Image);
//!
//! let raw = Value::from(serde_json::json!({
//!     "results": [{"class": "PIXImage", "url": "https://example.invalid/a.jpg"}]
//! }));
//! let tree = factory.objectify(raw).unwrap();
//! let image = tree.as_map().unwrap()["results"].as_list().unwrap()[0]
//!     .as_object()
//!     .unwrap()
//!     .clone();
//! assert_eq!(image.type_name(), "PIXImage");
//! assert_eq!(image.attr("is_image"), Some(Value::Bool(true)));
//! ```
//!
//! ## Crate Policy
//!
//! - No I/O. Fetching data is the job of `pix-client`.
//! - Input trees are never mutated.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod factory;
pub mod object;
pub mod registry;
pub mod value;

pub use error::{PixError, Rejection};
pub use factory::{iter_contents, Children, Factory, WeakFactory};
pub use object::{Behavior, PixClass, PixObject, PixObjectBase, DEFAULT_BASE_NAME};
pub use registry::{register, TypeRegistry};
pub use value::{type_tag, Map, Value, ValueSet, TYPE_TAG};
