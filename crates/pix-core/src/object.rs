//! # Behaviors, Synthesized Types and Promoted Objects
//!
//! A [`Behavior`] is a capability implementation registered under a PIX
//! type name. Synthesizing a type name yields a [`PixClass`]: the name plus
//! the ordered list of behaviors registered for it, or the single default
//! [`PixObjectBase`] when nothing is registered.
//!
//! Instantiating a class with a raw mapping yields a [`PixObject`], a
//! read-only keyed view over that mapping. Attribute lookups consult the
//! behaviors in precedence order (first registered wins) before falling back
//! to the raw entries.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{PixError, Rejection};
use crate::factory::{Children, Factory, WeakFactory};
use crate::value::{Map, Value};

/// Name reported by the default base behavior.
pub const DEFAULT_BASE_NAME: &str = "PIXObject";

/// Upcast helper so registered behaviors can be recovered by concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability implementation mixed into a synthesized PIX type.
///
/// Every hook has a default, so a behavior only overrides what it adds.
pub trait Behavior: AsAny + Send + Sync + 'static {
    /// Descriptor name, used in logs and construction errors.
    fn name(&self) -> &str;

    /// Construction hook. Runs once per promotion, in precedence order.
    /// Returning an error aborts construction of the object.
    fn init(&self, _data: &Map) -> Result<(), Rejection> {
        Ok(())
    }

    /// Computed attribute lookup. `None` defers to the next behavior and
    /// finally to the object's raw entries.
    fn attribute(&self, _object: &PixObject, _name: &str) -> Option<Value> {
        None
    }
}

/// Default base behavior used when no behavior is registered for a type name.
/// Accepts any mapping and adds nothing beyond the keyed view.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixObjectBase;

impl Behavior for PixObjectBase {
    fn name(&self) -> &str {
        DEFAULT_BASE_NAME
    }
}

// -- Synthesized types --------------------------------------------------------

/// A type synthesized from a PIX type name.
///
/// Classes are not cached: every synthesis builds a fresh value, but two
/// classes with the same name built from the same registry state expose the
/// same behavior list.
#[derive(Clone)]
pub struct PixClass {
    name: String,
    bases: Vec<Arc<dyn Behavior>>,
}

impl PixClass {
    /// Build a class from its name and registered behaviors. An empty list
    /// selects the default base.
    pub fn new(name: impl Into<String>, bases: Vec<Arc<dyn Behavior>>) -> Self {
        let bases = if bases.is_empty() {
            vec![Arc::new(PixObjectBase) as Arc<dyn Behavior>]
        } else {
            bases
        };
        Self {
            name: name.into(),
            bases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Behaviors in precedence order.
    pub fn bases(&self) -> &[Arc<dyn Behavior>] {
        &self.bases
    }

    pub fn base_names(&self) -> Vec<&str> {
        self.bases.iter().map(|b| b.name()).collect()
    }

    /// True when the class carries only the default base.
    pub fn is_default(&self) -> bool {
        self.bases.len() == 1 && (*self.bases[0]).as_any().is::<PixObjectBase>()
    }

    /// Construct an object wrapping `data`.
    ///
    /// # Errors
    ///
    /// Returns [`PixError::Construction`] for the first behavior whose
    /// `init` hook rejects the data.
    pub fn instantiate(self, factory: &Factory, data: Map) -> Result<PixObject, PixError> {
        for base in &self.bases {
            base.init(&data)
                .map_err(|rejection| PixError::construction(&self.name, base.name(), rejection.0))?;
        }
        Ok(PixObject {
            class: Arc::new(self),
            data: Arc::new(data),
            factory: factory.downgrade(),
        })
    }
}

impl fmt::Debug for PixClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixClass")
            .field("name", &self.name)
            .field("bases", &self.base_names())
            .finish()
    }
}

// -- Promoted objects ---------------------------------------------------------

/// Instance of a synthesized type wrapping a raw mapping node.
///
/// Cloning is cheap: the class and the data are shared. The factory
/// reference is weak, so objects never keep a factory alive.
#[derive(Clone)]
pub struct PixObject {
    class: Arc<PixClass>,
    data: Arc<Map>,
    factory: WeakFactory,
}

impl PixObject {
    /// The PIX type name, e.g. `PIXImage`.
    pub fn type_name(&self) -> &str {
        self.class.name()
    }

    pub fn class(&self) -> &PixClass {
        &self.class
    }

    /// The raw mapping this object was promoted from.
    pub fn data(&self) -> &Map {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resolve an attribute: behaviors first, in precedence order, then the
    /// raw entry of the same name.
    pub fn attr(&self, name: &str) -> Option<Value> {
        self.class
            .bases()
            .iter()
            .find_map(|base| base.attribute(self, name))
            .or_else(|| self.data.get(name).cloned())
    }

    /// The first mixed-in behavior of concrete type `B`, if any.
    pub fn behavior<B: Behavior>(&self) -> Option<&B> {
        self.class
            .bases()
            .iter()
            .find_map(|base| (**base).as_any().downcast_ref::<B>())
    }

    /// The factory that promoted this object, if it is still alive.
    pub fn factory(&self) -> Option<Factory> {
        self.factory.upgrade()
    }

    /// Promote the entry under `key` on demand.
    ///
    /// Returns the raw entry unchanged when the originating factory has been
    /// dropped, since no registry is available to promote against.
    pub fn object(&self, key: &str) -> Result<Option<Value>, PixError> {
        let Some(value) = self.data.get(key).cloned() else {
            return Ok(None);
        };
        match self.factory() {
            Some(factory) => factory.objectify(value).map(Some),
            None => Ok(Some(value)),
        }
    }

    /// Every promoted descendant of this object, depth-first pre-order.
    /// `None` when the originating factory has been dropped.
    pub fn children(&self) -> Option<Children<'_>> {
        let factory = self.factory()?;
        Some(Children::descendants(factory, &self.data))
    }
}

impl PartialEq for PixObject {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.data == other.data
    }
}

impl fmt::Debug for PixObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixObject")
            .field("type", &self.type_name())
            .field("bases", &self.class.base_names())
            .field("data", &self.data)
            .finish()
    }
}

impl std::ops::Index<&str> for PixObject {
    type Output = Value;

    /// Missing keys index to `Null`, mirroring `serde_json::Value`.
    fn index(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.data.get(key).unwrap_or(&NULL)
    }
}
