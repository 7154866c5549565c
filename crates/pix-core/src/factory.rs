//! # Factory -- Traversal and Promotion
//!
//! The factory turns raw PIX data into objects. Two traversals are offered:
//!
//! - [`Factory::objectify`] rebuilds a tree, replacing every tagged mapping
//!   with a [`PixObject`]. Promotion stops at the object boundary: a promoted
//!   mapping keeps its raw contents, and the object expands them on demand.
//! - [`Factory::iter_children`] walks a mapping depth-first and yields one
//!   object per tagged mapping, including tagged mappings nested inside
//!   other tagged mappings.
//!
//! Neither traversal mutates its input. The registry bound to the factory is
//! the only configuration consulted.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::PixError;
use crate::object::{Behavior, PixClass, PixObject};
use crate::registry::TypeRegistry;
use crate::value::{type_tag, Map, Value, ValueSet};

struct FactoryInner {
    registry: Arc<TypeRegistry>,
}

/// Builds PIX objects from raw data using a [`TypeRegistry`].
///
/// Cloning shares the same factory; objects hold a weak reference back to it.
#[derive(Clone)]
pub struct Factory {
    inner: Arc<FactoryInner>,
}

/// Non-owning reference to a [`Factory`].
#[derive(Clone, Default)]
pub struct WeakFactory(Weak<FactoryInner>);

impl WeakFactory {
    pub fn upgrade(&self) -> Option<Factory> {
        self.0.upgrade().map(|inner| Factory { inner })
    }
}

impl fmt::Debug for WeakFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakFactory")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}

impl Factory {
    /// Factory bound to the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::global())
    }

    /// Factory bound to an explicit registry.
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            inner: Arc::new(FactoryInner { registry }),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.inner.registry
    }

    /// Register `behavior` under `type_name` in this factory's registry.
    pub fn register<B: Behavior>(&self, type_name: &str, behavior: B) -> Arc<B> {
        self.inner.registry.register(type_name, Arc::new(behavior))
    }

    /// Build the class for `type_name` from the current registry state.
    pub fn synthesize(&self, type_name: &str) -> PixClass {
        self.inner.registry.synthesize(type_name)
    }

    pub fn downgrade(&self) -> WeakFactory {
        WeakFactory(Arc::downgrade(&self.inner))
    }

    /// Immediate mapping contents of `node`. See [`iter_contents`].
    pub fn iter_contents(node: &Map) -> impl Iterator<Item = &Map> + '_ {
        iter_contents(node)
    }

    /// Promoted objects found in `node`, depth-first pre-order.
    ///
    /// `node` itself contributes an object when it is tagged. With
    /// `recursive` set, every mapping reachable through [`iter_contents`] is
    /// searched as well, at any depth. Untagged mappings contribute nothing
    /// themselves but are still searched.
    pub fn iter_children<'a>(&self, node: &'a Map, recursive: bool) -> Children<'a> {
        Children {
            factory: self.clone(),
            stack: vec![node],
            recursive,
        }
    }

    /// [`iter_children`](Self::iter_children) over a whole response body.
    /// A mapping is searched as is; a top-level list or set has each of its
    /// mapping elements searched in turn. Other values contain no objects.
    pub fn iter_objects<'a>(&self, value: &'a Value, recursive: bool) -> Children<'a> {
        let mut stack: Vec<&'a Map> = match value {
            Value::Map(map) => vec![map],
            Value::List(items) => items.iter().filter_map(Value::as_map).collect(),
            Value::Set(set) => set.iter().filter_map(Value::as_map).collect(),
            _ => Vec::new(),
        };
        stack.reverse();
        Children {
            factory: self.clone(),
            stack,
            recursive,
        }
    }

    /// Replace every tagged mapping in `value` with a promoted object.
    ///
    /// - A tagged mapping becomes an object wrapping the mapping as is; its
    ///   entries are not transformed.
    /// - An untagged mapping is rebuilt with each entry transformed.
    /// - Lists stay lists in the same order; sets stay sets of the same size,
    ///   even when two elements promote to equal objects.
    /// - Scalars and already promoted objects are returned untouched.
    ///
    /// # Errors
    ///
    /// Propagates the first [`PixError::Construction`] raised by a behavior.
    pub fn objectify(&self, value: Value) -> Result<Value, PixError> {
        match value {
            Value::Map(map) => match type_tag(&map).map(str::to_owned) {
                Some(type_name) => self.promote(&type_name, map).map(Value::Object),
                None => map
                    .into_iter()
                    .map(|(key, value)| Ok((key, self.objectify(value)?)))
                    .collect::<Result<Map, PixError>>()
                    .map(Value::Map),
            },
            Value::List(items) => items
                .into_iter()
                .map(|item| self.objectify(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Set(set) => set
                .into_iter()
                .map(|item| self.objectify(item))
                .collect::<Result<Vec<_>, _>>()
                .map(|items| Value::Set(ValueSet::from_vec_unchecked(items))),
            other => Ok(other),
        }
    }

    fn promote(&self, type_name: &str, data: Map) -> Result<PixObject, PixError> {
        tracing::trace!(type_name, keys = data.len(), "promoting PIX mapping");
        self.synthesize(type_name).instantiate(self, data)
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("registry", &self.inner.registry)
            .finish()
    }
}

/// Mappings held directly by `node`: each mapping value, and each mapping
/// element of a list or set value. Does not descend any further.
pub fn iter_contents(node: &Map) -> impl Iterator<Item = &Map> + '_ {
    const NONE: &[Value] = &[];
    node.values().flat_map(|value| {
        let (direct, nested): (Option<&Map>, &[Value]) = match value {
            Value::Map(map) => (Some(map), NONE),
            Value::List(items) => (None, items.as_slice()),
            Value::Set(set) => (None, set.as_slice()),
            _ => (None, NONE),
        };
        direct
            .into_iter()
            .chain(nested.iter().filter_map(Value::as_map))
    })
}

/// Iterator returned by [`Factory::iter_children`] and
/// [`PixObject::children`].
///
/// Uses an explicit stack, so input depth does not grow the call stack.
/// After a construction error is yielded the iterator is exhausted.
pub struct Children<'a> {
    factory: Factory,
    stack: Vec<&'a Map>,
    recursive: bool,
}

impl<'a> Children<'a> {
    /// Descendants of `node`, excluding `node` itself.
    pub(crate) fn descendants(factory: Factory, node: &'a Map) -> Self {
        let mut stack: Vec<&'a Map> = iter_contents(node).collect();
        stack.reverse();
        Self {
            factory,
            stack,
            recursive: true,
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = Result<PixObject, PixError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.recursive {
                let start = self.stack.len();
                self.stack.extend(iter_contents(node));
                self.stack[start..].reverse();
            }
            if let Some(type_name) = type_tag(node) {
                let result = self.factory.promote(type_name, node.clone());
                if result.is_err() {
                    self.stack.clear();
                }
                return Some(result);
            }
        }
        None
    }
}

impl fmt::Debug for Children<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("pending", &self.stack.len())
            .field("recursive", &self.recursive)
            .finish()
    }
}
