//! Named point and length attributes.
//!
//! Each shape type declares its attributes once, as `(canonical key, aliases,
//! accessor)` triples, in a [`Registry`] built through [`RegistryBuilder`].
//! A type can [`inherit`](RegistryBuilder::inherit) the registry of any type
//! it embeds; the parent's accessors are composed with a projection so they
//! resolve against the embedded value.
//!
//! Resolution order when tables are merged:
//!
//! - the type's own declarations come first, and a key or alias repeated
//!   among them is a [`GeomError::DuplicateKey`];
//! - inherited entries follow in `inherit` order, skipping any whose
//!   canonical key is already taken;
//! - an inherited alias is kept only if nothing earlier claimed it.
//!
//! So the most-derived declaration wins, and between two parents that both
//! claim a key, the one inherited first wins.
//!
//! Accessors hand back references into the owning instance, so looking up
//! the same key twice (or a key and one of its aliases) yields the very same
//! node.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::errors::GeomError;
use crate::geom::{Length, Point};

/// Borrow one attribute node out of an owner
pub type Accessor<T, V> = Arc<dyn for<'a> Fn(&'a T) -> &'a V + Send + Sync>;

/// Box up an accessor, pinning down the higher-ranked signature
pub fn accessor<T, V, F>(f: F) -> Accessor<T, V>
where
    F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
{
    Arc::new(f)
}

struct Entry<T, V> {
    canonical: &'static str,
    aliases: Vec<&'static str>,
    get: Accessor<T, V>,
}

impl<T, V> Clone for Entry<T, V> {
    fn clone(&self) -> Self {
        Entry {
            canonical: self.canonical,
            aliases: self.aliases.clone(),
            get: Arc::clone(&self.get),
        }
    }
}

/// One merged resolution table (points or lengths) of a type
struct Table<T, V> {
    entries: Vec<Entry<T, V>>,
    index: HashMap<&'static str, usize>,
}

impl<T, V> Table<T, V> {
    fn merge(
        owner: &'static str,
        attribute: &'static str,
        own: Vec<Entry<T, V>>,
        inherited: Vec<Entry<T, V>>,
    ) -> Result<Self, GeomError> {
        let mut table = Table {
            entries: Vec::with_capacity(own.len() + inherited.len()),
            index: HashMap::new(),
        };

        for entry in own {
            let slot = table.entries.len();
            for key in std::iter::once(entry.canonical).chain(entry.aliases.iter().copied()) {
                match table.index.entry(key) {
                    MapEntry::Occupied(_) => {
                        return Err(GeomError::DuplicateKey {
                            attribute,
                            key: key.to_string(),
                            owner,
                        });
                    }
                    MapEntry::Vacant(v) => {
                        v.insert(slot);
                    }
                }
            }
            table.entries.push(entry);
        }

        for mut entry in inherited {
            if table.index.contains_key(entry.canonical) {
                continue;
            }
            let slot = table.entries.len();
            table.index.insert(entry.canonical, slot);
            entry.aliases.retain(|alias| match table.index.entry(*alias) {
                MapEntry::Occupied(_) => false,
                MapEntry::Vacant(v) => {
                    v.insert(slot);
                    true
                }
            });
            table.entries.push(entry);
        }

        Ok(table)
    }

    fn resolve(&self, key: &str) -> Option<&Entry<T, V>> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.canonical).collect()
    }
}

/// The merged attribute tables of one type
pub struct Registry<T> {
    type_name: &'static str,
    points: Table<T, Point>,
    lengths: Table<T, Length>,
}

impl<T> Registry<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Resolve a point key or alias on `owner`
    pub fn point<'a>(&self, owner: &'a T, key: &str) -> Result<&'a Point, GeomError> {
        match self.points.resolve(key) {
            Some(entry) => Ok((entry.get)(owner)),
            None => Err(self.missing("point", key)),
        }
    }

    /// Resolve a length key or alias on `owner`
    pub fn length<'a>(&self, owner: &'a T, key: &str) -> Result<&'a Length, GeomError> {
        match self.lengths.resolve(key) {
            Some(entry) => Ok((entry.get)(owner)),
            None => Err(self.missing("length", key)),
        }
    }

    /// Canonical point keys, own declarations first
    pub fn point_keys(&self) -> Vec<&'static str> {
        self.points.keys()
    }

    pub fn length_keys(&self) -> Vec<&'static str> {
        self.lengths.keys()
    }

    pub fn canonical_point_key(&self, key: &str) -> Option<&'static str> {
        self.points.resolve(key).map(|e| e.canonical)
    }

    pub fn canonical_length_key(&self, key: &str) -> Option<&'static str> {
        self.lengths.resolve(key).map(|e| e.canonical)
    }

    /// Aliases that survived the merge for a canonical point key
    pub fn point_aliases(&self, canonical: &str) -> Option<&[&'static str]> {
        self.points
            .resolve(canonical)
            .filter(|e| e.canonical == canonical)
            .map(|e| e.aliases.as_slice())
    }

    pub fn length_aliases(&self, canonical: &str) -> Option<&[&'static str]> {
        self.lengths
            .resolve(canonical)
            .filter(|e| e.canonical == canonical)
            .map(|e| e.aliases.as_slice())
    }

    fn missing(&self, attribute: &'static str, key: &str) -> GeomError {
        GeomError::KeyNotFound {
            attribute,
            key: key.to_string(),
            owner: self.type_name,
        }
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("type_name", &self.type_name)
            .field("points", &self.point_keys())
            .field("lengths", &self.length_keys())
            .finish()
    }
}

/// Collects a type's own declarations and the registries it inherits from
pub struct RegistryBuilder<T> {
    type_name: &'static str,
    points: Vec<Entry<T, Point>>,
    lengths: Vec<Entry<T, Length>>,
    inherited_points: Vec<Entry<T, Point>>,
    inherited_lengths: Vec<Entry<T, Length>>,
}

impl<T: 'static> RegistryBuilder<T> {
    pub fn new(type_name: &'static str) -> Self {
        RegistryBuilder {
            type_name,
            points: Vec::new(),
            lengths: Vec::new(),
            inherited_points: Vec::new(),
            inherited_lengths: Vec::new(),
        }
    }

    /// Pull in every entry of `parent`, reached through `project`
    pub fn inherit<P: 'static>(mut self, parent: &Registry<P>, project: fn(&T) -> &P) -> Self {
        for entry in &parent.points.entries {
            self.inherited_points.push(compose(entry, project));
        }
        for entry in &parent.lengths.entries {
            self.inherited_lengths.push(compose(entry, project));
        }
        self
    }

    pub fn point<F>(mut self, canonical: &'static str, aliases: &[&'static str], get: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a Point + Send + Sync + 'static,
    {
        self.points.push(Entry {
            canonical,
            aliases: aliases.to_vec(),
            get: accessor(get),
        });
        self
    }

    pub fn length<F>(mut self, canonical: &'static str, aliases: &[&'static str], get: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a Length + Send + Sync + 'static,
    {
        self.lengths.push(Entry {
            canonical,
            aliases: aliases.to_vec(),
            get: accessor(get),
        });
        self
    }

    pub fn build(self) -> Result<Registry<T>, GeomError> {
        let points = Table::merge(self.type_name, "point", self.points, self.inherited_points)?;
        let lengths = Table::merge(self.type_name, "length", self.lengths, self.inherited_lengths)?;
        crate::log::debug!(
            type_name = self.type_name,
            points = points.entries.len(),
            lengths = lengths.entries.len(),
            "built attribute registry"
        );
        Ok(Registry {
            type_name: self.type_name,
            points,
            lengths,
        })
    }
}

fn compose<T: 'static, P: 'static, V: 'static>(entry: &Entry<P, V>, project: fn(&T) -> &P) -> Entry<T, V> {
    let get = Arc::clone(&entry.get);
    Entry {
        canonical: entry.canonical,
        aliases: entry.aliases.clone(),
        get: accessor(move |owner: &T| get(project(owner))),
    }
}

// ============================================================================
// Per-type access
// ============================================================================

/// A type with one static, merged registry
pub trait Registered: Sized + 'static {
    fn registry() -> &'static Registry<Self>;
}

/// Object-safe attribute access, implemented by every shape
pub trait Attributes {
    fn type_name(&self) -> &'static str;

    fn get_point(&self, key: &str) -> Result<&Point, GeomError>;
    fn point_keys(&self) -> Vec<&'static str>;
    fn canonical_point_key(&self, key: &str) -> Option<&'static str>;

    fn get_length(&self, key: &str) -> Result<&Length, GeomError>;
    fn length_keys(&self) -> Vec<&'static str>;
    fn canonical_length_key(&self, key: &str) -> Option<&'static str>;

    /// Read-only keyed view of the points
    fn points(&self) -> Points<'_>;

    /// Read-only keyed view of the lengths
    fn lengths(&self) -> Lengths<'_>;
}

/// Implement [`Attributes`] for a [`Registered`] type by forwarding to its registry
macro_rules! registered_attributes {
    ($ty:ty) => {
        impl $crate::registry::Attributes for $ty {
            fn type_name(&self) -> &'static str {
                <$ty as $crate::registry::Registered>::registry().type_name()
            }

            fn get_point(&self, key: &str) -> Result<&$crate::geom::Point, $crate::errors::GeomError> {
                <$ty as $crate::registry::Registered>::registry().point(self, key)
            }

            fn point_keys(&self) -> Vec<&'static str> {
                <$ty as $crate::registry::Registered>::registry().point_keys()
            }

            fn canonical_point_key(&self, key: &str) -> Option<&'static str> {
                <$ty as $crate::registry::Registered>::registry().canonical_point_key(key)
            }

            fn get_length(&self, key: &str) -> Result<&$crate::geom::Length, $crate::errors::GeomError> {
                <$ty as $crate::registry::Registered>::registry().length(self, key)
            }

            fn length_keys(&self) -> Vec<&'static str> {
                <$ty as $crate::registry::Registered>::registry().length_keys()
            }

            fn canonical_length_key(&self, key: &str) -> Option<&'static str> {
                <$ty as $crate::registry::Registered>::registry().canonical_length_key(key)
            }

            fn points(&self) -> $crate::registry::Points<'_> {
                $crate::registry::Points::new(self)
            }

            fn lengths(&self) -> $crate::registry::Lengths<'_> {
                $crate::registry::Lengths::new(self)
            }
        }
    };
}

pub(crate) use registered_attributes;

// ============================================================================
// Keyed views
// ============================================================================

macro_rules! keyed_view {
    ($(#[$meta:meta])* $view:ident, $node:ty, $get:ident, $keys:ident, $canonical:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $view<'a> {
            owner: &'a dyn Attributes,
        }

        impl<'a> $view<'a> {
            pub fn new(owner: &'a dyn Attributes) -> Self {
                $view { owner }
            }

            /// Number of canonical keys
            pub fn len(&self) -> usize {
                self.owner.$keys().len()
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Canonical keys only; aliases are not listed
            pub fn keys(&self) -> Vec<&'static str> {
                self.owner.$keys()
            }

            /// Look up a canonical key or any alias
            pub fn get(&self, key: &str) -> Result<&'a $node, GeomError> {
                self.owner.$get(key)
            }

            pub fn contains(&self, key: &str) -> bool {
                self.owner.$canonical(key).is_some()
            }

            /// `(canonical key, node)` pairs in key order
            pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'a $node)> + 'a {
                let owner = self.owner;
                owner
                    .$keys()
                    .into_iter()
                    .filter_map(move |key| owner.$get(key).ok().map(|node| (key, node)))
            }
        }

        /// Panics on an unknown key, like indexing a map
        impl<'a> Index<&str> for $view<'a> {
            type Output = $node;

            fn index(&self, key: &str) -> &$node {
                match self.owner.$get(key) {
                    Ok(node) => node,
                    Err(err) => panic!("{err}"),
                }
            }
        }

        impl fmt::Debug for $view<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.iter()).finish()
            }
        }
    };
}

keyed_view!(
    /// Point attributes of one shape
    Points, Point, get_point, point_keys, canonical_point_key
);

keyed_view!(
    /// Length attributes of one shape
    Lengths, Length, get_length, length_keys, canonical_length_key
);
