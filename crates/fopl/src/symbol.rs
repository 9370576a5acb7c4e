//! Symbol interning
//!
//! Symbols follow the Herbrand interpretation: a symbol is a name that denotes
//! itself. A [`Registry`] hands out exactly one [`Symbol`] per name, so within a
//! registry symbol equality reduces to a pointer comparison.
//!
//! Registries are explicit values. Use [`Registry::global`] for the
//! process-wide table, or [`Registry::new`] for an isolated one.

use crate::config::RegistryConfig;
use crate::error::{FoplError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// An interned, immutable name
///
/// `Clone` copies the handle, not the symbol: both handles point at the same
/// interned allocation.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// The name this symbol stands for
    pub fn name(&self) -> &str {
        &self.0
    }

    /// True if both handles refer to the same interned symbol
    pub fn ptr_eq(a: &Symbol, b: &Symbol) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Minting a second, distinct symbol with the same name is not allowed.
    ///
    /// Always fails with [`FoplError::Unsupported`]; clone the handle instead.
    pub fn try_clone(&self) -> Result<Symbol> {
        Err(FoplError::unsupported(format!(
            "symbol `{}` cannot be duplicated outside its registry",
            self.name()
        )))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Symbol::ptr_eq(self, other) || self.0 == other.0
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.name())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Symbols serialize as their name. Deserializing interns the name in the
// global registry, the only registry reachable without extra context.

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Registry::global()
            .get(&name)
            .map_err(serde::de::Error::custom)
    }
}

const GLOBAL_CAPACITY: usize = 10_000;

/// Lock-protected registry contents
#[derive(Debug, Default)]
struct SymbolTable {
    lookup: HashMap<Arc<str>, Symbol>,
    /// Next suffix to try for generated symbols
    next_suffix: u64,
}

impl SymbolTable {
    fn with_capacity(capacity: usize) -> Self {
        SymbolTable {
            lookup: HashMap::with_capacity(capacity),
            next_suffix: 0,
        }
    }

    /// Get-or-create
    fn intern(&mut self, name: &str) -> Symbol {
        if let Some(symbol) = self.lookup.get(name) {
            return symbol.clone();
        }
        let name: Arc<str> = Arc::from(name);
        let symbol = Symbol(Arc::clone(&name));
        self.lookup.insert(name, symbol.clone());
        symbol
    }
}

/// Interning table mapping names to unique symbols
///
/// Every lookup-or-create and every fresh-name generation runs under one
/// exclusive lock, so concurrent callers never observe two symbols for the
/// same name nor receive the same generated name.
#[derive(Debug)]
pub struct Registry {
    table: Mutex<SymbolTable>,
    config: RegistryConfig,
}

impl Registry {
    /// Create a new empty registry with the default configuration
    pub fn new() -> Self {
        Registry::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Registry {
            table: Mutex::new(SymbolTable::with_capacity(config.initial_capacity)),
            config,
        }
    }

    /// The process-wide registry, sized for every symbol a program interns
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            Registry::with_config(RegistryConfig {
                initial_capacity: GLOBAL_CAPACITY,
                ..RegistryConfig::default()
            })
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Return the symbol for `name`, creating and registering it if absent.
    ///
    /// Fails with [`FoplError::InvalidArgument`] if `name` is empty.
    pub fn get(&self, name: &str) -> Result<Symbol> {
        if name.is_empty() {
            return Err(FoplError::invalid_argument(
                "attempted to get a symbol without a name",
            ));
        }
        Ok(self.table.lock().intern(name))
    }

    /// Like [`Registry::get`], for callers whose name may be absent
    pub fn get_optional(&self, name: Option<&str>) -> Result<Symbol> {
        match name {
            Some(name) => self.get(name),
            None => Err(FoplError::invalid_argument(
                "attempted to get a symbol without a name",
            )),
        }
    }

    /// Generate a symbol named `prefix` followed by a number, unused so far.
    ///
    /// Without a prefix the configured `fresh_prefix` is used. The suffix
    /// counter is shared by all prefixes and only moves forward.
    pub fn generate(&self, prefix: Option<&str>) -> Symbol {
        let prefix = prefix.unwrap_or(&self.config.fresh_prefix);
        let mut table = self.table.lock();

        let mut suffix = table.next_suffix;
        let mut name = format!("{}{}", prefix, suffix);
        while table.lookup.contains_key(name.as_str()) {
            suffix += 1;
            name = format!("{}{}", prefix, suffix);
        }
        table.next_suffix = suffix + 1;

        trace!(symbol = %name, "generated fresh symbol");
        table.intern(&name)
    }

    /// Check if a name is already interned
    pub fn contains(&self, name: &str) -> bool {
        self.table.lock().lookup.contains_key(name)
    }

    /// Number of interned symbols
    pub fn len(&self) -> usize {
        self.table.lock().lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}
