use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bookable destination behind a symbolic settings key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Display name used on deals and for scoring, e.g. "Greece Crete".
    pub name: String,
    /// IATA airport code.
    pub code: String,
}

/// Lookup from settings keys (`"cyprus"`) to destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationCatalog {
    entries: BTreeMap<String, Destination>,
}

impl DestinationCatalog {
    pub fn new(entries: BTreeMap<String, Destination>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    pub fn with(mut self, key: &str, name: &str, code: &str) -> Self {
        self.entries.insert(
            key.to_lowercase(),
            Destination { name: name.to_string(), code: code.to_uppercase() },
        );
        self
    }

    pub fn lookup(&self, key: &str) -> Option<&Destination> {
        self.entries.get(&key.to_lowercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DestinationCatalog {
    fn default() -> Self {
        Self::empty()
            .with("cyprus", "Cyprus", "LCA")
            .with("malta", "Malta", "MLA")
            .with("crete", "Greece Crete", "HER")
            .with("athens", "Greece Athens", "ATH")
            .with("tenerife", "Tenerife", "TFS")
            .with("grancanaria", "Gran Canaria", "LPA")
            .with("lanzarote", "Lanzarote", "ACE")
            .with("antalya", "Turkey Antalya", "AYT")
            .with("istanbul", "Turkey Istanbul", "IST")
            .with("morocco", "Morocco", "CMN")
            .with("egypt", "Egypt Hurghada", "HRG")
    }
}
