//! Grow-only asset registry with master propagation.
//!
//! Every document owns a registry whose master is its bundle's registry, and
//! every nested bundle's registry masters into its parent's. An insertion
//! anywhere in the chain lands in every ancestor, so the root registry ends up
//! holding every asset of the compilation. Entries are shared cells: an update
//! made through any registry is visible through all of them.

use crate::placeholder::{Placeholder, Placeholders};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Metadata for one referenced local asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Source path; rewritten to `.html` once a markdown asset is scheduled for compilation.
    pub from: PathBuf,
    /// Final destination, known after relocation.
    pub to: Option<PathBuf>,
    /// Destination relative to the output root (`./...`), known after relocation.
    pub via: Option<String>,
    /// Token standing in for the path in rendered HTML.
    pub placeholder: Placeholder,
    /// True once the entry has reached a registry without a master.
    pub is_master: bool,
    /// True when the asset is a markdown document compiled as a nested bundle.
    pub is_marked: bool,
}

/// A registry entry shared by every registry in the chain.
pub type SharedEntry = Rc<RefCell<AssetEntry>>;

/// Optional metadata supplied on registration.
///
/// Fields left `None` keep their current value on an existing entry, or take
/// the default on a new one.
#[derive(Debug, Clone, Default)]
pub struct AssetData {
    /// Source path; defaults to the origin string.
    pub from: Option<PathBuf>,
}

#[derive(Default)]
struct Table {
    order: Vec<Placeholder>,
    values: HashMap<Placeholder, SharedEntry>,
    master: Option<Dependency>,
}

/// Handle to an asset registry. Clones refer to the same registry.
#[derive(Clone)]
pub struct Dependency {
    table: Rc<RefCell<Table>>,
    placeholders: Placeholders,
}

impl std::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.borrow();
        f.debug_struct("Dependency")
            .field("size", &table.order.len())
            .field("has_master", &table.master.is_some())
            .finish()
    }
}

impl Dependency {
    /// Creates a root registry drawing tokens from `placeholders`.
    pub fn new(placeholders: Placeholders) -> Self {
        Self {
            table: Rc::new(RefCell::new(Table::default())),
            placeholders,
        }
    }

    /// Creates an empty registry whose master is `master`.
    pub fn child_of(master: &Dependency) -> Self {
        let child = Self::new(master.placeholders.clone());
        child.table.borrow_mut().master = Some(master.clone());
        child
    }

    /// Links this registry under `master` and replays its current entries there.
    pub fn set_master(&self, master: &Dependency) {
        debug_assert!(
            !master.chain_contains(self),
            "registry cannot master into its own descendant"
        );
        self.table.borrow_mut().master = Some(master.clone());
        for (token, entry) in self.snapshot() {
            master.set(token, entry);
        }
    }

    /// The direct master, if any.
    pub fn master(&self) -> Option<Dependency> {
        self.table.borrow().master.clone()
    }

    /// True when this registry has no master.
    pub fn is_master(&self) -> bool {
        self.table.borrow().master.is_none()
    }

    /// The registry at the top of the master chain.
    pub fn root(&self) -> Dependency {
        let mut current = self.clone();
        while let Some(master) = current.master() {
            current = master;
        }
        current
    }

    /// The placeholder table this registry draws tokens from.
    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Registers `origin` with default metadata and returns its token.
    pub fn register(&self, origin: &str) -> Placeholder {
        self.register_with(origin, AssetData::default())
    }

    /// Registers `origin` and returns its token.
    ///
    /// The same origin always yields the same token. Registering it again
    /// reuses the existing slot and overwrites the metadata given in `data`.
    pub fn register_with(&self, origin: &str, data: AssetData) -> Placeholder {
        let token = self.placeholders.token(origin);

        let existing = self.lookup_chain(&token);
        let entry = match existing {
            Some(entry) => {
                if let Some(from) = data.from {
                    entry.borrow_mut().from = from;
                }
                entry
            }
            None => {
                log::debug!("register {origin} as {token}");
                Rc::new(RefCell::new(AssetEntry {
                    from: data.from.unwrap_or_else(|| PathBuf::from(origin)),
                    to: None,
                    via: None,
                    placeholder: token.clone(),
                    is_master: false,
                    is_marked: false,
                }))
            }
        };

        self.set(token.clone(), entry);
        token
    }

    fn set(&self, token: Placeholder, entry: SharedEntry) {
        let master = {
            let mut table = self.table.borrow_mut();
            entry.borrow_mut().is_master = table.master.is_none();
            if !table.values.contains_key(&token) {
                table.order.push(token.clone());
            }
            table.values.insert(token.clone(), entry.clone());
            table.master.clone()
        };
        if let Some(master) = master {
            master.set(token, entry);
        }
    }

    /// Finds an entry for `token` here or in any ancestor.
    fn lookup_chain(&self, token: &Placeholder) -> Option<SharedEntry> {
        let mut current = Some(self.clone());
        while let Some(registry) = current {
            if let Some(entry) = registry.get(token) {
                return Some(entry);
            }
            current = registry.master();
        }
        None
    }

    fn chain_contains(&self, other: &Dependency) -> bool {
        let mut current = Some(self.clone());
        while let Some(registry) = current {
            if Rc::ptr_eq(&registry.table, &other.table) {
                return true;
            }
            current = registry.master();
        }
        false
    }

    /// The entry stored under `token` in this registry.
    pub fn get(&self, token: &Placeholder) -> Option<SharedEntry> {
        self.table.borrow().values.get(token).cloned()
    }

    /// The entry registered for `origin` in this registry.
    pub fn lookup(&self, origin: &str) -> Option<SharedEntry> {
        self.get(&self.placeholders.token(origin))
    }

    /// Number of distinct entries.
    pub fn size(&self) -> usize {
        self.table.borrow().order.len()
    }

    /// Entries in insertion order.
    ///
    /// The list is a snapshot; entries registered while it is in use are not included.
    pub fn snapshot(&self) -> Vec<(Placeholder, SharedEntry)> {
        let table = self.table.borrow();
        table
            .order
            .iter()
            .filter_map(|token| {
                table
                    .values
                    .get(token)
                    .map(|entry| (token.clone(), entry.clone()))
            })
            .collect()
    }

    /// Visits every entry in insertion order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Placeholder, &SharedEntry),
    {
        for (token, entry) in self.snapshot() {
            f(&token, &entry);
        }
    }

    /// Maps every entry in insertion order.
    pub fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&Placeholder, &SharedEntry) -> T,
    {
        self.snapshot()
            .iter()
            .map(|(token, entry)| f(token, entry))
            .collect()
    }
}

/// Borrowed view helpers for entries.
pub trait EntryExt {
    /// Borrows the entry.
    fn read(&self) -> Ref<'_, AssetEntry>;
    /// Source path of the entry.
    fn from_path(&self) -> PathBuf {
        self.read().from.clone()
    }
    /// True when the source path has a `.md` extension.
    fn is_markdown(&self) -> bool {
        has_markdown_extension(&self.read().from)
    }
}

impl EntryExt for SharedEntry {
    fn read(&self) -> Ref<'_, AssetEntry> {
        self.borrow()
    }
}

/// True for paths ending in `.md`, any case.
pub fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
