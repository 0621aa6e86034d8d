//! Value-to-string tables used by the formatter.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::types::{
    CapsValue, DiskBus, DiskDevice, GicVersion, GraphicsType, HostdevCapsType, HostdevMode,
    HostdevSubsysType, LoaderType, PciBackend, StartupPolicy, TristateBool, VideoModel,
    value_name,
};

/// Renders a raw enumeration value, or `None` when the value is unknown.
pub type ValueToStr = fn(u32) -> Option<&'static str>;

/// Registry of string tables keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct StringTables {
    tables: HashMap<&'static str, ValueToStr>,
}

impl StringTables {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables for every enumeration that appears in a capability block.
    ///
    /// Built on first use and shared afterwards.
    pub fn builtin() -> &'static StringTables {
        static BUILTIN: OnceLock<StringTables> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut tables = StringTables::new();
            tables
                .register::<LoaderType>()
                .register::<TristateBool>()
                .register::<DiskDevice>()
                .register::<DiskBus>()
                .register::<GraphicsType>()
                .register::<VideoModel>()
                .register::<HostdevMode>()
                .register::<StartupPolicy>()
                .register::<HostdevSubsysType>()
                .register::<HostdevCapsType>()
                .register::<PciBackend>()
                .register::<GicVersion>();
            tables
        })
    }

    /// Registers the table for `E` under [`CapsValue::TABLE`].
    pub fn register<E: CapsValue>(&mut self) -> &mut Self {
        self.insert(E::TABLE, value_name::<E>)
    }

    /// Registers or replaces a table.
    pub fn insert(&mut self, table: &'static str, lookup: ValueToStr) -> &mut Self {
        self.tables.insert(table, lookup);
        self
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Renders `value` from `table`.
    pub fn lookup(&self, table: &str, value: u32) -> Result<&'static str> {
        self.tables
            .get(table)
            .and_then(|lookup| lookup(value))
            .ok_or_else(|| Error::MissingStringMapping {
                table: table.to_string(),
                value,
            })
    }
}
