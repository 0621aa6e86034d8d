//! Per-feature capability blocks.
//!
//! Each block starts with a `supported` flag. While it is false, the rest of
//! the block carries no meaning and is left out of the formatted document.
//!
//! Device and feature blocks are rendered generically through [`CapsBlock`],
//! in the order given by [`DEVICE_BLOCKS`] and [`FEATURE_BLOCKS`]. A new
//! device kind needs a struct, a `CapsBlock` impl, a [`BlockId`] variant and
//! an entry in the matching order list.

use crate::caps_enum::EnumCapabilitySet;
use crate::cpu_models::SharedCpuModels;
use crate::host_cpu::HostCpuModel;
use crate::string_values::StringValueCatalog;
use crate::types::{
    CapsValue, DiskBus, DiskDevice, GicVersion, GraphicsType, HostdevCapsType, HostdevMode,
    HostdevSubsysType, LoaderType, PciBackend, StartupPolicy, TristateBool, VideoModel,
};

/// An enum list of a block, with its element type erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumField {
    /// Value of the `name` attribute of the `<enum>` element.
    pub name: &'static str,
    /// String table that renders the values.
    pub table: &'static str,
    pub bits: u32,
}

impl EnumField {
    pub fn new<E: CapsValue>(name: &'static str, set: &EnumCapabilitySet<E>) -> Self {
        Self {
            name,
            table: E::TABLE,
            bits: set.bits(),
        }
    }

    pub fn raw_values(&self) -> impl Iterator<Item = u32> + '_ {
        crate::caps_enum::set_bits(self.bits)
    }
}

pub trait CapsBlock {
    /// Element name in the formatted document.
    fn element(&self) -> &'static str;

    fn supported(&self) -> bool;

    /// Enum lists, in output order.
    fn enums(&self) -> Vec<EnumField> {
        Vec::new()
    }

    /// Raw string values, emitted before the enum lists.
    fn string_values(&self) -> Option<&StringValueCatalog> {
        None
    }

    /// Nested blocks, emitted before this block's own values.
    fn children(&self) -> Vec<&dyn CapsBlock> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    Disk,
    Graphics,
    Video,
    Hostdev,
    Gic,
}

/// Children of `<devices>`, in output order.
pub const DEVICE_BLOCKS: &[BlockId] = &[
    BlockId::Disk,
    BlockId::Graphics,
    BlockId::Video,
    BlockId::Hostdev,
];

/// Children of `<features>`, in output order.
pub const FEATURE_BLOCKS: &[BlockId] = &[BlockId::Gic];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderBlock {
    pub supported: bool,
    pub values: StringValueCatalog,
    pub loader_type: EnumCapabilitySet<LoaderType>,
    pub readonly: EnumCapabilitySet<TristateBool>,
}

impl CapsBlock for LoaderBlock {
    fn element(&self) -> &'static str {
        "loader"
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn enums(&self) -> Vec<EnumField> {
        vec![
            EnumField::new("type", &self.loader_type),
            EnumField::new("readonly", &self.readonly),
        ]
    }

    fn string_values(&self) -> Option<&StringValueCatalog> {
        Some(&self.values)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsBlock {
    pub supported: bool,
    pub loader: LoaderBlock,
}

impl CapsBlock for OsBlock {
    fn element(&self) -> &'static str {
        "os"
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn children(&self) -> Vec<&dyn CapsBlock> {
        vec![&self.loader]
    }
}

/// CPU modes a domain may request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuBlock {
    pub host_passthrough: bool,
    pub host_model: Option<HostCpuModel>,
    /// Models usable with `custom` mode. `None` means the backend offers no
    /// catalog at all, as opposed to an empty one.
    pub custom: Option<SharedCpuModels>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskBlock {
    pub supported: bool,
    pub disk_device: EnumCapabilitySet<DiskDevice>,
    pub bus: EnumCapabilitySet<DiskBus>,
}

impl CapsBlock for DiskBlock {
    fn element(&self) -> &'static str {
        "disk"
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn enums(&self) -> Vec<EnumField> {
        vec![
            EnumField::new("diskDevice", &self.disk_device),
            EnumField::new("bus", &self.bus),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphicsBlock {
    pub supported: bool,
    pub graphics_type: EnumCapabilitySet<GraphicsType>,
}

impl CapsBlock for GraphicsBlock {
    fn element(&self) -> &'static str {
        "graphics"
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn enums(&self) -> Vec<EnumField> {
        vec![EnumField::new("type", &self.graphics_type)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoBlock {
    pub supported: bool,
    pub model_type: EnumCapabilitySet<VideoModel>,
}

impl CapsBlock for VideoBlock {
    fn element(&self) -> &'static str {
        "video"
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn enums(&self) -> Vec<EnumField> {
        vec![EnumField::new("modelType", &self.model_type)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostdevBlock {
    pub supported: bool,
    pub mode: EnumCapabilitySet<HostdevMode>,
    pub startup_policy: EnumCapabilitySet<StartupPolicy>,
    pub subsys_type: EnumCapabilitySet<HostdevSubsysType>,
    pub caps_type: EnumCapabilitySet<HostdevCapsType>,
    pub pci_backend: EnumCapabilitySet<PciBackend>,
}

impl CapsBlock for HostdevBlock {
    fn element(&self) -> &'static str {
        "hostdev"
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn enums(&self) -> Vec<EnumField> {
        vec![
            EnumField::new("mode", &self.mode),
            EnumField::new("startupPolicy", &self.startup_policy),
            EnumField::new("subsysType", &self.subsys_type),
            EnumField::new("capsType", &self.caps_type),
            EnumField::new("pciBackend", &self.pci_backend),
        ]
    }
}

/// ARM Generic Interrupt Controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GicBlock {
    pub supported: bool,
    pub version: EnumCapabilitySet<GicVersion>,
}

impl CapsBlock for GicBlock {
    fn element(&self) -> &'static str {
        "gic"
    }

    fn supported(&self) -> bool {
        self.supported
    }

    fn enums(&self) -> Vec<EnumField> {
        vec![EnumField::new("version", &self.version)]
    }
}
