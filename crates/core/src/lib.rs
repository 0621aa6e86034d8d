pub mod blocks;
pub mod caps_enum;
pub mod capabilities;
pub mod cpu_models;
pub mod error;
pub mod format;
pub mod host_cpu;
pub mod names;
pub mod string_values;
pub mod types;

pub use blocks::{
    BlockId, CapsBlock, CpuBlock, DEVICE_BLOCKS, DiskBlock, EnumField, FEATURE_BLOCKS, GicBlock,
    GraphicsBlock, HostdevBlock, LoaderBlock, OsBlock, VideoBlock,
};
pub use caps_enum::EnumCapabilitySet;
pub use capabilities::{CapsData, DomainCapabilities};
pub use cpu_models::{CpuModel, CpuModels, SharedCpuModels, copy_models};
pub use error::{Error, Result};
pub use format::{Element, Formatter};
pub use host_cpu::{HostCpuFeature, HostCpuModel};
pub use names::{StringTables, ValueToStr};
pub use string_values::StringValueCatalog;
pub use types::{
    Arch, CapsValue, CpuFallback, CpuUsable, DiskBus, DiskDevice, FeaturePolicy, GicVersion,
    GraphicsType, HostdevCapsType, HostdevMode, HostdevSubsysType, LoaderType, PciBackend,
    StartupPolicy, TristateBool, VideoModel, VirtType,
};
