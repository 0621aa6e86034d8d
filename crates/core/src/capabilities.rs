use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::blocks::{
    BlockId, CapsBlock, CpuBlock, DiskBlock, GicBlock, GraphicsBlock, HostdevBlock, OsBlock,
    VideoBlock,
};
use crate::error::Result;
use crate::format::Formatter;
use crate::names::StringTables;
use crate::types::{Arch, VirtType};

/// Everything about a domain capability object that changes after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapsData {
    /// Maximum vCPUs for the machine type. `None` means unknown.
    pub max_vcpus: Option<u32>,
    pub os: OsBlock,
    pub cpu: CpuBlock,
    pub disk: DiskBlock,
    pub graphics: GraphicsBlock,
    pub video: VideoBlock,
    pub hostdev: HostdevBlock,
    pub gic: GicBlock,
}

impl CapsData {
    pub fn block(&self, id: BlockId) -> &dyn CapsBlock {
        match id {
            BlockId::Disk => &self.disk,
            BlockId::Graphics => &self.graphics,
            BlockId::Video => &self.video,
            BlockId::Hostdev => &self.hostdev,
            BlockId::Gic => &self.gic,
        }
    }

    /// Max vCPU count worth reporting; zero counts as unknown.
    pub fn known_max_vcpus(&self) -> Option<u32> {
        self.max_vcpus.filter(|&n| n > 0)
    }
}

/// What a hypervisor backend supports for one emulator binary, machine
/// type, architecture and virtualization type.
///
/// Host inspection code fills the object in through [`write`](Self::write); after
/// that it is read through [`read`](Self::read), possibly from several
/// threads at once via `Arc<DomainCapabilities>`.
///
/// ```
/// use domcaps_core::{caps_enum_set, Arch, DiskBus, DomainCapabilities, VirtType};
///
/// let caps = DomainCapabilities::new("/usr/bin/qemu-system-x86_64", "pc-q35-6.0", Arch::X86_64, VirtType::Kvm);
/// {
///     let mut data = caps.write();
///     data.disk.supported = true;
///     caps_enum_set!(data.disk.bus, DiskBus::Virtio).unwrap();
/// }
/// assert!(caps.to_xml().unwrap().contains("<value>virtio</value>"));
/// ```
#[derive(Debug)]
pub struct DomainCapabilities {
    path: String,
    machine: String,
    arch: Arch,
    virt_type: VirtType,
    data: RwLock<CapsData>,
}

impl DomainCapabilities {
    /// Creates capabilities with every block unsupported.
    pub fn new(
        path: impl Into<String>,
        machine: impl Into<String>,
        arch: Arch,
        virt_type: VirtType,
    ) -> Self {
        let path = path.into();
        let machine = machine.into();
        tracing::debug!(%path, %machine, %arch, %virt_type, "created domain capabilities");
        Self {
            path,
            machine,
            arch,
            virt_type,
            data: RwLock::new(CapsData::default()),
        }
    }

    /// Emulator binary path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn machine(&self) -> &str {
        &self.machine
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn virt_type(&self) -> VirtType {
        self.virt_type
    }

    /// Locks the data for reading.
    ///
    /// Do not call [`to_xml`](Self::to_xml) or [`snapshot`](Self::snapshot)
    /// while the guard is alive; format through
    /// [`Formatter::render`] with the guard instead.
    pub fn read(&self) -> RwLockReadGuard<'_, CapsData> {
        self.data.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, CapsData> {
        self.data.write()
    }

    /// Clones the current data. A custom CPU catalog is shared with the
    /// snapshot, not copied.
    pub fn snapshot(&self) -> CapsData {
        self.data.read().clone()
    }

    /// Formats with the built-in string tables. Takes the read lock, so it
    /// must not be called while holding a guard from [`read`](Self::read).
    pub fn to_xml(&self) -> Result<String> {
        Formatter::new(StringTables::builtin()).format(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps_enum_set;
    use crate::cpu_models::CpuModels;
    use crate::types::{CpuUsable, DiskBus};
    use std::sync::Arc;
    use std::thread;

    fn qemu_caps() -> DomainCapabilities {
        DomainCapabilities::new(
            "/usr/bin/qemu-system-x86_64",
            "pc-q35-6.0",
            Arch::X86_64,
            VirtType::Kvm,
        )
    }

    mod new {
        use super::*;

        #[test]
        fn keeps_identity() {
            let caps = qemu_caps();
            assert_eq!(caps.path(), "/usr/bin/qemu-system-x86_64");
            assert_eq!(caps.machine(), "pc-q35-6.0");
            assert_eq!(caps.arch(), Arch::X86_64);
            assert_eq!(caps.virt_type(), VirtType::Kvm);
        }

        #[test]
        fn starts_with_everything_unsupported() {
            let caps = qemu_caps();
            assert_eq!(caps.snapshot(), CapsData::default());
            assert!(caps.read().max_vcpus.is_none());
        }
    }

    mod data {
        use super::*;

        #[test]
        fn block_lookup_matches_fields() {
            let mut data = CapsData::default();
            data.graphics.supported = true;
            assert!(data.block(BlockId::Graphics).supported());
            assert!(!data.block(BlockId::Disk).supported());
            assert_eq!(data.block(BlockId::Hostdev).element(), "hostdev");
        }

        #[test]
        fn zero_max_vcpus_is_unknown() {
            let mut data = CapsData::default();
            data.max_vcpus = Some(0);
            assert_eq!(data.known_max_vcpus(), None);
            data.max_vcpus = Some(255);
            assert_eq!(data.known_max_vcpus(), Some(255));
        }
    }

    mod sharing {
        use super::*;

        #[test]
        fn snapshot_shares_cpu_catalog() {
            let caps = qemu_caps();
            let mut models = CpuModels::new(1).unwrap();
            models.add("qemu64", None, CpuUsable::Yes).unwrap();
            let models = models.into_shared();
            caps.write().cpu.custom = Some(Arc::clone(&models));

            let snapshot = caps.snapshot();
            let custom = snapshot.cpu.custom.unwrap();
            assert!(Arc::ptr_eq(&custom, &models));
        }

        #[test]
        fn formats_from_held_read_guard_with_writer_waiting() {
            let caps = Arc::new(qemu_caps());
            caps.write().disk.supported = true;
            let expected = caps.to_xml().unwrap();

            let data = caps.read();
            let writer = {
                let caps = Arc::clone(&caps);
                thread::spawn(move || caps.write().gic.supported = true)
            };
            thread::sleep(std::time::Duration::from_millis(20));
            let xml = Formatter::new(StringTables::builtin())
                .render(&caps, &data)
                .unwrap();
            drop(data);
            writer.join().unwrap();

            assert_eq!(xml, expected);
            assert!(caps.read().gic.supported);
        }

        #[test]
        fn two_objects_share_one_catalog() {
            let models = CpuModels::new(0).unwrap().into_shared();
            let pc = qemu_caps();
            let q35 = DomainCapabilities::new(
                "/usr/bin/qemu-system-x86_64",
                "pc-i440fx-6.0",
                Arch::X86_64,
                VirtType::Kvm,
            );
            pc.write().cpu.custom = Some(Arc::clone(&models));
            q35.write().cpu.custom = Some(Arc::clone(&models));
            assert_eq!(Arc::strong_count(&models), 3);
        }

        #[test]
        fn concurrent_readers_after_population() {
            let caps = Arc::new(qemu_caps());
            {
                let mut data = caps.write();
                data.disk.supported = true;
                caps_enum_set!(data.disk.bus, DiskBus::Virtio).unwrap();
            }

            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let caps = Arc::clone(&caps);
                    thread::spawn(move || caps.to_xml().unwrap())
                })
                .collect();
            let outputs: Vec<String> = readers.into_iter().map(|r| r.join().unwrap()).collect();
            assert!(outputs.windows(2).all(|w| w[0] == w[1]));
            assert!(outputs[0].contains("<value>virtio</value>"));
        }
    }
}
