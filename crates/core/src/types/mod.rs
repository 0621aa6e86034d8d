//! Closed value enumerations referenced by domain capabilities.
//!
//! Every enumeration has a fixed set of small integer values and one external
//! string form per value. The string forms are what ends up in the formatted
//! document and what serde uses.

/// A closed enumeration whose values can be recorded in an
/// [`EnumCapabilitySet`](crate::EnumCapabilitySet).
pub trait CapsValue: Copy + Eq + 'static {
    /// Name of the string table that renders this enumeration.
    const TABLE: &'static str;
    /// Every legal value, in ascending numeric order.
    const ALL: &'static [Self];

    fn index(self) -> u32;
    fn as_str(self) -> &'static str;
    fn from_index(index: u32) -> Option<Self>;
}

/// Looks up the external string of a raw value of `E`.
///
/// Coerces to [`ValueToStr`](crate::ValueToStr), which is how tables are
/// registered in [`StringTables`](crate::StringTables).
pub fn value_name<E: CapsValue>(index: u32) -> Option<&'static str> {
    E::from_index(index).map(E::as_str)
}

macro_rules! caps_value_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $table:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant = $value,)+
        }

        impl $crate::types::CapsValue for $name {
            const TABLE: &'static str = $table;
            const ALL: &'static [Self] = &[$(Self::$variant,)+];

            fn index(self) -> u32 {
                self as u32
            }

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            fn from_index(index: u32) -> Option<Self> {
                match index {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::types::CapsValue::as_str(*self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err($crate::error::Error::UnknownValue {
                        table: $table,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

mod cpu;
mod devices;
mod features;
mod os;

pub use cpu::{CpuFallback, FeaturePolicy};
pub use devices::{
    DiskBus, DiskDevice, GraphicsType, HostdevCapsType, HostdevMode, HostdevSubsysType,
    PciBackend, StartupPolicy, VideoModel,
};
pub use features::GicVersion;
pub use os::LoaderType;

caps_value_enum! {
    /// Virtualization type of a domain.
    pub enum VirtType as "virt_type" {
        None = 0 => "none",
        Qemu = 1 => "qemu",
        Kqemu = 2 => "kqemu",
        Kvm = 3 => "kvm",
        Xen = 4 => "xen",
        Lxc = 5 => "lxc",
        Uml = 6 => "uml",
        Openvz = 7 => "openvz",
        Test = 8 => "test",
        Vmware = 9 => "vmware",
        Hyperv = 10 => "hyperv",
        Vbox = 11 => "vbox",
        Phyp = 12 => "phyp",
        Parallels = 13 => "parallels",
        Bhyve = 14 => "bhyve",
        Vz = 15 => "vz",
    }
}

caps_value_enum! {
    /// Guest architecture.
    pub enum Arch as "arch" {
        None = 0 => "none",
        Alpha = 1 => "alpha",
        Armv6l = 2 => "armv6l",
        Armv7l = 3 => "armv7l",
        Armv7b = 4 => "armv7b",
        Aarch64 = 5 => "aarch64",
        Cris = 6 => "cris",
        I686 = 7 => "i686",
        Ia64 = 8 => "ia64",
        Lm32 = 9 => "lm32",
        M68k = 10 => "m68k",
        Microblaze = 11 => "microblaze",
        Microblazeel = 12 => "microblazeel",
        Mips = 13 => "mips",
        Mipsel = 14 => "mipsel",
        Mips64 = 15 => "mips64",
        Mips64el = 16 => "mips64el",
        Openrisc = 17 => "openrisc",
        Parisc = 18 => "parisc",
        Parisc64 = 19 => "parisc64",
        Ppc = 20 => "ppc",
        Ppcle = 21 => "ppcle",
        Ppc64 = 22 => "ppc64",
        Ppc64le = 23 => "ppc64le",
        Ppcemb = 24 => "ppcemb",
        S390 = 25 => "s390",
        S390x = 26 => "s390x",
        Sh4 = 27 => "sh4",
        Sh4eb = 28 => "sh4eb",
        Sparc = 29 => "sparc",
        Sparc64 = 30 => "sparc64",
        Unicore32 = 31 => "unicore32",
        X86_64 = 32 => "x86_64",
        Xtensa = 33 => "xtensa",
        Xtensaeb = 34 => "xtensaeb",
    }
}

caps_value_enum! {
    /// A boolean that may be left to the hypervisor default.
    pub enum TristateBool as "tristate_bool" {
        Default = 0 => "default",
        Yes = 1 => "yes",
        No = 2 => "no",
    }
}

caps_value_enum! {
    /// Usability verdict of a CPU model on the host.
    #[derive(Default)]
    pub enum CpuUsable as "cpu_usable" {
        #[default]
        Unknown = 0 => "unknown",
        Yes = 1 => "yes",
        No = 2 => "no",
    }
}
