caps_value_enum! {
    /// How a disk is presented to the guest.
    pub enum DiskDevice as "disk_device" {
        Disk = 0 => "disk",
        Cdrom = 1 => "cdrom",
        Floppy = 2 => "floppy",
        Lun = 3 => "lun",
    }
}

caps_value_enum! {
    pub enum DiskBus as "disk_bus" {
        Ide = 0 => "ide",
        Fdc = 1 => "fdc",
        Scsi = 2 => "scsi",
        Virtio = 3 => "virtio",
        Xen = 4 => "xen",
        Usb = 5 => "usb",
        Uml = 6 => "uml",
        Sata = 7 => "sata",
        Sd = 8 => "sd",
    }
}

caps_value_enum! {
    pub enum GraphicsType as "graphics_type" {
        Sdl = 0 => "sdl",
        Vnc = 1 => "vnc",
        Rdp = 2 => "rdp",
        Desktop = 3 => "desktop",
        Spice = 4 => "spice",
    }
}

caps_value_enum! {
    /// Emulated video adapter model.
    pub enum VideoModel as "video_model" {
        Vga = 0 => "vga",
        Cirrus = 1 => "cirrus",
        Vmvga = 2 => "vmvga",
        Xen = 3 => "xen",
        Vbox = 4 => "vbox",
        Qxl = 5 => "qxl",
        Parallels = 6 => "parallels",
        Virtio = 7 => "virtio",
        Gop = 8 => "gop",
    }
}

caps_value_enum! {
    pub enum HostdevMode as "hostdev_mode" {
        Subsystem = 0 => "subsystem",
        Capabilities = 1 => "capabilities",
    }
}

caps_value_enum! {
    /// What to do when a passed-through device is missing at startup.
    pub enum StartupPolicy as "startup_policy" {
        Default = 0 => "default",
        Mandatory = 1 => "mandatory",
        Requisite = 2 => "requisite",
        Optional = 3 => "optional",
    }
}

caps_value_enum! {
    pub enum HostdevSubsysType as "hostdev_subsys_type" {
        Usb = 0 => "usb",
        Pci = 1 => "pci",
        Scsi = 2 => "scsi",
        ScsiHost = 3 => "scsi_host",
        Mdev = 4 => "mdev",
    }
}

caps_value_enum! {
    pub enum HostdevCapsType as "hostdev_caps_type" {
        Storage = 0 => "storage",
        Misc = 1 => "misc",
        Net = 2 => "net",
    }
}

caps_value_enum! {
    /// Host driver used to assign a PCI device.
    pub enum PciBackend as "pci_backend" {
        Default = 0 => "default",
        Kvm = 1 => "kvm",
        Vfio = 2 => "vfio",
        Xen = 3 => "xen",
    }
}
