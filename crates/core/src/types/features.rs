caps_value_enum! {
    /// ARM Generic Interrupt Controller version.
    pub enum GicVersion as "gic_version" {
        None = 0 => "none",
        /// Whatever the host supports.
        Host = 1 => "host",
        V2 = 2 => "2",
        V3 = 3 => "3",
    }
}
