caps_value_enum! {
    /// Firmware loader kind.
    pub enum LoaderType as "loader_type" {
        Rom = 0 => "rom",
        Pflash = 1 => "pflash",
    }
}
