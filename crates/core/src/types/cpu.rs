caps_value_enum! {
    /// Whether the host-model CPU may fall back to a different model.
    pub enum CpuFallback as "cpu_fallback" {
        Allow = 0 => "allow",
        Forbid = 1 => "forbid",
    }
}

caps_value_enum! {
    pub enum FeaturePolicy as "cpu_feature_policy" {
        Force = 0 => "force",
        Require = 1 => "require",
        Optional = 2 => "optional",
        Disable = 3 => "disable",
        Forbid = 4 => "forbid",
    }
}
