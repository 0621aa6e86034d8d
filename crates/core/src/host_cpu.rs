use serde::{Deserialize, Serialize};

use crate::types::{CpuFallback, FeaturePolicy};

/// Host CPU description offered for `host-model` CPU mode.
///
/// Produced by host CPU detection and passed through as-is; nothing here
/// compares or expands models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCpuModel {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<CpuFallback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default)]
    pub features: Vec<HostCpuFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCpuFeature {
    pub name: String,
    pub policy: FeaturePolicy,
}

impl HostCpuModel {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            fallback: None,
            vendor: None,
            features: Vec::new(),
        }
    }

    pub fn with_fallback(mut self, fallback: CpuFallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_feature(mut self, policy: FeaturePolicy, name: impl Into<String>) -> Self {
        self.features.push(HostCpuFeature {
            name: name.into(),
            policy,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_only_model() {
        let cpu = HostCpuModel::new("Skylake-Client");
        assert_eq!(cpu.model, "Skylake-Client");
        assert!(cpu.fallback.is_none());
        assert!(cpu.vendor.is_none());
        assert!(cpu.features.is_empty());
    }

    #[test]
    fn builder_keeps_feature_order() {
        let cpu = HostCpuModel::new("Broadwell")
            .with_vendor("Intel")
            .with_feature(FeaturePolicy::Require, "vme")
            .with_feature(FeaturePolicy::Disable, "rtm");
        let names: Vec<_> = cpu.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["vme", "rtm"]);
        assert_eq!(cpu.features[1].policy, FeaturePolicy::Disable);
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let json = serde_json::to_string(&HostCpuModel::new("EPYC")).unwrap();
        assert_eq!(json, r#"{"model":"EPYC","features":[]}"#);
    }

    #[test]
    fn serialization_roundtrip() {
        let cpu = HostCpuModel::new("EPYC")
            .with_fallback(CpuFallback::Forbid)
            .with_vendor("AMD")
            .with_feature(FeaturePolicy::Require, "x2apic");
        let json = serde_json::to_string(&cpu).unwrap();
        let deserialized: HostCpuModel = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, cpu);
    }
}
