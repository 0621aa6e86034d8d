//! Renders [`DomainCapabilities`] as a `<domainCapabilities>` document.
//!
//! Elements always come out in the same order: path, domain, machine, arch,
//! vcpu, os, cpu, devices (disk, graphics, video, hostdev) and features
//! (gic). An unsupported block renders as `<name supported='no'/>`; an empty
//! enum list under a supported block renders as `<enum name='..'/>`.

mod element;

pub use element::Element;

use crate::blocks::{CapsBlock, CpuBlock, DEVICE_BLOCKS, EnumField, FEATURE_BLOCKS};
use crate::capabilities::{CapsData, DomainCapabilities};
use crate::error::Result;
use crate::host_cpu::HostCpuModel;
use crate::names::StringTables;
use crate::types::CapsValue;

const DEFAULT_INDENT: usize = 2;

/// Builds and renders capability documents using a set of string tables.
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    tables: &'a StringTables,
    indent: usize,
}

impl<'a> Formatter<'a> {
    pub fn new(tables: &'a StringTables) -> Self {
        Self {
            tables,
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Renders `caps`, holding its read lock while the tree is built.
    ///
    /// Fails with [`MissingStringMapping`](crate::Error::MissingStringMapping)
    /// if a supported value has no string, in which case nothing is rendered.
    ///
    /// The lock is not reentrant: a thread that already holds a guard from
    /// [`DomainCapabilities::read`] must call [`render`](Self::render) with
    /// that guard instead, or it can deadlock behind a waiting writer.
    pub fn format(&self, caps: &DomainCapabilities) -> Result<String> {
        let data = caps.read();
        self.render(caps, &data)
    }

    /// Renders `caps` from data the caller has already locked.
    pub fn render(&self, caps: &DomainCapabilities, data: &CapsData) -> Result<String> {
        let xml = self.build(caps, data)?.render(self.indent);
        tracing::debug!(
            path = caps.path(),
            machine = caps.machine(),
            bytes = xml.len(),
            "formatted domain capabilities"
        );
        Ok(xml)
    }

    /// Builds the document tree for `caps` with the given data.
    pub fn build(&self, caps: &DomainCapabilities, data: &CapsData) -> Result<Element> {
        let mut root =
            Element::new("domainCapabilities").child(Element::new("path").text(caps.path()));
        root.push(Element::new("domain").text(caps.virt_type().as_str()));
        if !caps.machine().is_empty() {
            root.push(Element::new("machine").text(caps.machine()));
        }
        root.push(Element::new("arch").text(caps.arch().as_str()));
        if let Some(max) = data.known_max_vcpus() {
            root.push(Element::new("vcpu").attr("max", max.to_string()));
        }

        root.push(self.block(&data.os)?);
        root.push(cpu(&data.cpu));

        let mut devices = Element::new("devices");
        for &id in DEVICE_BLOCKS {
            devices.push(self.block(data.block(id))?);
        }
        root.push(devices);

        let mut features = Element::new("features");
        for &id in FEATURE_BLOCKS {
            features.push(self.block(data.block(id))?);
        }
        root.push(features);

        Ok(root)
    }

    fn block(&self, block: &dyn CapsBlock) -> Result<Element> {
        let mut element = Element::new(block.element()).attr("supported", yes_no(block.supported()));
        if !block.supported() {
            return Ok(element);
        }

        for child in block.children() {
            element.push(self.block(child)?);
        }
        if let Some(values) = block.string_values() {
            for value in values.iter() {
                element.push(Element::new("value").text(value));
            }
        }
        for field in block.enums() {
            element.push(self.enum_field(&field)?);
        }
        Ok(element)
    }

    fn enum_field(&self, field: &EnumField) -> Result<Element> {
        let mut element = Element::new("enum").attr("name", field.name);
        for value in field.raw_values() {
            let name = self.tables.lookup(field.table, value)?;
            element.push(Element::new("value").text(name));
        }
        Ok(element)
    }
}

fn cpu(cpu: &CpuBlock) -> Element {
    let passthrough = Element::new("mode")
        .attr("name", "host-passthrough")
        .attr("supported", yes_no(cpu.host_passthrough));

    let host_model = Element::new("mode").attr("name", "host-model");
    let host_model = match &cpu.host_model {
        Some(model) => host_cpu(host_model.attr("supported", "yes"), model),
        None => host_model.attr("supported", "no"),
    };

    let custom = Element::new("mode").attr("name", "custom");
    let custom = match cpu.custom.as_deref().filter(|models| !models.is_empty()) {
        Some(models) => {
            let mut custom = custom.attr("supported", "yes");
            for model in models {
                custom.push(
                    Element::new("model")
                        .attr("usable", model.usable.as_str())
                        .text(model.name.as_str()),
                );
            }
            custom
        }
        None => custom.attr("supported", "no"),
    };

    Element::new("cpu")
        .child(passthrough)
        .child(host_model)
        .child(custom)
}

fn host_cpu(mut mode: Element, cpu: &HostCpuModel) -> Element {
    let mut model = Element::new("model");
    if let Some(fallback) = cpu.fallback {
        model = model.attr("fallback", fallback.as_str());
    }
    mode.push(model.text(cpu.model.as_str()));

    if let Some(vendor) = &cpu.vendor {
        mode.push(Element::new("vendor").text(vendor.as_str()));
    }
    for feature in &cpu.features {
        mode.push(
            Element::new("feature")
                .attr("policy", feature.policy.as_str())
                .attr("name", feature.name.as_str()),
        );
    }
    mode
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
