//! Extensions: capability-bearing units registered into a configuration.
//!
//! An extension is polymorphic over an explicit capability set. The pipeline
//! filters the registry with the `as_*` accessors instead of inspecting
//! concrete types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;

/// Capabilities an extension can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Produces artifacts from launch results.
    Aggregator,
    /// Supplies report metadata (version, uid) to other extensions.
    ReportInfo,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Aggregator => f.write_str("aggregator"),
            Capability::ReportInfo => f.write_str("report_info"),
        }
    }
}

/// Report metadata shared through the [`Capability::ReportInfo`] capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportInfo {
    pub version: String,
    pub report_uid: String,
}

/// A unit registered into a configuration.
pub trait Extension: Send + Sync {
    /// Stable, human-readable name.
    fn name(&self) -> &str;

    fn as_aggregator(&self) -> Option<&dyn Aggregator> {
        None
    }

    fn as_report_info(&self) -> Option<&ReportInfo> {
        None
    }

    /// Capabilities this extension carries, in declaration order.
    fn capabilities(&self) -> Vec<Capability> {
        let mut caps = Vec::new();
        if self.as_aggregator().is_some() {
            caps.push(Capability::Aggregator);
        }
        if self.as_report_info().is_some() {
            caps.push(Capability::ReportInfo);
        }
        caps
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// Shared handle to a registered extension.
pub type ExtensionRef = Arc<dyn Extension>;

/// Reference identity: true when both handles point at the same extension.
pub fn same_extension(a: &ExtensionRef, b: &ExtensionRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Extension that carries no capability beyond its name.
///
/// Useful as a marker and in tests.
#[derive(Debug, Clone)]
pub struct NamedExtension {
    name: String,
}

impl NamedExtension {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn shared(name: impl Into<String>) -> ExtensionRef {
        Arc::new(Self::new(name))
    }
}

impl Extension for NamedExtension {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InfoOnly(ReportInfo);

    impl Extension for InfoOnly {
        fn name(&self) -> &str {
            "info-only"
        }

        fn as_report_info(&self) -> Option<&ReportInfo> {
            Some(&self.0)
        }
    }

    #[test]
    fn named_extension_has_no_capabilities() {
        let ext = NamedExtension::new("plain");
        assert_eq!(ext.name(), "plain");
        assert!(ext.capabilities().is_empty());
        assert!(!ext.has_capability(Capability::Aggregator));
    }

    #[test]
    fn report_info_capability_is_reported() {
        let ext = InfoOnly(ReportInfo {
            version: "1.0".to_string(),
            report_uid: "uid".to_string(),
        });
        assert_eq!(ext.capabilities(), vec![Capability::ReportInfo]);
    }

    #[test]
    fn same_extension_is_reference_identity() {
        let a = NamedExtension::shared("x");
        let b = NamedExtension::shared("x");
        let a2 = Arc::clone(&a);
        assert!(same_extension(&a, &a2));
        assert!(!same_extension(&a, &b));
    }

    #[test]
    fn capability_display_is_snake_case() {
        assert_eq!(Capability::Aggregator.to_string(), "aggregator");
        assert_eq!(Capability::ReportInfo.to_string(), "report_info");
    }
}
