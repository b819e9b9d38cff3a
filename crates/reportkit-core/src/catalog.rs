//! Registration table of built-in extensions and plugins.
//!
//! The default bootstrap applies [`Catalog::builtin`]; tests inject a reduced
//! catalog through [`ConfigurationBuilder::use_catalog`].
//!
//! [`ConfigurationBuilder::use_catalog`]: crate::configuration::ConfigurationBuilder::use_catalog

use uuid::Uuid;

use crate::builtin;
use crate::configuration::ConfigurationBuilder;
use crate::extension::ExtensionRef;
use crate::plugin::PluginRef;

/// Inputs available to catalog factories.
#[derive(Debug, Clone)]
pub struct BootstrapContext {
    pub version: String,
    pub report_uid: String,
}

impl BootstrapContext {
    /// Context with `version` and a fresh random report uid.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            report_uid: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_report_uid(mut self, uid: impl Into<String>) -> Self {
        self.report_uid = uid.into();
        self
    }
}

/// Factory for one catalog entry.
#[derive(Clone, Copy)]
pub enum CatalogEntry {
    Extension(fn(&BootstrapContext) -> ExtensionRef),
    Plugin(fn(&BootstrapContext) -> PluginRef),
}

/// Ordered list of named factories.
#[derive(Clone, Default)]
pub struct Catalog {
    entries: Vec<(&'static str, CatalogEntry)>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalog, in registration order.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    pub fn with_extension(
        mut self,
        name: &'static str,
        factory: fn(&BootstrapContext) -> ExtensionRef,
    ) -> Self {
        self.entries.push((name, CatalogEntry::Extension(factory)));
        self
    }

    pub fn with_plugin(
        mut self,
        name: &'static str,
        factory: fn(&BootstrapContext) -> PluginRef,
    ) -> Self {
        self.entries.push((name, CatalogEntry::Plugin(factory)));
        self
    }

    /// Keep only entries whose name satisfies `keep`.
    pub fn retain(mut self, keep: impl Fn(&str) -> bool) -> Self {
        self.entries.retain(|(name, _)| keep(name));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiate every entry into `builder`, in order.
    pub fn apply(&self, builder: &mut ConfigurationBuilder, ctx: &BootstrapContext) {
        for (_, entry) in &self.entries {
            match entry {
                CatalogEntry::Extension(factory) => {
                    builder.add_extensions([factory(ctx)]);
                }
                CatalogEntry::Plugin(factory) => {
                    builder.add_plugins([factory(ctx)]);
                }
            }
        }
    }
}
