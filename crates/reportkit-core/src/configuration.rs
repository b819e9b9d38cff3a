//! Configuration builder and the frozen configuration it produces.
//!
//! Registration order is preserved: a plugin's extensions are appended at the
//! point where the plugin is registered, not at the end.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::aggregator::Aggregator;
use crate::catalog::{BootstrapContext, Catalog};
use crate::extension::{Extension, ExtensionRef, ReportInfo};
use crate::plugin::PluginRef;
use crate::version::VersionResolver;

/// Name shown for a report built without an explicit name.
pub const UNNAMED_REPORT: &str = "unnamed report";

/// Immutable snapshot of registered extensions, plugins and the report name.
///
/// Cloning is cheap: the sequences are shared, never copied.
#[derive(Clone)]
pub struct Configuration {
    report_name: Option<String>,
    extensions: Arc<[ExtensionRef]>,
    plugins: Arc<[PluginRef]>,
}

impl Configuration {
    pub fn report_name(&self) -> Option<&str> {
        self.report_name.as_deref()
    }

    /// Report name, or [`UNNAMED_REPORT`] when none was set.
    pub fn display_name(&self) -> &str {
        self.report_name.as_deref().unwrap_or(UNNAMED_REPORT)
    }

    pub fn extensions(&self) -> &[ExtensionRef] {
        &self.extensions
    }

    pub fn plugins(&self) -> &[PluginRef] {
        &self.plugins
    }

    /// Extensions carrying the aggregator capability, in registration order.
    pub fn aggregator_extensions(&self) -> Vec<ExtensionRef> {
        self.extensions
            .iter()
            .filter(|e| e.as_aggregator().is_some())
            .cloned()
            .collect()
    }

    /// Aggregators in registration order.
    pub fn aggregators(&self) -> impl Iterator<Item = &dyn Aggregator> {
        self.extensions.iter().filter_map(|e| e.as_aggregator())
    }

    /// First registered report-info context, if any.
    pub fn report_info(&self) -> Option<&ReportInfo> {
        self.extensions.iter().find_map(|e| e.as_report_info())
    }

    /// First extension registered under `name`.
    pub fn find_extension(&self, name: &str) -> Option<&ExtensionRef> {
        self.extensions.iter().find(|e| e.name() == name)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("report_name", &self.report_name)
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Accumulates extensions and plugins, then freezes them with [`build`](Self::build).
#[derive(Default)]
pub struct ConfigurationBuilder {
    extensions: Vec<ExtensionRef>,
    plugins: Vec<PluginRef>,
    report_name: Option<String>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in catalog with a version resolved from the environment.
    pub fn use_default(&mut self) -> &mut Self {
        let ctx = BootstrapContext::new(VersionResolver::from_env().resolve());
        self.use_catalog(&Catalog::builtin(), &ctx)
    }

    /// Register every entry of `catalog`, in catalog order.
    pub fn use_catalog(&mut self, catalog: &Catalog, ctx: &BootstrapContext) -> &mut Self {
        debug!(entries = catalog.len(), version = %ctx.version, "registering catalog");
        catalog.apply(self, ctx);
        self
    }

    /// Append `extensions` in iteration order. No deduplication.
    pub fn add_extensions<I>(&mut self, extensions: I) -> &mut Self
    where
        I: IntoIterator<Item = ExtensionRef>,
    {
        self.extensions.extend(extensions);
        self
    }

    pub fn add_extension(&mut self, extension: impl Extension + 'static) -> &mut Self {
        self.add_extensions([Arc::new(extension) as ExtensionRef])
    }

    /// Append `plugins` in iteration order, harvesting each plugin's
    /// extensions right after it is registered.
    pub fn add_plugins<I>(&mut self, plugins: I) -> &mut Self
    where
        I: IntoIterator<Item = PluginRef>,
    {
        for plugin in plugins {
            debug!(
                plugin = %plugin.id(),
                extensions = plugin.extensions().len(),
                "plugin registered"
            );
            self.add_extensions(plugin.extensions().iter().cloned());
            self.plugins.push(plugin);
        }
        self
    }

    /// Set the report name. The last call wins.
    pub fn with_report_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.report_name = Some(name.into());
        self
    }

    /// Freeze the current state. Later builder calls do not affect the result.
    pub fn build(&self) -> Configuration {
        Configuration {
            report_name: self.report_name.clone(),
            extensions: self.extensions.iter().cloned().collect(),
            plugins: self.plugins.iter().cloned().collect(),
        }
    }
}
