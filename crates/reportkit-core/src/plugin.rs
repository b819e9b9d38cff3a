//! Plugins: named bundles of extensions.

use std::sync::Arc;

use crate::extension::{Extension, ExtensionRef};

/// A named bundle owning an ordered list of extensions.
///
/// `extensions()` must return the same sequence on every call within a run.
pub trait Plugin: Send + Sync {
    fn id(&self) -> &str;

    fn extensions(&self) -> &[ExtensionRef];
}

/// Shared handle to a registered plugin.
pub type PluginRef = Arc<dyn Plugin>;

/// Plugin whose extensions are fixed at construction.
pub struct PluginBundle {
    id: String,
    extensions: Vec<ExtensionRef>,
}

impl PluginBundle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extensions: Vec::new(),
        }
    }

    pub fn with_extension(self, extension: impl Extension + 'static) -> Self {
        self.with_extension_ref(Arc::new(extension))
    }

    pub fn with_extension_ref(mut self, extension: ExtensionRef) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn shared(self) -> PluginRef {
        Arc::new(self)
    }
}

impl Plugin for PluginBundle {
    fn id(&self) -> &str {
        &self.id
    }

    fn extensions(&self) -> &[ExtensionRef] {
        &self.extensions
    }
}

impl std::fmt::Debug for PluginBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginBundle")
            .field("id", &self.id)
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
