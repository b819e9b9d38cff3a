//! Report metadata context: generator version and report uid.

use std::sync::Arc;

use crate::catalog::BootstrapContext;
use crate::extension::{Extension, ExtensionRef, ReportInfo};

pub const NAME: &str = "report-info";

/// Context-only extension; carries no aggregator capability.
pub struct ReportInfoContext {
    info: ReportInfo,
}

impl ReportInfoContext {
    pub fn new(info: ReportInfo) -> Self {
        Self { info }
    }
}

impl Extension for ReportInfoContext {
    fn name(&self) -> &str {
        NAME
    }

    fn as_report_info(&self) -> Option<&ReportInfo> {
        Some(&self.info)
    }
}

pub fn extension(ctx: &BootstrapContext) -> ExtensionRef {
    Arc::new(ReportInfoContext::new(ReportInfo {
        version: ctx.version.clone(),
        report_uid: ctx.report_uid.clone(),
    }))
}
