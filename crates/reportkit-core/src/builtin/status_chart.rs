//! `widgets/status-chart.json`: one entry per result.

use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::catalog::BootstrapContext;
use crate::configuration::Configuration;
use crate::domain::{all_results, LaunchResults, Result, Status};
use crate::extension::Extension;
use crate::plugin::{PluginBundle, PluginRef};
use crate::storage::{add_json, widget_path, ReportStorage};

pub const NAME: &str = "status-chart";
pub const FILE_NAME: &str = "status-chart.json";
pub const DEFAULT_SEVERITY: &str = "normal";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChartItem {
    pub uid: String,
    pub name: String,
    pub status: Status,
    pub severity: String,
}

pub struct StatusChartAggregator;

impl StatusChartAggregator {
    pub fn items(launches: &[LaunchResults]) -> Vec<StatusChartItem> {
        all_results(launches)
            .map(|r| StatusChartItem {
                uid: r.uid.clone(),
                name: r.name.clone(),
                status: r.status,
                severity: r.label("severity").unwrap_or(DEFAULT_SEVERITY).to_string(),
            })
            .collect()
    }
}

impl Extension for StatusChartAggregator {
    fn name(&self) -> &str {
        NAME
    }

    fn as_aggregator(&self) -> Option<&dyn Aggregator> {
        Some(self)
    }
}

impl Aggregator for StatusChartAggregator {
    fn aggregate(
        &self,
        _configuration: &Configuration,
        launches: &[LaunchResults],
        storage: &dyn ReportStorage,
    ) -> Result<()> {
        add_json(storage, &widget_path(FILE_NAME), &Self::items(launches))
    }
}

pub fn plugin(_: &BootstrapContext) -> PluginRef {
    PluginBundle::new(NAME)
        .with_extension(StatusChartAggregator)
        .shared()
}
