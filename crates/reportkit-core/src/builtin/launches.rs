//! `widgets/launch.json`: per-launch name, executor and counts.

use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::catalog::BootstrapContext;
use crate::configuration::Configuration;
use crate::domain::{LaunchResults, Result, Statistic};
use crate::extension::Extension;
use crate::plugin::{PluginBundle, PluginRef};
use crate::storage::{add_json, widget_path, ReportStorage};

pub const NAME: &str = "launch";
pub const FILE_NAME: &str = "launch.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchInfo {
    pub name: Option<String>,
    pub executor: Option<String>,
    pub statistic: Statistic,
}

pub struct LaunchAggregator;

impl Extension for LaunchAggregator {
    fn name(&self) -> &str {
        NAME
    }

    fn as_aggregator(&self) -> Option<&dyn Aggregator> {
        Some(self)
    }
}

impl Aggregator for LaunchAggregator {
    fn aggregate(
        &self,
        _configuration: &Configuration,
        launches: &[LaunchResults],
        storage: &dyn ReportStorage,
    ) -> Result<()> {
        let infos: Vec<LaunchInfo> = launches
            .iter()
            .map(|l| LaunchInfo {
                name: l.name.clone(),
                executor: l.executor.clone(),
                statistic: l.statistic(),
            })
            .collect();
        add_json(storage, &widget_path(FILE_NAME), &infos)
    }
}

pub fn plugin(_: &BootstrapContext) -> PluginRef {
    PluginBundle::new(NAME)
        .with_extension(LaunchAggregator)
        .shared()
}
