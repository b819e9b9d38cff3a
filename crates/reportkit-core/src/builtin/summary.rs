//! `widgets/summary.json`: report name, status counts and timing.

use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::catalog::BootstrapContext;
use crate::configuration::Configuration;
use crate::domain::{all_results, LaunchResults, Result, Statistic};
use crate::extension::Extension;
use crate::plugin::{PluginBundle, PluginRef};
use crate::storage::{add_json, widget_path, ReportStorage};

pub const NAME: &str = "summary";
pub const FILE_NAME: &str = "summary.json";

/// Aggregate timing over all results with known start/stop.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSummary {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub duration: Option<i64>,
    pub min_duration: Option<i64>,
    pub max_duration: Option<i64>,
    pub sum_duration: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryWidget {
    pub report_name: String,
    pub generator_version: Option<String>,
    pub report_uid: Option<String>,
    pub launches: usize,
    pub statistic: Statistic,
    pub time: TimeSummary,
}

pub struct SummaryAggregator;

impl SummaryAggregator {
    pub fn summarize(configuration: &Configuration, launches: &[LaunchResults]) -> SummaryWidget {
        let mut time = TimeSummary::default();
        for result in all_results(launches) {
            if let Some(start) = result.start {
                time.start = Some(time.start.map_or(start, |s| s.min(start)));
            }
            if let Some(stop) = result.stop {
                time.stop = Some(time.stop.map_or(stop, |s| s.max(stop)));
            }
            if let Some(d) = result.duration_ms() {
                time.min_duration = Some(time.min_duration.map_or(d, |m| m.min(d)));
                time.max_duration = Some(time.max_duration.map_or(d, |m| m.max(d)));
                time.sum_duration = time.sum_duration.saturating_add(d);
            }
        }
        if let (Some(start), Some(stop)) = (time.start, time.stop) {
            time.duration = stop.checked_sub(start);
        }

        let info = configuration.report_info();
        SummaryWidget {
            report_name: configuration.display_name().to_string(),
            generator_version: info.map(|i| i.version.clone()),
            report_uid: info.map(|i| i.report_uid.clone()),
            launches: launches.len(),
            statistic: all_results(launches).collect(),
            time,
        }
    }
}

impl Extension for SummaryAggregator {
    fn name(&self) -> &str {
        NAME
    }

    fn as_aggregator(&self) -> Option<&dyn Aggregator> {
        Some(self)
    }
}

impl Aggregator for SummaryAggregator {
    fn aggregate(
        &self,
        configuration: &Configuration,
        launches: &[LaunchResults],
        storage: &dyn ReportStorage,
    ) -> Result<()> {
        let widget = Self::summarize(configuration, launches);
        add_json(storage, &widget_path(FILE_NAME), &widget)
    }
}

pub fn plugin(_: &BootstrapContext) -> PluginRef {
    PluginBundle::new(NAME)
        .with_extension(SummaryAggregator)
        .shared()
}
