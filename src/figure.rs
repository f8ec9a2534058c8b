//! Render adapter — converts derived views into Plotly-compatible
//! figure specifications. The browser hands each `Figure` straight to
//! `Plotly.newPlot`; the server never renders anything itself.

use serde::Serialize;
use serde_json::{json, Value};

use crate::views::{
    AdmissionTrends, AgeDistribution, BillingDistribution, ConditionShare, InsuranceBilling,
};

/// Trace type for the admission-trends chart. Selects rendering mode
/// only; the aggregated series is identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown chart kind '{0}' (expected 'line' or 'bar')")]
pub struct UnknownChartKind(pub String);

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

impl std::str::FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            other => Err(UnknownChartKind(other.to_string())),
        }
    }
}

/// A Plotly figure specification: trace objects plus a layout.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

/// Figure with no traces and a centered "no data" annotation. Every
/// builder uses this for an empty input rather than erroring.
fn empty_figure(title: &str) -> Figure {
    Figure {
        data: Vec::new(),
        layout: json!({
            "title": { "text": title },
            "annotations": [{
                "text": "No matching records",
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": 0.5,
                "y": 0.5,
            }],
        }),
    }
}

/// Layered age histogram, one trace per gender series.
pub fn age_histogram(view: &AgeDistribution) -> Figure {
    let title = "Patient Age Distribution";
    let series = match view {
        AgeDistribution::Empty => return empty_figure(title),
        AgeDistribution::Series(series) => series,
    };

    let data = series
        .iter()
        .map(|s| {
            json!({
                "type": "histogram",
                "x": s.ages,
                "name": s.gender,
                "opacity": 0.6,
            })
        })
        .collect();

    Figure {
        data,
        layout: json!({
            "title": { "text": title },
            "barmode": "overlay",
            "xaxis": { "title": { "text": "Age" } },
            "yaxis": { "title": { "text": "Patients" } },
        }),
    }
}

/// Pie chart of encounter counts per medical condition.
pub fn condition_pie(view: &ConditionShare) -> Figure {
    let title = "Medical Condition Share";
    if view.slices.is_empty() {
        return empty_figure(title);
    }

    let labels: Vec<&str> = view.slices.iter().map(|s| s.condition.as_str()).collect();
    let values: Vec<u64> = view.slices.iter().map(|s| s.count).collect();

    Figure {
        data: vec![json!({
            "type": "pie",
            "labels": labels,
            "values": values,
        })],
        layout: json!({ "title": { "text": title } }),
    }
}

/// Grouped bars of summed billing per insurance provider, one trace per
/// medical condition.
pub fn insurance_bars(view: &InsuranceBilling) -> Figure {
    let title = "Billing by Insurance Provider";
    if view.groups.is_empty() {
        return empty_figure(title);
    }

    // One trace per condition over the provider axis.
    let mut conditions: Vec<&str> = view.groups.iter().map(|g| g.condition.as_str()).collect();
    conditions.sort();
    conditions.dedup();

    let data = conditions
        .iter()
        .map(|condition| {
            let (providers, totals): (Vec<&str>, Vec<f64>) = view
                .groups
                .iter()
                .filter(|g| g.condition == *condition)
                .map(|g| (g.provider.as_str(), g.total))
                .unzip();
            json!({
                "type": "bar",
                "name": condition,
                "x": providers,
                "y": totals,
            })
        })
        .collect();

    Figure {
        data,
        layout: json!({
            "title": { "text": title },
            "barmode": "group",
            "xaxis": { "title": { "text": "Insurance Provider" } },
            "yaxis": { "title": { "text": "Total Billing" } },
        }),
    }
}

/// Bar chart over the pre-bucketed billing histogram.
pub fn billing_histogram(view: &BillingDistribution) -> Figure {
    let title = "Billing Amount Distribution";
    if view.buckets.is_empty() {
        return empty_figure(title);
    }

    let labels: Vec<String> = view
        .buckets
        .iter()
        .map(|b| format!("{:.0}-{:.0}", b.lower, b.upper))
        .collect();
    let counts: Vec<u64> = view.buckets.iter().map(|b| b.count).collect();

    Figure {
        data: vec![json!({
            "type": "bar",
            "x": labels,
            "y": counts,
        })],
        layout: json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": "Billing Amount" } },
            "yaxis": { "title": { "text": "Patients" } },
        }),
    }
}

/// Admissions-per-month chart. `kind` picks the trace type; the x/y
/// arrays are the same for both.
pub fn trends_chart(view: &AdmissionTrends, kind: ChartKind) -> Figure {
    let title = "Admissions Over Time";
    if view.points.is_empty() {
        return empty_figure(title);
    }

    let labels: Vec<&str> = view.points.iter().map(|p| p.label.as_str()).collect();
    let counts: Vec<u64> = view.points.iter().map(|p| p.count).collect();

    let trace = match kind {
        ChartKind::Line => json!({
            "type": "scatter",
            "mode": "lines+markers",
            "x": labels,
            "y": counts,
        }),
        ChartKind::Bar => json!({
            "type": "bar",
            "x": labels,
            "y": counts,
        }),
    };

    Figure {
        data: vec![trace],
        layout: json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": "Month" } },
            "yaxis": { "title": { "text": "Admissions" } },
        }),
    }
}
