pub mod render;

use crate::models::ParameterSource;
use crate::simulation::TimeSeries;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub use render::{CompositeRenderer, ConsoleRenderer, FileRenderer, Renderer};

pub const X_LABEL: &str = "Time (hours)";
pub const Y_LABEL: &str = "Concentration (mg/L)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleHints {
    pub trace_name: String,
    pub line_color: String,
    pub line_width: u32,
    pub template: String,
}

/// Everything a renderer needs to draw one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: TimeSeries,
    pub style: StyleHints,
    pub parameter_source: ParameterSource,
}

pub fn chart_title(drug: &str, dose: f64, unit: &str) -> String {
    format!("Pharmacokinetics of {} (Dose: {} {})", drug, dose, unit)
}

pub fn package_curve(
    series: TimeSeries,
    drug: &str,
    dose: f64,
    unit: &str,
    parameter_source: ParameterSource,
) -> ChartDescriptor {
    ChartDescriptor {
        title: chart_title(drug, dose, unit),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        series,
        style: StyleHints {
            trace_name: format!("{} {}{}", drug, dose, unit),
            line_color: "blue".to_string(),
            line_width: 2,
            template: "plotly_white".to_string(),
        },
        parameter_source,
    }
}

impl ChartDescriptor {
    /// Plotly figure (`data` + `layout`) for this curve.
    pub fn to_plotly_json(&self) -> Value {
        json!({
            "data": [{
                "type": "scatter",
                "mode": "lines",
                "name": self.style.trace_name,
                "x": self.series.times(),
                "y": self.series.concentrations(),
                "line": { "color": self.style.line_color, "width": self.style.line_width },
            }],
            "layout": {
                "title": self.title,
                "xaxis": { "title": self.x_label },
                "yaxis": { "title": self.y_label },
                "template": self.style.template,
            },
        })
    }
}
