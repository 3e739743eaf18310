use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::report::Report;

/// Fixed slice palette, reused cyclically by entry position.
pub const PALETTE: [&str; 7] = [
    "#007bff", "#28a745", "#ffc107", "#dc3545", "#6c757d", "#6610f2", "#20c997",
];

/// Everything Chart.js needs for one pie, in slice order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

impl ChartSpec {
    pub fn pie(report: &Report) -> Self {
        Self {
            labels: report.entries.iter().map(|e| e.categoria.clone()).collect(),
            values: report.entries.iter().map(|e| e.monto).collect(),
            colors: (0..report.entries.len())
                .map(|i| PALETTE[i % PALETTE.len()])
                .collect(),
        }
    }

    fn config(&self) -> Value {
        json!({
            "type": "pie",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "data": self.values,
                    "backgroundColor": self.colors,
                }],
            },
            "options": {
                "plugins": {
                    "legend": { "position": "bottom" },
                    "title": { "display": true, "text": "Gastos por categoría" },
                },
            },
        })
    }
}

#[wasm_bindgen]
extern "C" {
    /// The global `Chart` constructor loaded by the index.html script tag.
    #[wasm_bindgen(js_name = Chart)]
    type JsChart;

    #[wasm_bindgen(catch, constructor, js_class = "Chart")]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<JsChart, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &JsChart);
}

/// Owns one live chart instance. The render effect must destroy the previous
/// handle before creating the next so the canvas never hosts two charts.
pub struct ChartHandle {
    inner: JsChart,
}

impl ChartHandle {
    /// Draws `spec` on `canvas` and takes ownership of the new instance.
    pub fn render(canvas: &HtmlCanvasElement, spec: &ChartSpec) -> Result<Self, JsValue> {
        // json_compatible keeps maps as plain JS objects, which is what
        // Chart.js expects for its config argument.
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let config = spec
            .config()
            .serialize(&serializer)
            .map_err(|err| JsValue::from(err.to_string()))?;
        Ok(Self {
            inner: JsChart::new(canvas, &config)?,
        })
    }

    /// Releases the chart's rendering state on the canvas.
    pub fn destroy(self) {
        self.inner.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportEntry;

    fn report_of(entries: &[(&str, f64)]) -> Report {
        Report {
            entries: entries
                .iter()
                .map(|(categoria, monto)| ReportEntry {
                    categoria: (*categoria).to_string(),
                    monto: *monto,
                })
                .collect(),
            total: None,
        }
    }

    #[test]
    fn spec_keeps_entry_order() {
        let spec = ChartSpec::pie(&report_of(&[("Transport", 40.0), ("Food", 12.5)]));
        assert_eq!(spec.labels, vec!["Transport", "Food"]);
        assert_eq!(spec.values, vec![40.0, 12.5]);
    }

    #[test]
    fn palette_is_assigned_in_sequence_and_cycles() {
        let entries: Vec<(String, f64)> = (0..9).map(|i| (format!("c{i}"), 1.0)).collect();
        let report = Report {
            entries: entries
                .into_iter()
                .map(|(categoria, monto)| ReportEntry { categoria, monto })
                .collect(),
            total: None,
        };
        let spec = ChartSpec::pie(&report);
        assert_eq!(spec.colors.len(), 9);
        assert_eq!(spec.colors[0], PALETTE[0]);
        assert_eq!(spec.colors[6], PALETTE[6]);
        assert_eq!(spec.colors[7], PALETTE[0]);
        assert_eq!(spec.colors[8], PALETTE[1]);
    }

    #[test]
    fn config_is_a_pie_with_parallel_series() {
        let spec = ChartSpec::pie(&report_of(&[("Food", 12.5)]));
        let config = spec.config();
        assert_eq!(config["type"], "pie");
        assert_eq!(config["data"]["labels"][0], "Food");
        assert_eq!(config["data"]["datasets"][0]["data"][0], 12.5);
        assert_eq!(config["data"]["datasets"][0]["backgroundColor"][0], PALETTE[0]);
    }

    #[test]
    fn spec_building_is_deterministic() {
        let report = report_of(&[("A", 1.0), ("B", 2.0)]);
        assert_eq!(ChartSpec::pie(&report), ChartSpec::pie(&report));
    }
}
