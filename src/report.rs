use serde::Deserialize;
use serde_json::{json, Value};

/// One expense as captured from the form, ready to ship to the backend.
pub struct ExpenseInput {
    pub categoria: String,
    pub descripcion: String,
    pub monto: f64,
    pub fecha: Option<String>,
}

impl ExpenseInput {
    /// Wire body for `POST /agregar_gasto`. A non-finite amount serializes
    /// as JSON `null` so the backend rejects it, matching what the browser
    /// sends for an unparseable number field.
    pub fn payload(&self) -> Value {
        let mut body = json!({
            "categoria": self.categoria,
            "descripcion": self.descripcion,
            "monto": self.monto,
        });
        if let Some(fecha) = &self.fecha {
            body["fecha"] = json!(fecha);
        }
        body
    }
}

/// Aggregated total for one category, in the order the backend returned it.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportEntry {
    pub categoria: String,
    pub monto: f64,
}

/// Canonical monthly report. Replaced wholesale on every refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
    pub total: Option<f64>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The two wire shapes `/reporte_mensual` is known to answer with.
///
/// `Entries` must come first: the parallel-array variant treats every field
/// as optional so that a body with no data arrays still decodes as an empty
/// report, and it would otherwise swallow the `reporte` shape too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReportResponse {
    Entries {
        reporte: Vec<RawEntry>,
        #[serde(default)]
        total: Option<f64>,
    },
    Parallel {
        #[serde(default)]
        categorias: Vec<String>,
        #[serde(default)]
        montos: Vec<f64>,
        #[serde(default)]
        total: Option<f64>,
    },
}

/// Entry as serialized by the backend, Spanish column names included.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    #[serde(rename = "Categoría")]
    pub categoria: String,
    #[serde(rename = "Monto")]
    pub monto: f64,
}

impl ReportResponse {
    /// Collapses either wire shape into the canonical entry sequence,
    /// keeping the backend's ordering.
    pub fn normalize(self) -> Report {
        match self {
            ReportResponse::Entries { reporte, total } => Report {
                entries: reporte
                    .into_iter()
                    .map(|raw| ReportEntry {
                        categoria: raw.categoria,
                        monto: raw.monto,
                    })
                    .collect(),
                total,
            },
            ReportResponse::Parallel {
                categorias,
                montos,
                total,
            } => Report {
                entries: categorias
                    .into_iter()
                    .zip(montos)
                    .map(|(categoria, monto)| ReportEntry { categoria, monto })
                    .collect(),
                total,
            },
        }
    }
}

fn format_with_commas(value: i64) -> String {
    let digits = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// Two-decimal currency formatting with thousands separators.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let mut whole = abs.trunc() as i64;
    let mut cents = ((abs - abs.trunc()) * 100.0).round() as i64;
    if cents == 100 {
        whole += 1;
        cents = 0;
    }
    format!("{}{}{}.{:02}", sign, symbol, format_with_commas(whole), cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Report {
        serde_json::from_str::<ReportResponse>(body)
            .expect("report body should decode")
            .normalize()
    }

    #[test]
    fn normalizes_parallel_arrays_in_response_order() {
        let report = parse(r#"{"categorias":["Food"],"montos":[12.5],"total":12.5}"#);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].categoria, "Food");
        assert_eq!(report.entries[0].monto, 12.5);
        assert_eq!(report.total, Some(12.5));
    }

    #[test]
    fn normalizes_entry_objects_in_response_order() {
        let report = parse(
            r#"{"reporte":[{"Categoría":"Transport","Monto":40},{"Categoría":"Food","Monto":12.5}],"total":52.5}"#,
        );
        let categorias: Vec<&str> = report.entries.iter().map(|e| e.categoria.as_str()).collect();
        let montos: Vec<f64> = report.entries.iter().map(|e| e.monto).collect();
        assert_eq!(categorias, vec!["Transport", "Food"]);
        assert_eq!(montos, vec![40.0, 12.5]);
        assert_eq!(report.total, Some(52.5));
    }

    #[test]
    fn entry_shape_without_total_carries_none() {
        let report = parse(r#"{"reporte":[{"Categoría":"Salud","Monto":3}]}"#);
        assert_eq!(report.total, None);
    }

    #[test]
    fn empty_entry_array_is_an_empty_report() {
        let report = parse(r#"{"reporte":[],"total":0}"#);
        assert!(report.is_empty());
        assert_eq!(report.total, Some(0.0));
    }

    #[test]
    fn missing_arrays_are_an_empty_report() {
        assert!(parse(r#"{}"#).is_empty());
        assert!(parse(r#"{"total":0}"#).is_empty());
    }

    #[test]
    fn parallel_arrays_of_unequal_length_truncate_to_the_shorter() {
        let report = parse(r#"{"categorias":["A","B","C"],"montos":[1,2]}"#);
        assert_eq!(report.entries.len(), 2);
    }

    #[test]
    fn normalization_is_deterministic() {
        let body = r#"{"categorias":["A","B"],"montos":[1,2],"total":3}"#;
        assert_eq!(parse(body), parse(body));
    }

    #[test]
    fn payload_uses_the_backend_field_names() {
        let input = ExpenseInput {
            categoria: "Comida".into(),
            descripcion: "Almuerzo".into(),
            monto: 12.5,
            fecha: Some("2025-02-14".into()),
        };
        let body = input.payload();
        assert_eq!(body["categoria"], "Comida");
        assert_eq!(body["descripcion"], "Almuerzo");
        assert_eq!(body["monto"], 12.5);
        assert_eq!(body["fecha"], "2025-02-14");
    }

    #[test]
    fn payload_omits_a_missing_fecha() {
        let input = ExpenseInput {
            categoria: "Comida".into(),
            descripcion: "Almuerzo".into(),
            monto: 5.0,
            fecha: None,
        };
        assert!(input.payload().get("fecha").is_none());
    }

    #[test]
    fn payload_sends_null_for_a_non_finite_amount() {
        let input = ExpenseInput {
            categoria: "Comida".into(),
            descripcion: "".into(),
            monto: f64::NAN,
            fecha: None,
        };
        assert!(input.payload()["monto"].is_null());
    }

    #[test]
    fn formats_two_decimals_with_symbol() {
        assert_eq!(format_currency(12.5, "$"), "$12.50");
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(40.0, "€"), "€40.00");
    }

    #[test]
    fn formats_thousands_and_rounds_cents() {
        assert_eq!(format_currency(1234.567, "$"), "$1,234.57");
        assert_eq!(format_currency(999.999, "$"), "$1,000.00");
        assert_eq!(format_currency(-7.5, "$"), "-$7.50");
    }
}
