use gloo_net::http::Request;
use serde_json::Value;
use thiserror::Error;

use crate::report::{ExpenseInput, Report, ReportResponse};

const AGREGAR_GASTO_URL: &str = "/agregar_gasto";
const REPORTE_MENSUAL_URL: &str = "/reporte_mensual";

/// What can go wrong talking to the backend. Empty data is not an error,
/// it normalizes into an empty [`Report`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("error de red: {0}")]
    Network(String),
    #[error("{0}")]
    Backend(String),
    #[error("respuesta inválida del servidor: {0}")]
    Decode(String),
}

/// Report endpoint, with the month filter appended when one is set.
pub fn report_url(mes: &str) -> String {
    if mes.is_empty() {
        REPORTE_MENSUAL_URL.to_string()
    } else {
        format!("{REPORTE_MENSUAL_URL}?mes={mes}")
    }
}

/// The backend answers 4xx with `{"error": "..."}`. Fall back to the HTTP
/// status line when the body carries no message.
fn backend_message(body: &str, status: u16, status_text: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("{status} {status_text}"))
}

/// `POST /agregar_gasto`; resolves to the backend's acknowledgment message.
pub async fn submit_gasto(input: &ExpenseInput) -> Result<String, ApiError> {
    let resp = Request::post(AGREGAR_GASTO_URL)
        .json(&input.payload())
        .map_err(|err| ApiError::Decode(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !resp.ok() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Backend(backend_message(
            &body,
            resp.status(),
            &resp.status_text(),
        )));
    }

    let body: Value = resp
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    body.get("mensaje")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode("falta el campo mensaje".to_string()))
}

/// `GET /reporte_mensual`, normalized into the canonical [`Report`].
pub async fn fetch_report(mes: &str) -> Result<Report, ApiError> {
    let resp = Request::get(&report_url(mes))
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !resp.ok() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Backend(backend_message(
            &body,
            resp.status(),
            &resp.status_text(),
        )));
    }

    let shape: ReportResponse = resp
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(shape.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_url_without_filter_is_the_base_path() {
        assert_eq!(report_url(""), "/reporte_mensual");
    }

    #[test]
    fn report_url_appends_the_month_filter() {
        assert_eq!(report_url("2025-02"), "/reporte_mensual?mes=2025-02");
    }

    #[test]
    fn backend_message_prefers_the_error_field() {
        let msg = backend_message(r#"{"error":"No hay datos disponibles"}"#, 400, "Bad Request");
        assert_eq!(msg, "No hay datos disponibles");
    }

    #[test]
    fn backend_message_falls_back_to_the_status_line() {
        assert_eq!(backend_message("", 500, "Internal Server Error"), "500 Internal Server Error");
        assert_eq!(backend_message("<html>", 502, "Bad Gateway"), "502 Bad Gateway");
    }
}
