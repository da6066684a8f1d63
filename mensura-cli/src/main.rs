//! Mensura CLI
//!
//! Reads one JSON request per line on stdin and writes one JSON response per
//! line on stdout. Logs go to stderr, filtered by `RUST_LOG` (default info).
//!
//! Methods:
//! - convert: `{"unit", "value", "to"}`
//! - format: `{"unit", "value", "locale"?, "style"?, "case"?}`
//! - preferred_units: `{"unit", "value", "territory", "usage"?}`
//! - decompose: `{"unit", "value", "targets"}`
//! - localize: `{"unit", "value", "territory", "usage"?, "locale"?}`
//! - units / categories: no params
//!
//! ```text
//! {"id": 1, "method": "convert", "params": {"unit": "mile", "value": "1", "to": "foot"}}
//! {"id":1,"result":{"unit":"foot","value":"5280","text":"5,280 feet"}}
//! ```

use std::io::{self, BufRead, Write};

use mensura::{FormatOptions, GrammaticalCase, Mensura, Number, Style, Unit, UnitError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DECIMAL_PLACES: u32 = 6;

// ========== Protocol types ==========

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: JsonValue,
}

#[derive(Debug, Serialize)]
struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl ErrorBody {
    fn invalid_request(message: impl Into<String>) -> Self {
        ErrorBody { code: "INVALID_REQUEST".to_string(), message: message.into(), data: None }
    }
}

impl From<UnitError> for ErrorBody {
    fn from(e: UnitError) -> Self {
        ErrorBody {
            code: e.code().to_string(),
            message: e.to_string(),
            data: serde_json::to_value(&e).ok(),
        }
    }
}

// ========== Params ==========

#[derive(Debug, Deserialize)]
struct UnitParams {
    unit: String,
    value: String,
    #[serde(default)]
    usage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConvertParams {
    #[serde(flatten)]
    unit: UnitParams,
    to: String,
}

#[derive(Debug, Deserialize)]
struct FormatParams {
    #[serde(flatten)]
    unit: UnitParams,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    style: Option<Style>,
    #[serde(default)]
    case: Option<GrammaticalCase>,
}

#[derive(Debug, Deserialize)]
struct PreferenceParams {
    #[serde(flatten)]
    unit: UnitParams,
    territory: String,
    #[serde(default)]
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DecomposeParams {
    #[serde(flatten)]
    unit: UnitParams,
    targets: Vec<String>,
}

fn params<T: for<'de> Deserialize<'de>>(value: &JsonValue) -> Result<T, ErrorBody> {
    serde_json::from_value(value.clone()).map_err(|e| ErrorBody::invalid_request(format!("invalid params: {}", e)))
}

// ========== Handlers ==========

fn handle_request(mensura: &Mensura, request: &Request) -> Response {
    let result = match request.method.as_str() {
        "convert" => handle_convert(mensura, &request.params),
        "format" => handle_format(mensura, &request.params),
        "preferred_units" => handle_preferred_units(mensura, &request.params),
        "decompose" => handle_decompose(mensura, &request.params),
        "localize" => handle_localize(mensura, &request.params),
        "units" => Ok(json!(mensura.known_units())),
        "categories" => Ok(json!(mensura.known_categories())),
        other => Err(ErrorBody::invalid_request(format!("unknown method: {}", other))),
    };

    match result {
        Ok(result) => Response { id: request.id.clone(), result: Some(result), error: None },
        Err(error) => {
            warn!(method = %request.method, code = %error.code, "request failed");
            Response { id: request.id.clone(), result: None, error: Some(error) }
        }
    }
}

fn build_unit(mensura: &Mensura, params: &UnitParams) -> Result<Unit, ErrorBody> {
    let value = Number::from_str(&params.value).map_err(UnitError::from)?;
    let unit = mensura.try_new_unit(&params.unit, value)?;
    Ok(match &params.usage {
        Some(usage) => unit.with_usage(usage.as_str()),
        None => unit,
    })
}

fn unit_json(mensura: &Mensura, unit: &Unit) -> Result<JsonValue, ErrorBody> {
    Ok(json!({
        "unit": unit.name,
        "value": unit.value.to_string(),
        "decimal": unit.value.as_decimal(DECIMAL_PLACES),
        "text": mensura.try_format(unit)?,
    }))
}

fn handle_convert(mensura: &Mensura, value: &JsonValue) -> Result<JsonValue, ErrorBody> {
    let p: ConvertParams = params(value)?;
    let unit = build_unit(mensura, &p.unit)?;
    let converted = mensura.try_convert(&unit, &p.to)?;
    unit_json(mensura, &converted)
}

fn handle_format(mensura: &Mensura, value: &JsonValue) -> Result<JsonValue, ErrorBody> {
    let p: FormatParams = params(value)?;
    let unit = build_unit(mensura, &p.unit)?;
    let locale = p.locale.unwrap_or_else(|| mensura.config().default_locale.clone());
    let mut options: FormatOptions = mensura.format_options();
    if let Some(style) = p.style {
        options = options.with_style(style);
    }
    if let Some(case) = p.case {
        options = options.with_case(case);
    }
    let text = mensura.try_format_with(&unit, &locale, &options)?;
    let parts = mensura.try_format_to_parts(&unit, &locale, &options)?;
    Ok(json!({ "text": text, "parts": parts }))
}

fn handle_preferred_units(mensura: &Mensura, value: &JsonValue) -> Result<JsonValue, ErrorBody> {
    let p: PreferenceParams = params(value)?;
    let unit = build_unit(mensura, &p.unit)?;
    let preference = mensura.try_preferred_units(&unit, &p.territory, p.unit.usage.as_deref())?;
    Ok(json!(preference))
}

fn handle_decompose(mensura: &Mensura, value: &JsonValue) -> Result<JsonValue, ErrorBody> {
    let p: DecomposeParams = params(value)?;
    let unit = build_unit(mensura, &p.unit)?;
    let targets: Vec<&str> = p.targets.iter().map(String::as_str).collect();
    let parts = mensura.try_decompose(&unit, &targets)?;
    let parts = parts.iter().map(|u| unit_json(mensura, u)).collect::<Result<Vec<_>, _>>()?;
    Ok(json!(parts))
}

fn handle_localize(mensura: &Mensura, value: &JsonValue) -> Result<JsonValue, ErrorBody> {
    let p: PreferenceParams = params(value)?;
    let unit = build_unit(mensura, &p.unit)?;
    let locale = p.locale.unwrap_or_else(|| mensura.config().default_locale.clone());
    let parts = mensura.try_localize(&unit, &p.territory, p.unit.usage.as_deref())?;
    let text = mensura.try_format_list(&parts, &locale, &mensura.format_options())?;
    let units = parts.iter().map(|u| unit_json(mensura, u)).collect::<Result<Vec<_>, _>>()?;
    Ok(json!({ "text": text, "units": units }))
}

// ========== Main loop ==========

fn write_response(response: &Response) -> io::Result<()> {
    let line = serde_json::to_string(response).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let mensura = Mensura::from_env();
    info!(version = VERSION, locale = %mensura.config().default_locale, "mensura ready");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                handle_request(&mensura, &request)
            }
            Err(e) => Response {
                id: None,
                result: None,
                error: Some(ErrorBody::invalid_request(format!("parse error: {}", e))),
            },
        };

        if let Err(e) = write_response(&response) {
            error!(error = %e, "error writing response");
            break;
        }
    }

    info!("input closed, shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(method: &str, params: JsonValue) -> Response {
        let request = Request { id: Some(json!(1)), method: method.to_string(), params };
        handle_request(&Mensura::new(), &request)
    }

    #[test]
    fn test_convert() {
        let response = call("convert", json!({"unit": "mile", "value": "1", "to": "foot"}));
        let result = response.result.unwrap();
        assert_eq!(result["unit"], "foot");
        assert_eq!(result["value"], "5280");
        assert_eq!(result["text"], "5,280 feet");
    }

    #[test]
    fn test_format_with_style() {
        let response = call("format", json!({"unit": "kilometer", "value": "5", "locale": "de", "style": "short"}));
        let result = response.result.unwrap();
        assert_eq!(result["text"], "5 km");
        assert_eq!(result["parts"][0]["kind"], "number");
    }

    #[test]
    fn test_preferred_units() {
        let response = call(
            "preferred_units",
            json!({"unit": "meter", "value": "1", "territory": "US", "usage": "person_height"}),
        );
        assert_eq!(response.result.unwrap()["units"], json!(["foot", "inch"]));
    }

    #[test]
    fn test_decompose() {
        let response = call("decompose", json!({"unit": "second", "value": "3725", "targets": ["hour", "minute", "second"]}));
        let result = response.result.unwrap();
        assert_eq!(result[0]["text"], "1 hour");
        assert_eq!(result[2]["value"], "5");
    }

    #[test]
    fn test_unit_error_carries_code() {
        let response = call("convert", json!({"unit": "meter", "value": "1", "to": "second"}));
        let error = response.error.unwrap();
        assert_eq!(error.code, "INCOMPATIBLE_UNITS");
        assert_eq!(error.data.unwrap()["error"], "incompatible_units");
    }

    #[test]
    fn test_oversized_exponent_is_invalid_number() {
        let response = call("convert", json!({"unit": "meter", "value": "1e2000000", "to": "foot"}));
        assert_eq!(response.error.unwrap().code, "INVALID_NUMBER");
    }

    #[test]
    fn test_bad_params_and_method() {
        let response = call("convert", json!({"unit": "meter"}));
        assert_eq!(response.error.unwrap().code, "INVALID_REQUEST");
        let response = call("teleport", JsonValue::Null);
        assert_eq!(response.error.unwrap().code, "INVALID_REQUEST");
    }
}
