//! Checks backend answers against the shape each prediction promises.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// Occupancy above this fraction raises the alert
pub const OCCUPANCY_ALERT_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResult {
    pub service_category: String,
    /// Computed by the backend, never filled in here
    pub priority_score: f64,
}

/// Estimated wait in minutes, or `None` when the backend had no estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingTimeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_time: Option<f64>,
}

impl WaitingTimeResult {
    pub fn unavailable() -> Self {
        Self { waiting_time: None }
    }

    pub fn is_available(&self) -> bool {
        self.waiting_time.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResult {
    pub bed_occupancy_rate: f64,
    pub staff_needed: u32,
    pub occupancy_alert: bool,
}

impl ResourceResult {
    pub fn new(bed_occupancy_rate: f64, staff_needed: u32) -> Self {
        Self {
            bed_occupancy_rate,
            staff_needed,
            occupancy_alert: bed_occupancy_rate > OCCUPANCY_ALERT_THRESHOLD,
        }
    }
}

pub fn appointment_result(body: &[u8]) -> Result<AppointmentResult, GatewayError> {
    let fields = object(body)?;

    let service_category = match required(&fields, "serviceCategory")? {
        Value::String(category) if !category.trim().is_empty() => category.clone(),
        _ => return Err(invalid("serviceCategory", "a non-empty string")),
    };
    let priority_score = finite(required(&fields, "priorityScore")?, "priorityScore")?;

    Ok(AppointmentResult {
        service_category,
        priority_score,
    })
}

/// An absent or null `waitingTime` is an unavailable estimate, not an error
pub fn waiting_time_result(body: &[u8]) -> Result<WaitingTimeResult, GatewayError> {
    let fields = object(body)?;

    match fields.get("waitingTime") {
        None | Some(Value::Null) => Ok(WaitingTimeResult::unavailable()),
        Some(value) => {
            let minutes = finite(value, "waitingTime")?;
            if minutes < 0.0 {
                return Err(invalid("waitingTime", "a non-negative number of minutes"));
            }
            Ok(WaitingTimeResult {
                waiting_time: Some(minutes),
            })
        }
    }
}

pub fn resource_result(body: &[u8]) -> Result<ResourceResult, GatewayError> {
    let fields = object(body)?;

    let rate = finite(required(&fields, "bedOccupancyRate")?, "bedOccupancyRate")?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(invalid("bedOccupancyRate", "a rate between 0 and 1"));
    }

    let staff = required(&fields, "staffNeeded")?;
    let staff_needed = staff
        .as_u64()
        .or_else(|| staff.as_f64().filter(|n| *n >= 0.0 && n.fract() == 0.0).map(|n| n as u64))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid("staffNeeded", "a non-negative integer"))?;

    Ok(ResourceResult::new(rate, staff_needed))
}

fn object(body: &[u8]) -> Result<Map<String, Value>, GatewayError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(GatewayError::malformed("expected a JSON object")),
        Err(e) => Err(GatewayError::malformed(format!("body is not JSON ({})", e))),
    }
}

fn required<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a Value, GatewayError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(GatewayError::malformed(format!("missing field `{}`", field))),
        Some(value) => Ok(value),
    }
}

fn finite(value: &Value, field: &str) -> Result<f64, GatewayError> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(field, "a number"))
}

fn invalid(field: &str, expected: &str) -> GatewayError {
    GatewayError::malformed(format!("field `{}` must be {}", field, expected))
}
