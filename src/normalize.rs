//! Turns validated form requests into the shape the prediction backend reads.
//!
//! Every field is listed with its transform so new fields can be added
//! without disturbing existing ones. Canonical records normalize to
//! themselves.

use chrono::Weekday;
use serde::Serialize;

use crate::form::labels::{PatientType, QueueDepartment, Ward};
use crate::form::{AppointmentRequest, ResourceRequest, WaitingTimeRequest};

pub trait Normalize {
    type Canonical: Serialize;

    fn normalize(&self) -> Self::Canonical;
}

/// Backend day number: Monday = 0 through Sunday = 6
pub fn canonical_day(day: Weekday) -> u8 {
    day.num_days_from_monday() as u8
}

// Appointment fields all pass through unchanged.
impl Normalize for AppointmentRequest {
    type Canonical = AppointmentRequest;

    fn normalize(&self) -> Self::Canonical {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalWaitingTime {
    pub hour: u8,
    pub day_of_week: u8,
    pub month: u8,
    pub queue_length: u8,
    pub service_time: f64,
    pub patient_type: PatientType,
    pub department: QueueDepartment,
}

impl Normalize for WaitingTimeRequest {
    type Canonical = CanonicalWaitingTime;

    fn normalize(&self) -> Self::Canonical {
        CanonicalWaitingTime {
            // hour 0-23: unchanged
            hour: self.hour,
            // dayOfWeek: form 1-7 (Monday = 1) becomes 0-6 (Monday = 0)
            day_of_week: canonical_day(self.day_of_week),
            // month 1-12: unchanged
            month: self.month,
            queue_length: self.queue_length,
            service_time: self.service_time,
            patient_type: self.patient_type,
            department: self.department,
        }
    }
}

impl Normalize for CanonicalWaitingTime {
    type Canonical = CanonicalWaitingTime;

    fn normalize(&self) -> Self::Canonical {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResources {
    pub date: String,
    pub department: Ward,
    pub outpatient_visits: u32,
    pub inpatient_admissions: u32,
    pub avg_length_of_stay: f64,
}

impl Normalize for ResourceRequest {
    type Canonical = CanonicalResources;

    fn normalize(&self) -> Self::Canonical {
        CanonicalResources {
            // date: rendered as YYYY-MM-DD, the backend derives weekday and month itself
            date: self.date.format("%Y-%m-%d").to_string(),
            department: self.department,
            outpatient_visits: self.outpatient_visits,
            inpatient_admissions: self.inpatient_admissions,
            avg_length_of_stay: self.avg_length_of_stay,
        }
    }
}

impl Normalize for CanonicalResources {
    type Canonical = CanonicalResources;

    fn normalize(&self) -> Self::Canonical {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Validate;
    use serde_json::json;
    use std::collections::HashSet;

    fn waiting_time(day: i64) -> WaitingTimeRequest {
        WaitingTimeRequest::validate(&json!({
            "hour": 9,
            "dayOfWeek": day,
            "month": 6,
            "queueLength": 3,
            "serviceTime": 15,
            "patientType": "Emergency",
            "department": "Pediatrics"
        }))
        .unwrap()
    }

    #[test]
    fn test_monday_and_sunday_reindex() {
        assert_eq!(waiting_time(1).normalize().day_of_week, 0);
        assert_eq!(waiting_time(7).normalize().day_of_week, 6);
    }

    #[test]
    fn test_day_reindex_is_a_bijection() {
        let days: HashSet<u8> = (1..=7).map(|day| waiting_time(day).normalize().day_of_week).collect();
        assert_eq!(days, (0..=6).collect::<HashSet<u8>>());
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_input() {
        for day in 1..=7 {
            let canonical = waiting_time(day).normalize();
            assert_eq!(canonical.normalize(), canonical);
        }

        let resources = ResourceRequest::validate(&json!({
            "date": "2024-12-01",
            "department": "Surgery",
            "outpatientVisits": 120,
            "inpatientAdmissions": 30,
            "avgLengthOfStay": 4.2
        }))
        .unwrap()
        .normalize();
        assert_eq!(resources.normalize(), resources);
    }

    #[test]
    fn test_waiting_time_wire_shape() {
        let body = serde_json::to_value(waiting_time(3).normalize()).unwrap();
        assert_eq!(
            body,
            json!({
                "hour": 9,
                "dayOfWeek": 2,
                "month": 6,
                "queueLength": 3,
                "serviceTime": 15.0,
                "patientType": "Emergency",
                "department": "Pediatrics"
            })
        );
    }

    #[test]
    fn test_appointment_passes_through() {
        let raw = json!({
            "age": 45,
            "gender": "M",
            "visitType": "New",
            "urgency": "Medium",
            "department": "Cardiology"
        });
        let request = AppointmentRequest::validate(&raw).unwrap();
        let canonical = request.normalize();
        assert_eq!(canonical, request);
        assert_eq!(serde_json::to_value(&canonical).unwrap(), raw);
    }

    #[test]
    fn test_resource_date_is_iso() {
        let canonical = ResourceRequest::validate(&json!({
            "date": "2025-03-07",
            "department": "Obstetrics",
            "outpatientVisits": "80",
            "inpatientAdmissions": 12,
            "avgLengthOfStay": "2.5"
        }))
        .unwrap()
        .normalize();
        assert_eq!(canonical.date, "2025-03-07");
        assert_eq!(
            serde_json::to_value(&canonical).unwrap(),
            json!({
                "date": "2025-03-07",
                "department": "Obstetrics",
                "outpatientVisits": 80,
                "inpatientAdmissions": 12,
                "avgLengthOfStay": 2.5
            })
        );
    }
}
