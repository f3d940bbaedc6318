use chrono::Weekday;
use serde_json::Value;

use super::labels::{PatientType, QueueDepartment};
use super::submission::{Submission, Validate, ValidationError};

// The day picker numbers the week from Monday = 1 to Sunday = 7
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Waiting time form as posted by the UI, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct WaitingTimeRequest {
    pub hour: u8,
    pub day_of_week: Weekday,
    pub month: u8,
    pub queue_length: u8,
    /// Average minutes spent with the doctor
    pub service_time: f64,
    pub patient_type: PatientType,
    pub department: QueueDepartment,
}

/// Maps the form's 1-7 day number to a weekday
pub fn weekday_from_form(day: i64) -> Option<Weekday> {
    let index = usize::try_from(day.checked_sub(1)?).ok()?;
    WEEK.get(index).copied()
}

impl Validate for WaitingTimeRequest {
    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let mut form = Submission::new(raw)?;

        let hour = form.integer("hour", 0..=23);
        let day_of_week = form.integer("dayOfWeek", 1..=7).and_then(weekday_from_form);
        let month = form.integer("month", 1..=12);
        let queue_length = form.integer("queueLength", 0..=25);
        let service_time = form.number("serviceTime", 1.0..=35.0);
        let patient_type = form.choice::<PatientType>("patientType");
        let department = form.choice::<QueueDepartment>("department");

        let (
            Some(hour),
            Some(day_of_week),
            Some(month),
            Some(queue_length),
            Some(service_time),
            Some(patient_type),
            Some(department),
        ) = (hour, day_of_week, month, queue_length, service_time, patient_type, department)
        else {
            return Err(form.into_error());
        };

        Ok(Self {
            hour: hour as u8,
            day_of_week,
            month: month as u8,
            queue_length: queue_length as u8,
            service_time,
            patient_type,
            department,
        })
    }
}
