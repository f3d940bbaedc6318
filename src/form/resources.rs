use chrono::NaiveDate;
use serde_json::Value;

use super::labels::Ward;
use super::submission::{Submission, Validate, ValidationError};

/// Resource planning form for one ward on one day
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub date: NaiveDate,
    pub department: Ward,
    pub outpatient_visits: u32,
    pub inpatient_admissions: u32,
    /// Days
    pub avg_length_of_stay: f64,
}

impl Validate for ResourceRequest {
    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let mut form = Submission::new(raw)?;

        let date = form.date("date");
        let department = form.choice::<Ward>("department");
        let outpatient_visits = form.count("outpatientVisits");
        let inpatient_admissions = form.count("inpatientAdmissions");
        let avg_length_of_stay = form.positive("avgLengthOfStay");

        let (
            Some(date),
            Some(department),
            Some(outpatient_visits),
            Some(inpatient_admissions),
            Some(avg_length_of_stay),
        ) = (date, department, outpatient_visits, inpatient_admissions, avg_length_of_stay)
        else {
            return Err(form.into_error());
        };

        Ok(Self {
            date,
            department,
            outpatient_visits,
            inpatient_admissions,
            avg_length_of_stay,
        })
    }
}
