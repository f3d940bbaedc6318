use serde::Serialize;
use serde_json::Value;

use super::labels::{ClinicDepartment, Gender, Urgency, VisitType};
use super::submission::{Submission, Validate, ValidationError};

/// Appointment form as posted by the scheduling page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub age: u8,
    pub gender: Gender,
    pub visit_type: VisitType,
    pub urgency: Urgency,
    pub department: ClinicDepartment,
}

impl Validate for AppointmentRequest {
    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let mut form = Submission::new(raw)?;

        // Age has no default, the form must always send it
        let age = form.integer("age", 1..=120);
        let gender = form.choice::<Gender>("gender");
        let visit_type = form.choice::<VisitType>("visitType");
        let urgency = form.choice::<Urgency>("urgency");
        let department = form.choice::<ClinicDepartment>("department");

        let (Some(age), Some(gender), Some(visit_type), Some(urgency), Some(department)) =
            (age, gender, visit_type, urgency, department)
        else {
            return Err(form.into_error());
        };

        Ok(Self {
            age: age as u8,
            gender,
            visit_type,
            urgency,
            department,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Constraint;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "age": 45,
            "gender": "M",
            "visitType": "New",
            "urgency": "Medium",
            "department": "Cardiology"
        })
    }

    #[test]
    fn test_accepts_valid_form() {
        let request = AppointmentRequest::validate(&sample()).unwrap();
        assert_eq!(
            request,
            AppointmentRequest {
                age: 45,
                gender: Gender::Male,
                visit_type: VisitType::New,
                urgency: Urgency::Medium,
                department: ClinicDepartment::Cardiology,
            }
        );
    }

    #[test]
    fn test_accepts_every_age_and_label() {
        for age in [1, 60, 120] {
            for (gender, visit) in [("M", "New"), ("F", "Follow-up")] {
                for urgency in ["Low", "Medium", "High"] {
                    for department in ["Cardiology", "Orthopedics", "Neurology", "General"] {
                        let raw = json!({
                            "age": age,
                            "gender": gender,
                            "visitType": visit,
                            "urgency": urgency,
                            "department": department
                        });
                        assert!(AppointmentRequest::validate(&raw).is_ok(), "{}", raw);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rejects_out_of_domain_fields_by_name() {
        for (field, value, constraint) in [
            ("age", json!(0), Constraint::Range),
            ("age", json!(121), Constraint::Range),
            ("gender", json!("X"), Constraint::OneOf),
            ("visitType", json!("Walk-in"), Constraint::OneOf),
            ("urgency", json!(3), Constraint::Type),
            ("department", json!("Pediatrics"), Constraint::OneOf),
        ] {
            let mut raw = sample();
            raw[field] = value;
            let err = AppointmentRequest::validate(&raw).unwrap_err();
            assert_eq!(err.violations.len(), 1);
            assert_eq!(err.constraint_for(field), Some(constraint), "{}", field);
        }
    }

    #[test]
    fn test_age_is_required() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("age");
        let err = AppointmentRequest::validate(&raw).unwrap_err();
        assert_eq!(err.constraint_for("age"), Some(Constraint::Required));
    }

    #[test]
    fn test_coerces_edited_form_values() {
        let raw = json!({
            "age": "72",
            "gender": "f",
            "visitType": "follow-up",
            "urgency": "HIGH",
            "department": " general "
        });
        let request = AppointmentRequest::validate(&raw).unwrap();
        assert_eq!(request.age, 72);
        assert_eq!(request.gender, Gender::Female);
        assert_eq!(request.visit_type, VisitType::FollowUp);
        assert_eq!(request.department, ClinicDepartment::General);
    }

    #[test]
    fn test_reports_all_violations() {
        let err = AppointmentRequest::validate(&json!({ "age": 500, "gender": "M" })).unwrap_err();
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["age", "visitType", "urgency", "department"]);
    }
}
