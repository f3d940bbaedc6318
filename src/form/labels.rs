use serde::Serialize;

/// A closed set of form choices, each with the exact label the backend expects
pub trait Label: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Matches a posted value against the labels, ignoring surrounding
    /// whitespace and ASCII case
    fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.as_str().eq_ignore_ascii_case(value))
    }

    /// Comma-separated list of accepted labels, for error messages
    fn choices() -> String {
        Self::ALL
            .iter()
            .map(|choice| choice.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

macro_rules! labels {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Label for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }
    };
}

labels! {
    Gender { Male => "M", Female => "F" }
}

labels! {
    VisitType { New => "New", FollowUp => "Follow-up" }
}

labels! {
    Urgency { Low => "Low", Medium => "Medium", High => "High" }
}

labels! {
    /// Departments offered on the appointment form
    ClinicDepartment {
        Cardiology => "Cardiology",
        Orthopedics => "Orthopedics",
        Neurology => "Neurology",
        General => "General",
    }
}

labels! {
    PatientType { Routine => "Routine", Emergency => "Emergency", FollowUp => "Follow-up" }
}

labels! {
    /// Departments tracked by the waiting time model
    QueueDepartment {
        General => "General",
        Cardiology => "Cardiology",
        Orthopedics => "Orthopedics",
        Pediatrics => "Pediatrics",
        ObGyn => "OB-GYN",
    }
}

labels! {
    /// Hospital wards used for resource planning
    Ward {
        Emergency => "Emergency",
        Surgery => "Surgery",
        InternalMedicine => "Internal Medicine",
        Pediatrics => "Pediatrics",
        Obstetrics => "Obstetrics",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_loosely() {
        assert_eq!(Ward::from_label(" internal medicine "), Some(Ward::InternalMedicine));
        assert_eq!(QueueDepartment::from_label("ob-gyn"), Some(QueueDepartment::ObGyn));
        assert_eq!(Gender::from_label("X"), None);
        assert_eq!(VisitType::from_label("Followup"), None);
    }

    #[test]
    fn test_labels_serialize_as_backend_spelling() {
        assert_eq!(serde_json::to_value(PatientType::FollowUp).unwrap(), "Follow-up");
        assert_eq!(serde_json::to_value(Gender::Male).unwrap(), "M");
        assert_eq!(Urgency::choices(), "Low, Medium, High");
    }
}
