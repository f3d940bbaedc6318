pub mod labels;
pub mod submission;
pub mod appointment;
pub mod waiting_time;
pub mod resources;

pub use submission::{parse_body, Constraint, FieldViolation, Validate, ValidationError};
pub use appointment::AppointmentRequest;
pub use waiting_time::WaitingTimeRequest;
pub use resources::ResourceRequest;
