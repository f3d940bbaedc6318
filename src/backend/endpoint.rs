use std::fmt;

/// Backend routes the gateway forwards to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ScheduleAppointment,
    PredictWaitingTime,
    PredictResources,
}

impl Endpoint {
    pub fn id(&self) -> &'static str {
        match self {
            Endpoint::ScheduleAppointment => "schedule-appointment",
            Endpoint::PredictWaitingTime => "predict-waiting-time",
            Endpoint::PredictResources => "predict-resources",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ScheduleAppointment => "/api/scheduleappointment",
            Endpoint::PredictWaitingTime => "/api/predictwaitingtime",
            Endpoint::PredictResources => "/api/predictresources",
        }
    }

    /// Read-style predictions can be sent twice; booking an appointment cannot
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Endpoint::ScheduleAppointment)
    }

    pub fn max_attempts(&self) -> u32 {
        if self.is_idempotent() {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Coarse kind of a transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// No connection could be made, nothing reached the backend
    Connect,
    Timeout,
    Other,
}

impl Failure {
    pub fn classify(err: &reqwest::Error) -> Self {
        // A connect timeout reports both; it counts against the time bound
        if err.is_timeout() {
            Failure::Timeout
        } else if err.is_connect() {
            Failure::Connect
        } else {
            Failure::Other
        }
    }
}

/// Whether a failed `attempt` (1-based) may be sent again
pub fn should_retry(endpoint: Endpoint, attempt: u32, failure: Failure) -> bool {
    failure == Failure::Connect && attempt < endpoint.max_attempts()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::ScheduleAppointment.path(), "/api/scheduleappointment");
        assert_eq!(Endpoint::PredictWaitingTime.path(), "/api/predictwaitingtime");
        assert_eq!(Endpoint::PredictResources.path(), "/api/predictresources");
        assert_eq!(Endpoint::PredictResources.to_string(), "predict-resources");
    }

    #[test]
    fn test_scheduling_is_never_retried() {
        for failure in [Failure::Connect, Failure::Timeout, Failure::Other] {
            assert!(!should_retry(Endpoint::ScheduleAppointment, 1, failure));
        }
    }

    #[test]
    fn test_predictions_retry_once_on_connect_failure() {
        for endpoint in [Endpoint::PredictWaitingTime, Endpoint::PredictResources] {
            assert!(should_retry(endpoint, 1, Failure::Connect));
            assert!(!should_retry(endpoint, 2, Failure::Connect));
            assert!(!should_retry(endpoint, 1, Failure::Timeout));
            assert!(!should_retry(endpoint, 1, Failure::Other));
        }
    }
}
