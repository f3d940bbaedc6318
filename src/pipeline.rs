use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{Dispatcher, Endpoint};
use crate::error::GatewayError;
use crate::form::{AppointmentRequest, ResourceRequest, Validate, WaitingTimeRequest};
use crate::mapper::{self, AppointmentResult, ResourceResult, WaitingTimeResult};
use crate::normalize::Normalize;

/// One prediction the UI can ask for: what it accepts, where it goes and
/// what comes back
pub trait Prediction: 'static {
    const ENDPOINT: Endpoint;

    type Request: Validate + Normalize;
    type Output: Serialize;

    fn map(body: &[u8]) -> Result<Self::Output, GatewayError>;
}

pub struct ScheduleAppointment;

impl Prediction for ScheduleAppointment {
    const ENDPOINT: Endpoint = Endpoint::ScheduleAppointment;

    type Request = AppointmentRequest;
    type Output = AppointmentResult;

    fn map(body: &[u8]) -> Result<Self::Output, GatewayError> {
        mapper::appointment_result(body)
    }
}

pub struct PredictWaitingTime;

impl Prediction for PredictWaitingTime {
    const ENDPOINT: Endpoint = Endpoint::PredictWaitingTime;

    type Request = WaitingTimeRequest;
    type Output = WaitingTimeResult;

    fn map(body: &[u8]) -> Result<Self::Output, GatewayError> {
        mapper::waiting_time_result(body)
    }
}

pub struct PredictResources;

impl Prediction for PredictResources {
    const ENDPOINT: Endpoint = Endpoint::PredictResources;

    type Request = ResourceRequest;
    type Output = ResourceResult;

    fn map(body: &[u8]) -> Result<Self::Output, GatewayError> {
        mapper::resource_result(body)
    }
}

/// Validate, normalize, dispatch, map. The first failing stage ends the request.
pub struct PredictionGateway {
    dispatcher: Dispatcher,
}

impl PredictionGateway {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn backend_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    pub async fn run<P: Prediction>(&self, raw: &Value) -> Result<P::Output, GatewayError> {
        let request = P::Request::validate(raw)?;
        let canonical = request.normalize();
        debug!("[gateway] {} request validated", P::ENDPOINT);

        let body = self.dispatcher.dispatch(P::ENDPOINT, &canonical).await?;
        P::map(&body)
    }
}
