//! Prediction gateway: validates booking and planning forms, reshapes them
//! for the prediction backend, forwards them and checks what comes back.

pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod mapper;
pub mod normalize;
pub mod pipeline;
pub mod web;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use pipeline::PredictionGateway;
