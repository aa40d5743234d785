use crate::api::DeviceType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("authentication failed, response was: {body}")]
    Authentication { body: String },
    #[error("no stations found")]
    NoStations,
    #[error("no {device_type} devices found")]
    NoDevices { device_type: DeviceType },
}
