use crate::error::ApiError;
use log::debug;
use reqwest::blocking::Client;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub static DEFAULT_BASE_URL: &str = "https://globalapi.solarmanpv.com";

static REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceType {
    Inverter,
    Collector,
}

impl DeviceType {
    /// Enum value the device list endpoint filters on.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Inverter => "INVERTER",
            DeviceType::Collector => "COLLECTOR",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    app_secret: &'a str,
    email: &'a str,
    password: &'a str,
}

// The upstream API does not populate the `code` field reliably, so a present
// and non-empty `access_token` is the only success signal we look at.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Serialize)]
struct StationListRequest {
    page: u32,
    size: u32,
}

#[derive(Deserialize)]
struct StationListResponse {
    #[serde(rename = "stationList", default)]
    station_list: Vec<Station>,
}

#[derive(Deserialize)]
struct Station {
    id: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceListRequest<'a> {
    page: u32,
    size: u32,
    station_id: u64,
    device_type: &'a str,
}

#[derive(Deserialize)]
struct DeviceListResponse {
    #[serde(rename = "deviceListItems", default)]
    device_list_items: Vec<Device>,
}

#[derive(Deserialize)]
struct Device {
    #[serde(rename = "deviceSn")]
    device_sn: String,
}

/// Blocking client for the three SolarmanPV endpoints the setup flow needs.
/// The base URL is injected so tests can point it at a mock server.
pub struct SolarmanApi {
    base_url: String,
    client: Client,
}

impl SolarmanApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Base host without the scheme, as stored in the generated config.
    pub fn host(&self) -> &str {
        self.base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
    }

    /// Exchanges the app and account credentials for a bearer token.
    pub fn obtain_token(
        &self,
        appid: &str,
        secret: &str,
        username: &str,
        passhash: &str,
    ) -> Result<String, ApiError> {
        let url = format!("{}/account/v1.0/token?appId={appid}&language=en", self.base_url);
        let request = TokenRequest {
            app_secret: secret,
            email: username,
            password: passhash,
        };
        let body = self
            .client
            .post(&url)
            .json(&request)
            .send()?
            .error_for_status()?
            .text()?;
        debug!("token response: {body}");

        let parsed = serde_json::from_str::<TokenResponse>(&body).ok();
        match parsed.and_then(|r| r.access_token) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::Authentication { body }),
        }
    }

    /// Id of the first station the account can see.
    pub fn station_id(&self, token: &str) -> Result<u64, ApiError> {
        let url = format!("{}/station/v1.0/list?language=en", self.base_url);
        let response: StationListResponse = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&StationListRequest { page: 1, size: 20 })
            .send()?
            .error_for_status()?
            .json()?;

        response
            .station_list
            .first()
            .map(|station| station.id)
            .ok_or(ApiError::NoStations)
    }

    /// Serial of the station's first device of the given type.
    pub fn device_serial(
        &self,
        token: &str,
        station_id: u64,
        device_type: DeviceType,
    ) -> Result<String, ApiError> {
        let url = format!("{}/station/v1.0/device?language=en", self.base_url);
        let request = DeviceListRequest {
            page: 1,
            size: 10,
            station_id,
            device_type: device_type.as_str(),
        };
        let response: DeviceListResponse = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .device_list_items
            .into_iter()
            .next()
            .map(|device| device.device_sn)
            .ok_or(ApiError::NoDevices { device_type })
    }
}
