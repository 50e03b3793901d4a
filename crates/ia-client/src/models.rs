use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::TOKEN_EXPIRED_ERROR;

/// Error body returned by the API on non-success responses
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiError {
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
    /// Machine readable tag, e.g. `tokenExpiredException`
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

impl ApiError {
    /// Parse an error body. Bodies that aren't the expected JSON yield an
    /// empty error so the caller still has the HTTP status to report.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn is_token_expired(&self) -> bool {
        self.error == TOKEN_EXPIRED_ERROR
    }
}

/// `/v1/authenticate` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest<'a> {
    pub refresh_token: &'a str,
    #[serde(rename = "phoneOS")]
    pub phone_os: &'a str,
}

/// `/v1/authenticate` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// `/v1/sendSMSCode` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsCodeRequest<'a> {
    pub phone_number: &'a str,
}

/// `/v1/confirmSMSCode` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSmsCodeRequest<'a> {
    pub phone_number: &'a str,
    pub sms_code: &'a str,
    #[serde(rename = "phoneOS")]
    pub phone_os: &'a str,
}

/// `/v1/confirmSMSCode` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSmsCodeResponse {
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Parcel locker point with optional air sensor readings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Point code, e.g. `KRA01M`
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub air_sensor: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub air_sensor_data: AirSensorData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AirSensorData {
    /// Category such as `VERY_GOOD`
    #[serde(default, deserialize_with = "null_as_default")]
    pub air_quality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Weather,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pollutants: Pollutants,
    /// Readings are valid until this instant
    #[serde(default)]
    pub updated_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Weather {
    /// °C
    #[serde(deserialize_with = "null_as_default")]
    pub temperature: f64,
    /// hPa
    #[serde(deserialize_with = "null_as_default")]
    pub pressure: f64,
    /// %
    #[serde(deserialize_with = "null_as_default")]
    pub humidity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Pollutants {
    #[serde(deserialize_with = "null_as_default")]
    pub pm10: Pollutant,
    #[serde(deserialize_with = "null_as_default")]
    pub pm25: Pollutant,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Pollutant {
    /// μg/m³
    #[serde(deserialize_with = "null_as_default")]
    pub value: f64,
    /// Relative to the norm
    #[serde(deserialize_with = "null_as_default")]
    pub percent: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
