#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use ia_client::{ClientConfig, ConfigStore, InPostClient};
use url::Url;

/// `Bearer` JWT whose payload expires `ttl_secs` from now (negative for the past)
pub fn bearer_token(ttl_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"sub":"600100200","exp":{}}}"#,
        Utc::now().timestamp() + ttl_secs
    ));
    format!("Bearer {}.{}.{}", header, payload, ttl_secs.unsigned_abs())
}

/// Client pointed at a mock server
pub fn client_for(uri: &str, store: impl ConfigStore + 'static) -> InPostClient {
    let config = ClientConfig::with_base_url(Url::parse(uri).expect("valid mock server URI"));
    InPostClient::new(config, store).expect("failed to create client")
}

pub fn point_body() -> serde_json::Value {
    serde_json::json!({
        "name": "KRA01M",
        "airSensor": true,
        "airSensorData": {
            "airQuality": "MODERATE",
            "weather": { "temperature": -2.5, "pressure": 1030.4, "humidity": 64.6 },
            "pollutants": {
                "pm10": { "value": 41.3, "percent": 82.6 },
                "pm25": { "value": 30.9, "percent": 123.6 }
            },
            "updatedUntil": "2024-01-10T08:00:00Z"
        }
    })
}
