//! Blocking client for the InPost Mobile API
//!
//! The client keeps the session of one InPost account: a long-lived refresh
//! token obtained through the SMS login flow and a short-lived access token
//! minted from it. Access tokens are renewed transparently when they expire
//! locally or when the server rejects them.
//!
//! # Login Flow
//!
//! 1. `send_login_code` asks the API to text a code to the phone number
//! 2. `confirm_login_code` trades the code for a refresh/access token pair
//!
//! # Example
//!
//! ```no_run
//! use ia_client::{ClientConfig, FileConfigStore, InPostClient};
//!
//! fn main() -> ia_client::Result<()> {
//!     let store = FileConfigStore::new("inpost-air.config.json");
//!     let mut client = InPostClient::new(ClientConfig::default(), store)?;
//!
//!     if !client.is_logged_in() {
//!         client.send_login_code("600100200")?;
//!         client.confirm_login_code("600100200", "123456")?;
//!     }
//!
//!     let point = client.get_point("KRA01M")?;
//!     if point.air_sensor {
//!         println!("{}: {}", point.name, point.air_sensor_data.air_quality);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Session Storage
//!
//! The session is handed to a `ConfigStore` every time a token changes and
//! read back once when the client is created:
//!
//! ```
//! use ia_client::{ConfigStore, MemoryConfigStore, Session};
//!
//! let store = MemoryConfigStore::new();
//! let session = Session::new(None, Some("refresh".to_string()));
//! store.save(&session.to_bytes().unwrap()).unwrap();
//!
//! assert_eq!(Session::from_bytes(&store.load().unwrap()), session);
//! ```
//!
//! # Important Notes
//!
//! - Tokens are stored in plain text; keep the config file private
//! - Stored access tokens already carry the `Bearer ` prefix and are sent as is

pub mod client;
pub mod config;
pub mod errors;
pub mod file_store;
pub mod models;
pub mod session;
pub mod store;
pub mod token;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types
pub use client::InPostClient;
pub use config::{ClientConfig, HttpTimeouts};
pub use errors::{InPostError, Result};
pub use file_store::FileConfigStore;
pub use models::{AirSensorData, ApiError, Point, Pollutant, Pollutants, Weather};
pub use session::Session;
pub use store::{ConfigStore, FnConfigStore, MemoryConfigStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
