// lib.rs

pub use anyhow::bail;
pub use serde::{Deserialize, Serialize};

#[cfg(target_os = "espidf")]
#[allow(ambiguous_glob_reexports)]
pub use esp_idf_hal::{
    delay::{Ets, FreeRtos},
    gpio::{self, *},
    prelude::*,
};

mod config;
pub use config::*;

mod ident;
pub use ident::*;

mod led;
pub use led::*;

mod measure;
pub use measure::*;

mod mqtt;
pub use mqtt::*;

mod sprayer;
pub use sprayer::*;

mod wake;
pub use wake::*;

mod wifi;
pub use wifi::*;

pub const FW_VERSION: &str = env!("CARGO_PKG_VERSION");

// report tag namespacing the MQTT topics and client id
pub const REPORT_VERSION: &str = "ALPHA";

// EOF
