// config.rs

#[cfg(target_os = "espidf")]
use anyhow::bail;
#[cfg(target_os = "espidf")]
use crc::{Crc, CRC_32_ISCSI};
#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs;
#[cfg(target_os = "espidf")]
use log::*;
use serde::{Deserialize, Serialize};


pub const NVS_BUF_SIZE: usize = 256;

const DEFAULT_SPRAY_MS: u32 = 10_000;
const DEFAULT_SLEEP_MS: u64 = 60_000;
const DEFAULT_AP_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MQTT_TRIES: u32 = 3;
const DEFAULT_MQTT_RETRY_DELAY_MS: u32 = 3_000;

const CONFIG_NAME: &str = "cfg";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MyConfig {
    pub wifi_ssid: String,
    pub wifi_pass: String,

    pub mqtt_url: String,
    pub mqtt_tries: u32,
    pub mqtt_retry_delay_ms: u32,

    pub spray_ms: u32,
    pub sleep_ms: u64,
    pub ap_timeout_ms: u64,

    // debug builds restart instead of deep sleeping
    pub debug: bool,
}

impl Default for MyConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: option_env!("WIFI_SSID").unwrap_or("internet").into(),
            wifi_pass: option_env!("WIFI_PASS").unwrap_or("password").into(),

            mqtt_url: option_env!("MQTT_URL")
                .unwrap_or("mqtt://192.168.0.100:4444")
                .into(),
            mqtt_tries: DEFAULT_MQTT_TRIES,
            mqtt_retry_delay_ms: DEFAULT_MQTT_RETRY_DELAY_MS,

            spray_ms: DEFAULT_SPRAY_MS,
            sleep_ms: DEFAULT_SLEEP_MS,
            ap_timeout_ms: DEFAULT_AP_TIMEOUT_MS,

            debug: false,
        }
    }
}

#[cfg(target_os = "espidf")]
impl MyConfig {
    pub fn from_nvs(nvs: &mut nvs::EspNvs<nvs::NvsDefault>) -> Option<Self> {
        let mut nvsbuf = [0u8; NVS_BUF_SIZE];
        info!("Reading up to {sz} bytes from nvs...", sz = NVS_BUF_SIZE);
        let b = match nvs.get_raw(CONFIG_NAME, &mut nvsbuf) {
            Err(e) => {
                error!("Nvs read error {e:?}");
                return None;
            }
            Ok(Some(b)) => b,
            _ => {
                error!("Nvs key not found");
                return None;
            }
        };
        info!("Got {sz} bytes from nvs. Parsing config...", sz = b.len());

        let crc = Crc::<u32>::new(&CRC_32_ISCSI);
        let digest = crc.digest();
        match postcard::from_bytes_crc32::<MyConfig>(b, digest) {
            Ok(c) => {
                info!("Successfully parsed config from nvs.");
                Some(c)
            }
            Err(e) => {
                error!("Cannot parse config from nvs: {e:?}");
                None
            }
        }
    }

    pub fn to_nvs(&self, nvs: &mut nvs::EspNvs<nvs::NvsDefault>) -> anyhow::Result<()> {
        let mut nvsbuf = [0u8; NVS_BUF_SIZE];
        let crc = Crc::<u32>::new(&CRC_32_ISCSI);
        let digest = crc.digest();
        let nvsdata = match postcard::to_slice_crc32(self, &mut nvsbuf, digest) {
            Ok(d) => d,
            Err(e) => {
                let estr = format!("Cannot encode config to buffer {e:?}");
                bail!("{estr}");
            }
        };
        info!(
            "Encoded config to {sz} bytes. Saving to nvs...",
            sz = nvsdata.len()
        );

        match nvs.set_raw(CONFIG_NAME, nvsdata) {
            Ok(_) => {
                info!("Config saved.");
                Ok(())
            }
            Err(e) => {
                let estr = format!("Cannot save to nvs: {e:?}");
                bail!("{estr}");
            }
        }
    }
}

// EOF
