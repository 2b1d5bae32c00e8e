// wifi.rs

use std::time::Duration;
#[cfg(target_os = "espidf")]
use std::time::Instant;

#[cfg(target_os = "espidf")]
use embedded_svc::wifi::{ClientConfiguration, Configuration};
#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    delay::FreeRtos,
    gpio::{AnyOutputPin, Output, PinDriver},
    modem::Modem,
    peripheral::Peripheral,
};
#[cfg(target_os = "espidf")]
use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs::EspDefaultNvsPartition, wifi::EspWifi};
#[cfg(target_os = "espidf")]
use log::*;

use crate::*;

const JOIN_FLASH_MS: u32 = 100;

/// Bounded association poll. Returns true as soon as `is_up` reports
/// connected, false once `elapsed` exceeds `timeout`; `on_wait` runs once
/// per unsuccessful poll.
pub fn join_within(
    timeout: Duration,
    mut elapsed: impl FnMut() -> Duration,
    mut is_up: impl FnMut() -> anyhow::Result<bool>,
    mut on_wait: impl FnMut() -> anyhow::Result<()>,
) -> anyhow::Result<bool> {
    loop {
        if is_up()? {
            return Ok(true);
        }
        if elapsed() > timeout {
            return Ok(false);
        }
        on_wait()?;
    }
}

#[cfg(target_os = "espidf")]
pub fn connect_station<'d>(
    modem: impl Peripheral<P = Modem> + 'd,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
    config: &MyConfig,
    led: &mut PinDriver<'_, AnyOutputPin, Output>,
) -> anyhow::Result<Option<EspWifi<'d>>> {
    info!("WiFi setting credentials...");
    let mut wifi = EspWifi::new(modem, sysloop, Some(nvs))?;

    // client configuration keeps the soft-AP side down
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: config.wifi_ssid.as_str().try_into().unwrap(),
        password: config.wifi_pass.as_str().try_into().unwrap(),
        ..Default::default()
    }))?;

    info!("WiFi driver starting...");
    wifi.start()?;
    wifi.connect()?;

    info!("WiFi waiting for association...");
    let start = Instant::now();
    let up = join_within(
        Duration::from_millis(config.ap_timeout_ms),
        || start.elapsed(),
        || Ok(wifi.is_up()?),
        || {
            flash(led, 2, JOIN_FLASH_MS, &mut FreeRtos)?;
            Ok(())
        },
    )?;

    if !up {
        error!("failed to connect to AP: giving up!");
        return Ok(None);
    }

    let ip_info = wifi.sta_netif().get_ip_info()?;
    info!("connection info: [{ip_info:?}]");
    Ok(Some(wifi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn gives_up_once_timeout_elapses() {
        let clock = Cell::new(Duration::ZERO);
        let waits = Cell::new(0u32);
        let up = join_within(
            Duration::from_millis(30_000),
            || clock.get(),
            || Ok(false),
            || {
                waits.set(waits.get() + 1);
                clock.set(clock.get() + Duration::from_millis(400));
                Ok(())
            },
        )
        .unwrap();
        assert!(!up);
        // 30 s of 400 ms polls, plus the one that crosses the deadline
        assert_eq!(waits.get(), 76);
    }

    #[test]
    fn immediate_success_skips_waiting() {
        let waits = Cell::new(0u32);
        let up = join_within(
            Duration::from_millis(1),
            || Duration::ZERO,
            || Ok(true),
            || {
                waits.set(waits.get() + 1);
                Ok(())
            },
        )
        .unwrap();
        assert!(up);
        assert_eq!(waits.get(), 0);
    }

    #[test]
    fn association_mid_poll_is_reported() {
        let polls = Cell::new(0u32);
        let up = join_within(
            Duration::from_millis(30_000),
            || Duration::ZERO,
            || {
                polls.set(polls.get() + 1);
                Ok(polls.get() > 3)
            },
            || Ok(()),
        )
        .unwrap();
        assert!(up);
        assert_eq!(polls.get(), 4);
    }

    #[test]
    fn poll_errors_surface() {
        let res = join_within(
            Duration::from_millis(100),
            || Duration::ZERO,
            || Err(anyhow::anyhow!("radio gone")),
            || Ok(()),
        );
        assert!(res.is_err());
    }
}

// EOF
