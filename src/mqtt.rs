// mqtt.rs

#[cfg(target_os = "espidf")]
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::FreeRtos;
#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
#[cfg(target_os = "espidf")]
use log::*;

#[cfg(target_os = "espidf")]
use crate::MyConfig;

pub const COUNTDOWN_FROM: u32 = 5;
pub const SLEEP_SENTINEL: &str = "zzzzzzzzz";

const COUNTDOWN_STEP_MS: u32 = 1000;

/// Countdown payload texts, highest first, terminated by the sleep sentinel.
pub fn countdown_payloads(from: u32) -> Vec<String> {
    let mut payloads: Vec<String> = (1..=from).rev().map(|n| n.to_string()).collect();
    payloads.push(SLEEP_SENTINEL.into());
    payloads
}

/// Bring up a client against the configured broker and wait for the
/// connected event, `mqtt_tries` polls `mqtt_retry_delay_ms` apart.
#[cfg(target_os = "espidf")]
pub fn connect_broker(config: &MyConfig, client_id: &str) -> Option<EspMqttClient<'static>> {
    info!("MQTT connecting to {url}...", url = config.mqtt_url);

    let connected = Arc::new(AtomicBool::new(false));
    let flag = connected.clone();

    let client = match EspMqttClient::new_cb(
        &config.mqtt_url,
        &MqttClientConfiguration {
            client_id: Some(client_id),
            keep_alive_interval: Some(Duration::from_secs(25)),
            ..Default::default()
        },
        move |event| match event.payload() {
            EventPayload::Connected(_) => {
                info!("MQTT connected.");
                flag.store(true, Ordering::Relaxed);
            }
            EventPayload::Error(e) => error!("MQTT error: {e:?}"),
            other => debug!("MQTT event: {other:?}"),
        },
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("MQTT client error: [{e}]");
            return None;
        }
    };

    // association happens in the background, poll the connected flag
    for i in 0..config.mqtt_tries {
        if connected.load(Ordering::Relaxed) {
            return Some(client);
        }
        debug!("waiting to connect: ({i})");
        FreeRtos::delay_ms(config.mqtt_retry_delay_ms);
    }
    if connected.load(Ordering::Relaxed) {
        return Some(client);
    }

    error!("failed to connect to broker: giving up!");
    None
}

#[cfg(target_os = "espidf")]
pub fn publish_temperature(client: &mut EspMqttClient<'_>, topic: &str, avg: f32) {
    info!("MQTT sending {topic}");
    if let Err(e) = client.publish(topic, QoS::AtLeastOnce, false, format!("{avg}").as_bytes()) {
        error!("MQTT send error: {e}");
    }
}

#[cfg(target_os = "espidf")]
pub fn publish_countdown(client: &mut EspMqttClient<'_>, topic: &str) {
    for (i, payload) in countdown_payloads(COUNTDOWN_FROM).iter().enumerate() {
        if i > 0 {
            FreeRtos::delay_ms(COUNTDOWN_STEP_MS);
        }
        info!("MQTT sending {topic} [{payload}]");
        if let Err(e) = client.publish(topic, QoS::AtLeastOnce, false, payload.as_bytes()) {
            error!("MQTT send error: {e}");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_is_five_to_one_then_sentinel() {
        assert_eq!(
            countdown_payloads(5),
            vec!["5", "4", "3", "2", "1", "zzzzzzzzz"]
        );
    }

    #[test]
    fn empty_countdown_is_just_the_sentinel() {
        assert_eq!(countdown_payloads(0), vec![SLEEP_SENTINEL]);
    }
}

// EOF
