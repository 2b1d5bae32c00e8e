// bin/esp32spray.rs

#[cfg(target_os = "espidf")]
use esp32spray::*;
#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::FreeRtos;
#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{self, IOPin, OutputPin, PinDriver, Pull};
#[cfg(target_os = "espidf")]
use esp_idf_hal::prelude::Peripherals;
#[cfg(target_os = "espidf")]
use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs};
#[cfg(target_os = "espidf")]
use log::*;
#[cfg(target_os = "espidf")]
use one_wire_bus::OneWire;

#[cfg(target_os = "espidf")]
esp_idf_sys::esp_app_desc!();

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("Hello.");
    info!("esp32spray {FW_VERSION} starting up.");

    let sysloop = EspSystemEventLoop::take()?;
    let nvs_default_partition = nvs::EspDefaultNvsPartition::take()?;

    let ns = env!("CARGO_BIN_NAME");
    let mut nvs = match nvs::EspNvs::new(nvs_default_partition.clone(), ns, true) {
        Ok(nvs) => {
            info!("Got namespace {ns:?} from default partition");
            nvs
        }
        Err(e) => panic!("Could not get namespace {ns}: {e:?}"),
    };

    #[cfg(feature = "reset_settings")]
    let config = {
        let c = MyConfig::default();
        c.to_nvs(&mut nvs)?;
        c
    };

    #[cfg(not(feature = "reset_settings"))]
    let config = match MyConfig::from_nvs(&mut nvs) {
        None => {
            error!("Could not read nvs config, using defaults");
            let c = MyConfig::default();
            c.to_nvs(&mut nvs)?;
            info!("Successfully saved default config to nvs.");
            c
        }

        // using settings saved on nvs if we could find them
        Some(c) => c,
    };
    info!("My config:\n{config:#?}");

    let peripherals = Peripherals::take().unwrap();
    let pins = peripherals.pins;

    let mut led = PinDriver::output(pins.gpio2.downgrade_output())?;
    let mut valve = PinDriver::output(pins.gpio14.downgrade_output())?;
    valve.set_low()?;

    let cause = wake_cause();
    // flash 2x if by deep sleep, 4x if hard reset
    flash(&mut led, blink_count(cause), STARTUP_FLASH_MS, &mut FreeRtos)?;

    spray(&mut valve, config.spray_ms, &mut FreeRtos)?;

    let myid = device_id(&read_mac());
    info!("Device id: {myid}");

    let wifi = connect_station(
        peripherals.modem,
        sysloop,
        nvs_default_partition,
        &config,
        &mut led,
    )?;
    let client = connect_broker(&config, &client_id(&myid));

    if let (Some(_wifi), Some(mut client)) = (wifi, client) {
        let mut onew_pin = pins.gpio12.downgrade();
        let mut pin_drv = gpio::PinDriver::input_output_od(&mut onew_pin)?;
        pin_drv.set_pull(Pull::Up)?;
        let mut w = OneWire::new(pin_drv).unwrap();

        let avg = match sample_mean(&mut w, SAMPLE_ROUNDS) {
            Ok(avg) => avg,
            Err(MeasurementError::NoDeviceFound) => {
                info!("No one wire devices found");
                0.0
            }
            Err(e) => {
                error!("Measurement error: {e:?}");
                0.0
            }
        };
        info!("Mean temperature: {avg}");

        publish_temperature(&mut client, &topic_temp(&myid), avg);
        publish_countdown(&mut client, &topic_count(&myid));

        // dropping the client disconnects from the broker
        drop(client);
    } else {
        // avoid over-spraying if network is down
        warn!("Network is down, skipping measurements");
        FreeRtos::delay_ms(config.ap_timeout_ms as u32);
    }

    goodnight(&config)
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("esp32spray only runs on the espidf target");
}

// EOF
