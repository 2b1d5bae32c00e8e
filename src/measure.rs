// measure.rs

#[cfg(target_os = "espidf")]
use embedded_hal::digital::{InputPin, OutputPin};
#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::{Ets, FreeRtos};
#[cfg(target_os = "espidf")]
use log::*;
#[cfg(target_os = "espidf")]
use one_wire_bus::{Address, OneWire, OneWireError, SearchState};

pub const SAMPLE_ROUNDS: u32 = 10;

/// Arithmetic mean of the collected readings; an empty set reads as zero.
pub fn mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f32>() / samples.len() as f32
    }
}

/// Scan the bus once, then run `rounds` simultaneous conversions reading
/// every discovered probe, and collapse everything to one mean.
#[cfg(target_os = "espidf")]
pub fn sample_mean<P, E>(
    one_wire_bus: &mut OneWire<P>,
    rounds: u32,
) -> Result<f32, MeasurementError<E>>
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
{
    let devices = scan_devices(one_wire_bus)?;
    if devices.is_empty() {
        return Err(MeasurementError::NoDeviceFound);
    }
    debug!("one wire devices found: {devices:?}");

    let mut temps = Vec::with_capacity(devices.len() * rounds as usize);
    for _ in 0..rounds {
        ds18b20::start_simultaneous_temp_measurement(one_wire_bus, &mut Ets)?;
        ds18b20::Resolution::Bits12.delay_for_measurement_time(&mut FreeRtos);

        for addr in &devices {
            let sensor = ds18b20::Ds18b20::new::<E>(*addr)?;
            let sensor_data = sensor.read_data(one_wire_bus, &mut Ets)?;
            debug!("temperature: [{t}]", t = sensor_data.temperature);
            temps.push(sensor_data.temperature);
        }
    }

    Ok(mean(&temps))
}

#[cfg(target_os = "espidf")]
fn scan_devices<P, E>(one_wire_bus: &mut OneWire<P>) -> Result<Vec<Address>, MeasurementError<E>>
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
{
    let mut devices = Vec::new();
    let mut st: SearchState;
    let mut state = None;

    loop {
        match one_wire_bus.device_search(state, false, &mut Ets)? {
            None => {
                break;
            }
            Some((device_address, s)) => {
                devices.push(device_address);
                st = s;
                state = Some(&st);
            }
        }
    }

    Ok(devices)
}

// When performing a measurement it can happen that no device was found on the one-wire-bus
// in addition to the bus errors. Therefore we extend the error cases for proper error handling.
#[cfg(target_os = "espidf")]
#[derive(Debug)]
pub enum MeasurementError<E> {
    OneWireError(OneWireError<E>),
    NoDeviceFound,
}

#[cfg(target_os = "espidf")]
impl<E> From<OneWireError<E>> for MeasurementError<E> {
    fn from(value: OneWireError<E>) -> Self {
        MeasurementError::OneWireError(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_set_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_single_reading_is_the_reading() {
        assert_eq!(mean(&[21.5]), 21.5);
    }

    #[test]
    fn mean_of_known_sequence() {
        let samples = [20.0, 21.0, 22.0, 23.0];
        assert_eq!(mean(&samples), 21.5);
    }

    #[test]
    fn mean_handles_negative_temperatures() {
        let samples = [-10.0, 10.0];
        assert_eq!(mean(&samples), 0.0);
    }
}

// EOF
