// sprayer.rs

use embedded_hal::{delay::DelayNs, digital::OutputPin};

/// Timed dispenser pulse: drive the valve pin high, hold, drive low.
pub fn spray<P, D>(pin: &mut P, duration_ms: u32, delay: &mut D) -> Result<(), P::Error>
where
    P: OutputPin,
    D: DelayNs,
{
    pin.set_high()?;
    delay.delay_ms(duration_ms);
    pin.set_low()
}


// EOF
