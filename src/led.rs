// led.rs

use embedded_hal::{delay::DelayNs, digital::StatefulOutputPin};

pub const STARTUP_FLASH_MS: u32 = 300;

/// Blink the status LED `count` times: toggle `2 * count` edges with
/// `period_ms` between them, then drive high (the LED is active-low).
pub fn flash<P, D>(led: &mut P, count: u32, period_ms: u32, delay: &mut D) -> Result<(), P::Error>
where
    P: StatefulOutputPin,
    D: DelayNs,
{
    for _ in 0..(2 * count) {
        led.toggle()?;
        delay.delay_ms(period_ms);
    }
    // make sure led off
    led.set_high()
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorType, OutputPin};

    #[derive(Default)]
    struct FakeLed {
        high: bool,
        levels: Vec<bool>,
    }

    impl ErrorType for FakeLed {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for FakeLed {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.levels.push(true);
            Ok(())
        }
    }

    impl StatefulOutputPin for FakeLed {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    #[derive(Default)]
    struct FakeDelay {
        slept_ns: u64,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.slept_ns += u64::from(ns);
        }
    }

    #[test]
    fn four_blinks_make_eight_edges_and_end_high() {
        let mut led = FakeLed::default();
        let mut delay = FakeDelay::default();
        flash(&mut led, 4, 300, &mut delay).unwrap();
        // 8 toggles plus the final off write
        assert_eq!(led.levels.len(), 9);
        assert!(led.high);
        assert_eq!(delay.slept_ns, 8 * 300 * 1_000_000);
    }

    #[test]
    fn zero_count_only_forces_led_off() {
        let mut led = FakeLed::default();
        let mut delay = FakeDelay::default();
        flash(&mut led, 0, 100, &mut delay).unwrap();
        assert_eq!(led.levels, vec![true]);
        assert_eq!(delay.slept_ns, 0);
    }
}

// EOF
