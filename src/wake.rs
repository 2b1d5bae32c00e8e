// wake.rs

#[cfg(target_os = "espidf")]
use esp_idf_hal::reset::ResetReason;
#[cfg(target_os = "espidf")]
use log::*;

#[cfg(target_os = "espidf")]
use crate::MyConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeCause {
    DeepSleep,
    HardReset,
}

/// Startup blink count: 2x when woken by the sleep timer, 4x otherwise.
pub fn blink_count(cause: WakeCause) -> u32 {
    match cause {
        WakeCause::DeepSleep => 2,
        WakeCause::HardReset => 4,
    }
}

#[cfg(target_os = "espidf")]
pub fn wake_cause() -> WakeCause {
    match ResetReason::get() {
        ResetReason::DeepSleep => {
            debug!("woke from deep sleep");
            WakeCause::DeepSleep
        }
        other => {
            debug!("woke from hard reset ({other:?})");
            WakeCause::HardReset
        }
    }
}

/// Arm the wakeup timer and power down. Never returns.
#[cfg(target_os = "espidf")]
pub fn goodnight(config: &MyConfig) -> ! {
    if config.debug {
        warn!("Debug config, restarting instead of deep sleep");
        esp_idf_hal::reset::restart();
    }

    info!("Good night. Waking up in {} ms.", config.sleep_ms);
    if let Err(e) = esp_idf_sys::esp!(unsafe {
        esp_idf_sys::esp_sleep_enable_timer_wakeup(config.sleep_ms * 1000)
    }) {
        error!("Cannot arm wakeup timer: {e}");
    }
    unsafe { esp_idf_sys::esp_deep_sleep_start() };
    unreachable!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_sleep_wake_blinks_twice() {
        assert_eq!(blink_count(WakeCause::DeepSleep), 2);
    }

    #[test]
    fn hard_reset_blinks_four_times() {
        assert_eq!(blink_count(WakeCause::HardReset), 4);
    }
}

// EOF
