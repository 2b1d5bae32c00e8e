// ident.rs

use core::fmt::Write;

use crate::REPORT_VERSION;

/// Full 6-byte factory MAC.
pub type MacAddress = [u8; 6];

/// 12 lowercase hex chars, stable across wake cycles (factory-burned eFuse MAC).
pub type DeviceId = heapless::String<16>;

#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Host targets get a fixed placeholder MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

pub fn device_id(mac: &MacAddress) -> DeviceId {
    let mut id = DeviceId::new();
    for b in mac {
        let _ = write!(id, "{b:02x}");
    }
    id
}

pub fn client_id(id: &str) -> String {
    format!("{REPORT_VERSION}_{id}")
}

pub fn topic_temp(id: &str) -> String {
    format!("{REPORT_VERSION}/{id}/TEMP")
}

pub fn topic_count(id: &str) -> String {
    format!("{REPORT_VERSION}/{id}/COUNT")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: MacAddress = [0x24, 0x0A, 0xC4, 0xAA, 0xBB, 0xCC];

    #[test]
    fn device_id_is_lowercase_hex() {
        assert_eq!(device_id(&MAC).as_str(), "240ac4aabbcc");
    }

    #[test]
    fn client_id_carries_report_version() {
        assert_eq!(client_id("240ac4aabbcc"), "ALPHA_240ac4aabbcc");
    }

    #[test]
    fn topics_are_namespaced() {
        assert_eq!(topic_temp("240ac4aabbcc"), "ALPHA/240ac4aabbcc/TEMP");
        assert_eq!(topic_count("240ac4aabbcc"), "ALPHA/240ac4aabbcc/COUNT");
    }
}

// EOF
