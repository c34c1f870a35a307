// Device signal bundle collected from a browser environment

use serde::{Deserialize, Serialize};

/// Display characteristics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenTraits {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub pixel_ratio: f64,
    pub avail_width: u32,
    pub avail_height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserTraits {
    pub name: String,
    pub version: String,
    pub language: String,
    pub languages: Vec<String>,
    pub user_agent: String,
    pub platform: String,
    pub cookies_enabled: bool,
    pub do_not_track: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OsTraits {
    pub name: String,
    pub version: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HardwareTraits {
    pub cores: u32,
    /// Approximate RAM in GB, when the browser exposes it
    pub device_memory: Option<f64>,
    pub touch_support: bool,
    pub max_touch_points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimezoneTraits {
    /// UTC offset in minutes, sign as reported by the browser
    pub offset: i32,
    pub name: String,
}

/// Everything the client knows about its device.
///
/// Only a subset feeds the fingerprint (see [`super::hash`]); the rest is kept
/// for display and audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSignalBundle {
    pub screen: ScreenTraits,
    pub browser: BrowserTraits,
    pub os: OsTraits,
    pub hardware: HardwareTraits,
    pub canvas: String,
    pub webgl: String,
    pub audio: String,
    pub timezone: TimezoneTraits,
    pub fonts: Vec<String>,
    pub plugins: Vec<String>,
}

impl DeviceSignalBundle {
    pub fn is_mobile(&self) -> bool {
        self.hardware.touch_support && self.hardware.max_touch_points > 0
    }

    /// Human readable label, e.g. `Chrome 120.0 on Windows 10 (Desktop)`
    pub fn device_name(&self) -> String {
        format!(
            "{} {} on {} {} ({})",
            self.browser.name,
            self.browser.version,
            self.os.name,
            self.os.version,
            if self.is_mobile() { "Mobile" } else { "Desktop" }
        )
    }
}
