// Browser device fingerprinting
// Combines weak device signals into one stable identifier

pub mod collector;
pub mod fonts;
pub mod hash;
pub mod signals;
pub mod user_agent;

use serde::{Deserialize, Serialize};

pub use collector::{
    collect_signals, NavigatorInfo, ProbeError, SignalSource, WebGlInfo, AUDIO_ERROR, NO_CANVAS,
    NO_WEBGL,
};
pub use fonts::{detect_installed_fonts, TextMeasurer};
pub use hash::{canonical_json, hash, is_valid_fingerprint, FINGERPRINT_LEN};
pub use signals::{
    BrowserTraits, DeviceSignalBundle, HardwareTraits, OsTraits, ScreenTraits, TimezoneTraits,
};
pub use user_agent::{parse_user_agent, ParsedUserAgent};

/// Result of fingerprinting an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFingerprint {
    pub fingerprint: String,
    pub device_info: DeviceSignalBundle,
}

/// Collect signals from `source` and hash them. Never fails.
pub fn generate(source: &dyn SignalSource) -> GeneratedFingerprint {
    let device_info = collect_signals(source);
    let fingerprint = hash(&device_info);

    GeneratedFingerprint {
        fingerprint,
        device_info,
    }
}
