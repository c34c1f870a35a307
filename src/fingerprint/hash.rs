// Fingerprint digest over the stable subset of a signal bundle
//
// Hashed: screen, canvas, webgl, audio, fonts, plugins, timezone, hardware,
// browser name and platform. Browser version and language are left out so
// auto-updates and locale switches keep the same fingerprint.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::warn;

use super::signals::{DeviceSignalBundle, HardwareTraits, ScreenTraits, TimezoneTraits};

pub const FINGERPRINT_LEN: usize = 64;

lazy_static! {
    static ref FINGERPRINT_FORMAT: Regex = Regex::new(r"^[0-9a-fA-F]{64}$").unwrap();
}

#[derive(Debug, Serialize)]
struct HashedBrowser<'a> {
    name: &'a str,
    platform: &'a str,
}

/// Field order here is the canonical order; do not reorder.
#[derive(Debug, Serialize)]
struct CanonicalSignals<'a> {
    screen: &'a ScreenTraits,
    canvas: &'a str,
    webgl: &'a str,
    audio: &'a str,
    fonts: String,
    plugins: String,
    timezone: &'a TimezoneTraits,
    hardware: &'a HardwareTraits,
    browser: HashedBrowser<'a>,
}

fn sorted_join(items: &[String]) -> String {
    let mut sorted: Vec<&str> = items.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

/// Canonical JSON text that the fingerprint is computed over
pub fn canonical_json(bundle: &DeviceSignalBundle) -> String {
    let canonical = CanonicalSignals {
        screen: &bundle.screen,
        canvas: &bundle.canvas,
        webgl: &bundle.webgl,
        audio: &bundle.audio,
        fonts: sorted_join(&bundle.fonts),
        plugins: sorted_join(&bundle.plugins),
        timezone: &bundle.timezone,
        hardware: &bundle.hardware,
        browser: HashedBrowser {
            name: &bundle.browser.name,
            platform: &bundle.browser.platform,
        },
    };

    serde_json::to_string(&canonical).unwrap_or_else(|e| {
        warn!("Failed to serialize canonical signals: {}", e);
        format!("{:?}", canonical)
    })
}

/// SHA-256 of the canonical signals, lowercase hex
pub fn hash(bundle: &DeviceSignalBundle) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(bundle).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether `value` has the shape of a fingerprint produced by [`hash`]
pub fn is_valid_fingerprint(value: &str) -> bool {
    FINGERPRINT_FORMAT.is_match(value)
}
