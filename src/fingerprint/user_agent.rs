// User agent parsing for device labels
// Substring matching only; anything unrecognised becomes "Unknown"

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

lazy_static! {
    static ref FIREFOX_VERSION: Regex = Regex::new(r"Firefox/([\d.]+)").unwrap();
    static ref EDGE_VERSION: Regex = Regex::new(r"Edg/([\d.]+)").unwrap();
    static ref CHROME_VERSION: Regex = Regex::new(r"Chrome/([\d.]+)").unwrap();
    static ref SAFARI_VERSION: Regex = Regex::new(r"Version/([\d.]+)").unwrap();
    static ref WINDOWS_NT: Regex = Regex::new(r"Windows NT ([\d.]+)").unwrap();
    static ref MAC_OS_X: Regex = Regex::new(r"Mac OS X ([\d_.]+)").unwrap();
    static ref ANDROID: Regex = Regex::new(r"Android ([\d.]+)").unwrap();
    static ref IOS: Regex = Regex::new(r"OS ([\d_]+) like Mac OS X").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedUserAgent {
    pub browser_name: String,
    pub browser_version: String,
    pub os_name: String,
    pub os_version: String,
}

fn capture(re: &Regex, ua: &str) -> String {
    re.captures(ua)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace('_', "."))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn windows_release(nt_version: &str) -> String {
    match nt_version {
        // Windows 11 still reports NT 10.0
        "10.0" => "10".to_string(),
        "6.3" => "8.1".to_string(),
        "6.2" => "8".to_string(),
        "6.1" => "7".to_string(),
        "6.0" => "Vista".to_string(),
        other => other.to_string(),
    }
}

fn parse_browser(ua: &str) -> (String, String) {
    if ua.contains("Firefox/") {
        ("Firefox".to_string(), capture(&FIREFOX_VERSION, ua))
    } else if ua.contains("Edg/") {
        // Edge also carries Chrome/, so it must win first
        ("Edge".to_string(), capture(&EDGE_VERSION, ua))
    } else if ua.contains("Chrome/") {
        ("Chrome".to_string(), capture(&CHROME_VERSION, ua))
    } else if ua.contains("Safari/") && ua.contains("Version/") {
        ("Safari".to_string(), capture(&SAFARI_VERSION, ua))
    } else {
        (UNKNOWN.to_string(), UNKNOWN.to_string())
    }
}

fn parse_os(ua: &str) -> (String, String) {
    if ua.contains("Windows NT") {
        let nt = capture(&WINDOWS_NT, ua);
        ("Windows".to_string(), windows_release(&nt))
    } else if ua.contains("Android") {
        // Android agents also say Linux
        ("Android".to_string(), capture(&ANDROID, ua))
    } else if ua.contains("iPhone") || ua.contains("iPad") {
        // iOS agents also say Mac OS X
        ("iOS".to_string(), capture(&IOS, ua))
    } else if ua.contains("Mac OS X") {
        ("macOS".to_string(), capture(&MAC_OS_X, ua))
    } else if ua.contains("Linux") {
        ("Linux".to_string(), UNKNOWN.to_string())
    } else {
        (UNKNOWN.to_string(), UNKNOWN.to_string())
    }
}

/// Extract browser and OS name/version from a user agent string
pub fn parse_user_agent(ua: &str) -> ParsedUserAgent {
    let (browser_name, browser_version) = parse_browser(ua);
    let (os_name, os_version) = parse_os(ua);

    ParsedUserAgent {
        browser_name,
        browser_version,
        os_name,
        os_version,
    }
}
