// Signal collection with per-probe fault isolation
// A failing probe yields a sentinel or default value, never an error.

use thiserror::Error;
use tracing::debug;

use super::fonts::{detect_installed_fonts, TextMeasurer};
use super::signals::{
    BrowserTraits, DeviceSignalBundle, HardwareTraits, OsTraits, ScreenTraits, TimezoneTraits,
};
use super::user_agent::parse_user_agent;

pub const NO_CANVAS: &str = "no-canvas";
pub const NO_WEBGL: &str = "no-webgl";
pub const AUDIO_ERROR: &str = "audio-error";

/// Number of analyser frequency bins kept from the audio probe
pub const AUDIO_BIN_COUNT: usize = 30;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("{0} is not available")]
    Unavailable(&'static str),

    #[error("probe failed: {0}")]
    Failed(String),
}

/// Raw navigator properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigatorInfo {
    pub user_agent: String,
    pub language: String,
    pub languages: Vec<String>,
    pub platform: String,
    pub cookies_enabled: bool,
    pub do_not_track: bool,
    pub hardware_concurrency: u32,
    pub device_memory: Option<f64>,
    pub max_touch_points: u32,
    pub touch_support: bool,
    pub plugins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebGlInfo {
    pub vendor: String,
    pub renderer: String,
}

/// The environment a fingerprint is taken from.
///
/// Implementations own any transient rendering resources (canvas, audio
/// graph) and must release them before a probe returns.
pub trait SignalSource {
    fn screen(&self) -> Result<ScreenTraits, ProbeError>;
    fn navigator(&self) -> Result<NavigatorInfo, ProbeError>;
    fn timezone(&self) -> Result<TimezoneTraits, ProbeError>;
    /// PNG data URL of the fixed text/shape drawing
    fn canvas_data_url(&self) -> Result<String, ProbeError>;
    fn webgl(&self) -> Result<WebGlInfo, ProbeError>;
    fn audio_frequency_bins(&self) -> Result<Vec<f32>, ProbeError>;
    fn text_measurer(&self) -> Option<&dyn TextMeasurer>;
}

fn canvas_signal(source: &dyn SignalSource) -> String {
    source.canvas_data_url().unwrap_or_else(|e| {
        debug!("Canvas probe failed: {}", e);
        NO_CANVAS.to_string()
    })
}

fn webgl_signal(source: &dyn SignalSource) -> String {
    match source.webgl() {
        Ok(info) => format!("{}~{}", info.vendor, info.renderer),
        Err(e) => {
            debug!("WebGL probe failed: {}", e);
            NO_WEBGL.to_string()
        },
    }
}

fn audio_signal(source: &dyn SignalSource) -> String {
    match source.audio_frequency_bins() {
        Ok(bins) => bins
            .iter()
            .take(AUDIO_BIN_COUNT)
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(","),
        Err(e) => {
            debug!("Audio probe failed: {}", e);
            AUDIO_ERROR.to_string()
        },
    }
}

/// Gather every signal the source can provide
pub fn collect_signals(source: &dyn SignalSource) -> DeviceSignalBundle {
    let screen = source.screen().unwrap_or_default();
    let navigator = source.navigator().unwrap_or_default();
    let timezone = source.timezone().unwrap_or_default();
    let parsed = parse_user_agent(&navigator.user_agent);

    let fonts = source
        .text_measurer()
        .map(|measurer| detect_installed_fonts(measurer))
        .unwrap_or_default();

    DeviceSignalBundle {
        screen,
        browser: BrowserTraits {
            name: parsed.browser_name,
            version: parsed.browser_version,
            language: navigator.language.clone(),
            languages: navigator.languages.clone(),
            user_agent: navigator.user_agent.clone(),
            platform: navigator.platform.clone(),
            cookies_enabled: navigator.cookies_enabled,
            do_not_track: navigator.do_not_track,
        },
        os: OsTraits {
            name: parsed.os_name,
            version: parsed.os_version,
            platform: navigator.platform.clone(),
        },
        hardware: HardwareTraits {
            cores: navigator.hardware_concurrency,
            device_memory: navigator.device_memory,
            touch_support: navigator.touch_support,
            max_touch_points: navigator.max_touch_points,
        },
        canvas: canvas_signal(source),
        webgl: webgl_signal(source),
        audio: audio_signal(source),
        timezone,
        fonts,
        plugins: navigator.plugins,
    }
}
