// Installed font detection by text-width probing
//
// A candidate counts as installed when rendering the probe string with
// "<candidate>, <baseline>" yields a different width than the bare baseline
// for at least one baseline family.

/// Measures rendered text width for a CSS font shorthand
pub trait TextMeasurer {
    /// Width in CSS pixels, or `None` when measuring is not possible
    fn measure(&self, font: &str, text: &str) -> Option<f64>;
}

pub const PROBE_TEXT: &str = "mmmmmmmmmmlli";
pub const PROBE_SIZE: &str = "72px";
pub const BASELINE_FONTS: [&str; 3] = ["monospace", "sans-serif", "serif"];

pub const FONT_CANDIDATES: &[&str] = &[
    "Arial",
    "Arial Black",
    "Calibri",
    "Cambria",
    "Comic Sans MS",
    "Consolas",
    "Courier New",
    "Georgia",
    "Helvetica",
    "Impact",
    "Lucida Console",
    "Lucida Sans Unicode",
    "Palatino Linotype",
    "Segoe UI",
    "Tahoma",
    "Times New Roman",
    "Trebuchet MS",
    "Verdana",
    "Noto Sans Arabic",
    "Traditional Arabic",
    "Simplified Arabic",
    "Arabic Typesetting",
    "Ubuntu",
    "DejaVu Sans",
    "Roboto",
    "San Francisco",
    "Menlo",
    "Monaco",
];

fn font_spec(families: &str) -> String {
    format!("{} {}", PROBE_SIZE, families)
}

/// Probe the fixed candidate list and return the fonts that appear installed
pub fn detect_installed_fonts(measurer: &dyn TextMeasurer) -> Vec<String> {
    detect_from_candidates(measurer, FONT_CANDIDATES)
}

pub fn detect_from_candidates(measurer: &dyn TextMeasurer, candidates: &[&str]) -> Vec<String> {
    let baselines: Vec<(&str, f64)> = BASELINE_FONTS
        .iter()
        .filter_map(|base| {
            measurer
                .measure(&font_spec(base), PROBE_TEXT)
                .map(|width| (*base, width))
        })
        .collect();

    if baselines.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|candidate| {
            baselines.iter().any(|(base, base_width)| {
                let families = format!("'{}', {}", candidate, base);
                measurer
                    .measure(&font_spec(&families), PROBE_TEXT)
                    .map(|width| (width - base_width).abs() > f64::EPSILON)
                    .unwrap_or(false)
            })
        })
        .map(|candidate| candidate.to_string())
        .collect()
}
