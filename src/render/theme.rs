//! Static theme and font preset tables. Lookups never fail: an unknown name
//! resolves to the default entry.

use serde::Serialize;

use crate::models::FontOverrides;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub highlight: &'static str,
}

const DEFAULT_THEME: Theme = Theme {
    name: "default",
    background: "#0f172a",
    text: "#f8fafc",
    muted: "#94a3b8",
    accent: "#38bdf8",
    highlight: "#facc15",
};

const THEMES: &[Theme] = &[
    DEFAULT_THEME,
    Theme {
        name: "light",
        background: "#ffffff",
        text: "#0f172a",
        muted: "#475569",
        accent: "#2563eb",
        highlight: "#fde68a",
    },
    Theme {
        name: "midnight",
        background: "#020617",
        text: "#e2e8f0",
        muted: "#64748b",
        accent: "#a78bfa",
        highlight: "#f472b6",
    },
    Theme {
        name: "sunset",
        background: "#431407",
        text: "#fff7ed",
        muted: "#fdba74",
        accent: "#fb923c",
        highlight: "#fcd34d",
    },
    Theme {
        name: "forest",
        background: "#052e16",
        text: "#f0fdf4",
        muted: "#86efac",
        accent: "#4ade80",
        highlight: "#bef264",
    },
];

pub fn get_theme(name: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(name))
        .unwrap_or(&THEMES[0])
}

#[derive(Debug, Clone, Copy)]
struct FontPreset {
    name: &'static str,
    headline_font: &'static str,
    body_font: &'static str,
    headline_size: u16,
    body_size: u16,
    headline_weight: u16,
    body_weight: u16,
}

const FONT_PRESETS: &[FontPreset] = &[
    FontPreset {
        name: "modern",
        headline_font: "Inter",
        body_font: "Inter",
        headline_size: 48,
        body_size: 24,
        headline_weight: 800,
        body_weight: 400,
    },
    FontPreset {
        name: "classic",
        headline_font: "Playfair Display",
        body_font: "Lora",
        headline_size: 52,
        body_size: 24,
        headline_weight: 700,
        body_weight: 400,
    },
    FontPreset {
        name: "bold",
        headline_font: "Montserrat",
        body_font: "Open Sans",
        headline_size: 56,
        body_size: 26,
        headline_weight: 900,
        body_weight: 500,
    },
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub size_px: u16,
    pub weight: u16,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FontSettings {
    pub preset: &'static str,
    pub headline: TextStyle,
    pub body: TextStyle,
}

/// Resolves the preset named in `overrides` (or the default one) and layers
/// the campaign's explicit overrides on top. Colors fall back to the theme.
pub fn get_font_settings(overrides: &FontOverrides, theme: &Theme) -> FontSettings {
    let preset = overrides
        .preset
        .as_deref()
        .and_then(|name| {
            FONT_PRESETS
                .iter()
                .find(|preset| preset.name.eq_ignore_ascii_case(name))
        })
        .unwrap_or(&FONT_PRESETS[0]);

    FontSettings {
        preset: preset.name,
        headline: TextStyle {
            font_family: overrides
                .headline_font
                .clone()
                .unwrap_or_else(|| preset.headline_font.to_string()),
            size_px: overrides.headline_size.unwrap_or(preset.headline_size),
            weight: overrides.headline_weight.unwrap_or(preset.headline_weight),
            color: overrides
                .headline_color
                .clone()
                .unwrap_or_else(|| theme.text.to_string()),
        },
        body: TextStyle {
            font_family: overrides
                .body_font
                .clone()
                .unwrap_or_else(|| preset.body_font.to_string()),
            size_px: overrides.body_size.unwrap_or(preset.body_size),
            weight: overrides.body_weight.unwrap_or(preset.body_weight),
            color: overrides
                .body_color
                .clone()
                .unwrap_or_else(|| theme.muted.to_string()),
        },
    }
}
