//! Résumé input schema — the JSON payload posted by the editor.
//!
//! Every type here is an immutable value object, built once per request by
//! serde and dropped once the document has been generated. Layout defaults
//! and range checks are resolved during deserialization so the generator
//! only ever sees concrete numbers.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Layout defaults and accepted ranges
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_MARGIN_TOP_MM: u32 = 20;
pub const DEFAULT_MARGIN_BOTTOM_MM: u32 = 20;
pub const DEFAULT_MARGIN_LEFT_MM: u32 = 15;
pub const DEFAULT_MARGIN_RIGHT_MM: u32 = 15;

pub const DEFAULT_SECTION_SPACING_PT: u32 = 12;
pub const DEFAULT_ITEM_SPACING_PT: u32 = 6;

pub const DEFAULT_CONTENT_SIZE_PT: u32 = 11;
pub const DEFAULT_SECTION_SIZE_PT: u32 = 14;
pub const DEFAULT_NAME_SIZE_PT: u32 = 24;

const MARGIN_RANGE_MM: RangeInclusive<u32> = 1..=100;
const SPACING_RANGE_PT: RangeInclusive<u32> = 0..=72;
const FONT_RANGE_PT: RangeInclusive<u32> = 6..=72;

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Vertical spacing around section headings, in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub section_spacing: u32,
    pub item_spacing: u32,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fonts {
    pub content_size: u32,
    pub section_size: u32,
    pub name_size: u32,
}

/// Fixed-shape layout preferences. Built from the lenient wire form via
/// [`RawLayout`]; each field falls back to its default independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLayout")]
pub struct Layout {
    pub margins: Margins,
    pub spacing: Spacing,
    pub fonts: Fonts,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            margins: Margins {
                top: DEFAULT_MARGIN_TOP_MM,
                bottom: DEFAULT_MARGIN_BOTTOM_MM,
                left: DEFAULT_MARGIN_LEFT_MM,
                right: DEFAULT_MARGIN_RIGHT_MM,
            },
            spacing: Spacing {
                section_spacing: DEFAULT_SECTION_SPACING_PT,
                item_spacing: DEFAULT_ITEM_SPACING_PT,
            },
            fonts: Fonts {
                content_size: DEFAULT_CONTENT_SIZE_PT,
                section_size: DEFAULT_SECTION_SIZE_PT,
                name_size: DEFAULT_NAME_SIZE_PT,
            },
        }
    }
}

/// The layout exactly as the editor sends it: three open-ended maps whose
/// values may be missing, `null`, numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLayout {
    margins: Option<Map<String, Value>>,
    spacing: Option<Map<String, Value>>,
    fonts: Option<Map<String, Value>>,
}

impl From<RawLayout> for Layout {
    fn from(raw: RawLayout) -> Self {
        let margins = raw.margins.as_ref();
        let spacing = raw.spacing.as_ref();
        let fonts = raw.fonts.as_ref();

        Layout {
            margins: Margins {
                top: resolve(margins, "top", MARGIN_RANGE_MM, DEFAULT_MARGIN_TOP_MM),
                bottom: resolve(margins, "bottom", MARGIN_RANGE_MM, DEFAULT_MARGIN_BOTTOM_MM),
                left: resolve(margins, "left", MARGIN_RANGE_MM, DEFAULT_MARGIN_LEFT_MM),
                right: resolve(margins, "right", MARGIN_RANGE_MM, DEFAULT_MARGIN_RIGHT_MM),
            },
            spacing: Spacing {
                section_spacing: resolve(
                    spacing,
                    "sectionSpacing",
                    SPACING_RANGE_PT,
                    DEFAULT_SECTION_SPACING_PT,
                ),
                item_spacing: resolve(
                    spacing,
                    "itemSpacing",
                    SPACING_RANGE_PT,
                    DEFAULT_ITEM_SPACING_PT,
                ),
            },
            fonts: Fonts {
                content_size: resolve(
                    fonts,
                    "contentSize",
                    FONT_RANGE_PT,
                    DEFAULT_CONTENT_SIZE_PT,
                ),
                section_size: resolve(
                    fonts,
                    "sectionSize",
                    FONT_RANGE_PT,
                    DEFAULT_SECTION_SIZE_PT,
                ),
                name_size: resolve(fonts, "nameSize", FONT_RANGE_PT, DEFAULT_NAME_SIZE_PT),
            },
        }
    }
}

/// Looks up `key`, accepting it only if it is numeric and inside `range`.
fn resolve(
    map: Option<&Map<String, Value>>,
    key: &str,
    range: RangeInclusive<u32>,
    default: u32,
) -> u32 {
    map.and_then(|m| m.get(key))
        .and_then(numeric_value)
        .filter(|v| range.contains(v))
        .unwrap_or(default)
}

/// Interprets a JSON number or numeric string as a non-negative integer.
/// Fractional values are rounded; anything else is rejected.
fn numeric_value(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !n.is_finite() || n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n.round() as u32)
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Contact block. Only `name` is required; empty strings mean "omit".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub location: String,
    pub graduation_date: String,
    pub gpa: Option<String>,
}

impl Education {
    /// The GPA to print, if any. Blank values count as absent.
    pub fn gpa(&self) -> Option<&str> {
        self.gpa.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sections {
    pub personal: PersonalInfo,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Root aggregate handed to the document generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default, deserialize_with = "layout_or_default")]
    pub layout: Layout,
    pub sections: Sections,
}

/// A `null` layout means the same as an absent one.
fn layout_or_default<'de, D>(deserializer: D) -> Result<Layout, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Layout>::deserialize(deserializer)?.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /compile-pdf`, `POST /preview-latex` and `POST /debug-data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub resume_data: ResumeData,
    #[serde(default)]
    pub resume_title: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
