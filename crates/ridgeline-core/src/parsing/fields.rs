//! Label-driven field extraction.
//!
//! Every vendor label the parser understands is listed once in
//! [`FIELD_TABLE`], together with the patterns that find it and the
//! postprocessing applied to the captured value. All patterns match
//! case-insensitively, because vendor casing varies by report version.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::model::{RoofMeasurements, StructureMeasurements, WallMeasurements};
use crate::parsing::values::{parse_count, parse_number, strip_thousands, truncate_at_gap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ReportNumber,
    ReportDate,
    Contact,
    Company,
    TotalArea,
    TotalFacets,
    PredominantPitch,
    NumStories,
    Ridges,
    Hips,
    Valleys,
    Rakes,
    Eaves,
    Flashing,
    StepFlashing,
    DripEdge,
    EstimatedAttic,
    TotalWallArea,
    TotalWallFacets,
    SidingArea,
    MasonryArea,
    Latitude,
    Longitude,
}

/// How a captured value is cleaned before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Post {
    /// Drop thousands separators.
    Numeric,
    Trimmed,
    /// Trim, then cut at the next column gap of `pdftotext -layout` output.
    LayoutCell,
}

#[derive(Debug)]
pub struct FieldDef {
    pub field: Field,
    pub name: &'static str,
    /// Tried in order; capture group 1 holds the value.
    pub patterns: &'static [&'static str],
    /// A match is skipped when the text before it ends with one of these.
    pub not_after: &'static [&'static str],
    pub post: Post,
}

pub const FIELD_TABLE: &[FieldDef] = &[
    FieldDef {
        field: Field::ReportNumber,
        name: "report_number",
        patterns: &[r"Report:\s*(\d{6,})"],
        not_after: &[],
        post: Post::Trimmed,
    },
    FieldDef {
        field: Field::ReportDate,
        name: "report_date",
        patterns: &[r"(\d{1,2}/\d{1,2}/\d{4})"],
        not_after: &[],
        post: Post::Trimmed,
    },
    FieldDef {
        field: Field::Contact,
        name: "prepared_for_contact",
        patterns: &[r"Contact:\s*([^\n]+)"],
        not_after: &[],
        post: Post::LayoutCell,
    },
    FieldDef {
        field: Field::Company,
        name: "prepared_for_company",
        patterns: &[r"Company:\s*([^\n]+)"],
        not_after: &[],
        post: Post::LayoutCell,
    },
    FieldDef {
        field: Field::TotalArea,
        name: "total_area_sqft",
        patterns: &[
            r"Total\s+(?:Roof\s+)?Area\s*[=:]\s*([\d,]+(?:\.\d+)?)\s*sq\s*ft",
            r"Total\s+Area\s*\(All\s+Pitches\)\s*[=:]\s*([\d,]+(?:\.\d+)?)",
        ],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::TotalFacets,
        name: "total_facets",
        patterns: &[r"Total\s+(?:Roof\s+)?Facets\s*[=:]\s*(\d+)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::PredominantPitch,
        name: "predominant_pitch",
        patterns: &[r"Predominant\s+Pitch\s*[=:]\s*(\d+/\d+)"],
        not_after: &[],
        post: Post::Trimmed,
    },
    FieldDef {
        field: Field::NumStories,
        name: "num_stories",
        patterns: &[r"Number\s+of\s+Stories\s*[=:>]\s*([^\n]+)"],
        not_after: &[],
        post: Post::LayoutCell,
    },
    FieldDef {
        field: Field::Ridges,
        name: "ridges_ft",
        patterns: &[r"\bRidges?\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::Hips,
        name: "hips_ft",
        patterns: &[r"\bHips?\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        // "Ridges/Hips = ..." is a combined total, not hips alone
        not_after: &["/"],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::Valleys,
        name: "valleys_ft",
        patterns: &[r"\bValleys?\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::Rakes,
        name: "rakes_ft",
        patterns: &[r"\bRakes?†?\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::Eaves,
        name: "eaves_ft",
        patterns: &[r"\bEaves?(?:/Starter)?‡?\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::Flashing,
        name: "flashing_ft",
        patterns: &[r"\bFlashing\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        not_after: &["step"],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::StepFlashing,
        name: "step_flashing_ft",
        patterns: &[r"\bStep\s*Flashing\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::DripEdge,
        name: "drip_edge_ft",
        patterns: &[r"Drip\s+Edge\s*\([^)]*\)\s*[=:]\s*([\d,]+(?:\.\d+)?)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::EstimatedAttic,
        name: "estimated_attic_sqft",
        patterns: &[r"Estimated\s+Attic\s*[=:]\s*([\d,]+(?:\.\d+)?)\s*sq\s*ft"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::TotalWallArea,
        name: "total_wall_area_sqft",
        patterns: &[r"Total\s+Wall\s+Area\s*[=:]\s*([\d,]+(?:\.\d+)?)\s*(?:sq\s*)?ft"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::TotalWallFacets,
        name: "total_wall_facets",
        patterns: &[r"Total\s+Wall\s+Facets\s*[=:]\s*(\d+)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::SidingArea,
        name: "total_siding_area_sqft",
        patterns: &[r"Total\s+Siding\s+Area\s*[=:]\s*([\d,]+(?:\.\d+)?)\s*(?:sq\s*)?ft"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::MasonryArea,
        name: "total_masonry_area_sqft",
        patterns: &[r"Total\s+Masonry\s+Area\s*[=:]\s*([\d,]+(?:\.\d+)?)\s*(?:sq\s*)?ft"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::Latitude,
        name: "latitude",
        patterns: &[r"Latitude\s*[=:]\s*([-\d.]+)"],
        not_after: &[],
        post: Post::Numeric,
    },
    FieldDef {
        field: Field::Longitude,
        name: "longitude",
        patterns: &[r"Longitude\s*[=:]\s*([-\d.]+)"],
        not_after: &[],
        post: Post::Numeric,
    },
];

struct CompiledField {
    def: &'static FieldDef,
    patterns: Vec<Regex>,
}

static COMPILED: LazyLock<HashMap<Field, CompiledField>> = LazyLock::new(|| {
    FIELD_TABLE
        .iter()
        .map(|def| {
            let patterns = def
                .patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .expect("field pattern is a valid regex")
                })
                .collect();
            (def.field, CompiledField { def, patterns })
        })
        .collect()
});

/// Find the first acceptable match for `field` in `text` and return its
/// postprocessed value.
pub fn capture(field: Field, text: &str) -> Option<String> {
    let compiled = COMPILED.get(&field)?;
    for re in &compiled.patterns {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if preceded_by(&text[..whole.start()], compiled.def.not_after) {
                continue;
            }
            let value = match compiled.def.post {
                Post::Numeric => strip_thousands(value.as_str().trim()),
                Post::Trimmed => value.as_str().trim().to_string(),
                Post::LayoutCell => truncate_at_gap(value.as_str()).to_string(),
            };
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

pub fn number(field: Field, text: &str) -> Option<f64> {
    convert(field, text, parse_number)
}

pub fn integer(field: Field, text: &str) -> Option<u32> {
    convert(field, text, parse_count)
}

fn convert<T>(field: Field, text: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    let raw = capture(field, text)?;
    let value = parse(&raw);
    if value.is_none() {
        let name = COMPILED.get(&field).map_or("?", |c| c.def.name);
        tracing::debug!(field = name, raw = %raw, "captured value is not numeric");
    }
    value
}

pub fn text(field: Field, text: &str) -> Option<String> {
    capture(field, text)
}

fn preceded_by(before: &str, guards: &[&str]) -> bool {
    let before = before.trim_end().to_lowercase();
    guards.iter().any(|g| before.ends_with(g))
}

/// Linear roof measurements found in `text`. Drip edge is the explicit
/// value when stated, otherwise eaves plus rakes.
pub fn linear_measurements(text: &str) -> StructureMeasurements {
    let rakes_ft = number(Field::Rakes, text).unwrap_or(0.0);
    let eaves_ft = number(Field::Eaves, text).unwrap_or(0.0);
    StructureMeasurements {
        ridges_ft: number(Field::Ridges, text).unwrap_or(0.0),
        hips_ft: number(Field::Hips, text).unwrap_or(0.0),
        valleys_ft: number(Field::Valleys, text).unwrap_or(0.0),
        rakes_ft,
        eaves_ft,
        flashing_ft: number(Field::Flashing, text).unwrap_or(0.0),
        step_flashing_ft: number(Field::StepFlashing, text).unwrap_or(0.0),
        drip_edge_ft: number(Field::DripEdge, text).unwrap_or(eaves_ft + rakes_ft),
    }
}

pub fn parse_roof(text: &str) -> RoofMeasurements {
    let linear = linear_measurements(text);
    RoofMeasurements {
        total_area_sqft: number(Field::TotalArea, text).unwrap_or(0.0),
        total_facets: integer(Field::TotalFacets, text).unwrap_or(0),
        predominant_pitch: self::text(Field::PredominantPitch, text),
        num_stories: self::text(Field::NumStories, text),
        ridges_ft: linear.ridges_ft,
        hips_ft: linear.hips_ft,
        valleys_ft: linear.valleys_ft,
        rakes_ft: linear.rakes_ft,
        eaves_ft: linear.eaves_ft,
        flashing_ft: linear.flashing_ft,
        step_flashing_ft: linear.step_flashing_ft,
        drip_edge_ft: linear.drip_edge_ft,
        estimated_attic_sqft: number(Field::EstimatedAttic, text),
    }
}

/// Wall totals, present only when the report carries a wall section.
pub fn parse_walls(text: &str) -> Option<WallMeasurements> {
    let wall_area = number(Field::TotalWallArea, text);
    let siding = number(Field::SidingArea, text);
    let masonry = number(Field::MasonryArea, text);

    if [wall_area, siding, masonry]
        .iter()
        .all(|v| v.unwrap_or(0.0) == 0.0)
    {
        return None;
    }

    Some(WallMeasurements {
        total_wall_area_sqft: wall_area.unwrap_or(0.0),
        total_wall_facets: integer(Field::TotalWallFacets, text).unwrap_or(0),
        total_siding_area_sqft: siding.unwrap_or(0.0),
        total_masonry_area_sqft: masonry.unwrap_or(0.0),
    })
}

/// GPS coordinates as `(latitude, longitude)`.
pub fn parse_coordinates(text: &str) -> (Option<f64>, Option<f64>) {
    (number(Field::Latitude, text), number(Field::Longitude, text))
}
