use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of an extracted measurement report.
///
/// Built once per document and never modified afterwards. Field order
/// matches the JSON shape consumed by pricing tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub property: PropertyInfo,
    pub report_info: ReportInfo,
    pub roof_measurements: RoofMeasurements,
    pub wall_measurements: Option<WallMeasurements>,
    pub pitch_breakdown: Vec<PitchBreakdown>,
    pub suggested_waste: Option<WasteCalculation>,
    pub all_waste_calculations: Vec<WasteCalculation>,
    pub windows_doors: Vec<WindowDoor>,
    #[serde(default)]
    pub structures: Vec<Structure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportInfo {
    pub report_number: Option<String>,
    pub report_date: Option<String>,
    pub prepared_for_contact: Option<String>,
    pub prepared_for_company: Option<String>,
}

/// Whole-document roof totals. Linear measures are in feet and default to
/// zero when the report does not state them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoofMeasurements {
    pub total_area_sqft: f64,
    pub total_facets: u32,
    pub predominant_pitch: Option<String>,
    pub num_stories: Option<String>,
    pub ridges_ft: f64,
    pub hips_ft: f64,
    pub valleys_ft: f64,
    pub rakes_ft: f64,
    pub eaves_ft: f64,
    pub flashing_ft: f64,
    pub step_flashing_ft: f64,
    pub drip_edge_ft: f64,
    pub estimated_attic_sqft: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallMeasurements {
    pub total_wall_area_sqft: f64,
    pub total_wall_facets: u32,
    pub total_siding_area_sqft: f64,
    pub total_masonry_area_sqft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchBreakdown {
    /// Slope ratio as printed, e.g. "6/12".
    pub pitch: String,
    pub area_sqft: f64,
    pub percent_of_roof: f64,
}

impl PitchBreakdown {
    /// Rise component of the pitch ratio.
    pub fn numerator(&self) -> Option<u32> {
        crate::parsing::pitch::pitch_numerator(&self.pitch)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteCalculation {
    pub waste_percent: u32,
    pub area_sqft: f64,
    pub squares: f64,
    #[serde(default)]
    pub is_suggested: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    #[default]
    Simple,
    Normal,
    Complex,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Simple => write!(f, "Simple"),
            Complexity::Normal => write!(f, "Normal"),
            Complexity::Complex => write!(f, "Complex"),
        }
    }
}

/// Linear measurements of a single structure, in feet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureMeasurements {
    pub ridges_ft: f64,
    pub hips_ft: f64,
    pub valleys_ft: f64,
    pub rakes_ft: f64,
    pub eaves_ft: f64,
    pub flashing_ft: f64,
    pub step_flashing_ft: f64,
    pub drip_edge_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Number as printed in the report; gaps are preserved.
    pub structure_number: u32,
    pub total_area_sqft: f64,
    pub total_facets: u32,
    pub predominant_pitch: Option<String>,
    pub complexity: Complexity,
    pub measurements: StructureMeasurements,
    pub pitch_breakdown: Vec<PitchBreakdown>,
    pub suggested_waste: Option<WasteCalculation>,
    pub all_waste_calculations: Vec<WasteCalculation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    #[default]
    Unknown,
}

impl Direction {
    pub const COMPASS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn from_str_loose(s: &str) -> Option<Direction> {
        match s.trim().to_lowercase().as_str() {
            "north" => Some(Direction::North),
            "east" => Some(Direction::East),
            "south" => Some(Direction::South),
            "west" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "North"),
            Direction::East => write!(f, "East"),
            Direction::South => write!(f, "South"),
            Direction::West => write!(f, "West"),
            Direction::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDoor {
    pub label: String,
    pub area_sqft: f64,
    pub perimeter_ft: f64,
    pub width_ft: f64,
    pub height_ft: f64,
    pub wall_direction: Direction,
}
