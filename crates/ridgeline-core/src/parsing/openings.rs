//! Window and door schedule, with each opening assigned to a compass wall.
//!
//! Openings are labelled by wall letter plus a number ("A1", "C3"). The wall
//! letters are tied to directions either by the per-elevation wall tables
//! or by the interleaved window/door diagram listing.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Direction, WindowDoor};
use crate::parsing::values::parse_number;

/// Label, area, perimeter, then "width x height". The label is case-sensitive.
static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]\d+)\s+([\d.]+)\s+([\d.]+)\s+([\d.]+)\s*[xX]\s*([\d.]+)")
        .expect("opening pattern is a valid regex")
});

static WALL_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z])\s+[\d.]+\s+[\d.]+").expect("wall row pattern is a valid regex")
});

static ELEVATIONS: LazyLock<Vec<(Direction, Regex)>> = LazyLock::new(|| {
    Direction::COMPASS
        .iter()
        .map(|&dir| {
            let re = Regex::new(&format!(
                r"(?is){dir}\s+ELEVATION.*?Window\s*&\s*Door.*?Count\s*(.*?)(?:Note:|©|\z)"
            ))
            .expect("elevation pattern is a valid regex");
            (dir, re)
        })
        .collect()
});

static DIAGRAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)WINDOW\s+AND\s+DOOR\s+DIAGRAM(.*?)(?:ELEVATION|REPORT\s+SUMMARY|\z)")
        .expect("diagram pattern is a valid regex")
});

static DIAGRAM_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(North|East|South|West)\b").expect("heading pattern is a valid regex")
});

/// Parse every window/door record, deduplicated by label (first wins), with
/// wall directions resolved. Letters with no known direction get
/// [`Direction::Unknown`].
pub fn parse_openings(text: &str) -> Vec<WindowDoor> {
    let walls = wall_directions(text);
    let mut seen = HashSet::new();
    let mut openings = Vec::new();

    for caps in ENTRY.captures_iter(text) {
        let Some(label) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if seen.contains(label) {
            continue;
        }
        let value = |i: usize| caps.get(i).and_then(|m| parse_number(m.as_str()));
        let (Some(area_sqft), Some(perimeter_ft), Some(width_ft), Some(height_ft)) =
            (value(2), value(3), value(4), value(5))
        else {
            continue;
        };

        seen.insert(label.to_string());
        let wall_direction = label
            .chars()
            .next()
            .and_then(|letter| walls.get(&letter).copied())
            .unwrap_or_default();

        openings.push(WindowDoor {
            label: label.to_string(),
            area_sqft,
            perimeter_ft,
            width_ft,
            height_ft,
            wall_direction,
        });
    }

    tracing::debug!(
        openings = openings.len(),
        walls = walls.len(),
        "parsed windows and doors"
    );
    openings
}

/// Map wall letters to directions. Elevation tables are read first, then the
/// diagram listing; the first direction found for a letter is kept.
pub fn wall_directions(text: &str) -> HashMap<char, Direction> {
    let mut walls = HashMap::new();

    for (dir, re) in ELEVATIONS.iter() {
        let Some(body) = re.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };
        for row in WALL_ROW.captures_iter(body.as_str()) {
            if let Some(letter) = row.get(1).and_then(|m| m.as_str().chars().next()) {
                walls.entry(letter).or_insert(*dir);
            }
        }
    }

    if let Some(diagram) = DIAGRAM.captures(text).and_then(|c| c.get(1)) {
        let mut current = None;
        for line in diagram.as_str().lines() {
            let line = line.trim();
            if let Some(heading) = DIAGRAM_HEADING.captures(line).and_then(|c| c.get(1)) {
                current = Direction::from_str_loose(heading.as_str());
            }
            let Some(dir) = current else {
                continue;
            };
            for entry in ENTRY.captures_iter(line) {
                if let Some(letter) = entry.get(1).and_then(|m| m.as_str().chars().next()) {
                    walls.entry(letter).or_insert(dir);
                }
            }
        }
    }

    walls
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELEVATION_TEXT: &str = "\
NORTH ELEVATION
Window & Door
Count
A   120.5   3
B   80      2
Note: wall areas are approximate
EAST ELEVATION
Window & Door Count
C   50   1
© 2024
";

    #[test]
    fn test_entries_parsed() {
        let openings = parse_openings("A1  15.0  16.0  3.0 x 5.0\nC2  21  20.5  3.5X6\n");
        assert_eq!(openings.len(), 2);
        assert_eq!(openings[0].label, "A1");
        assert_eq!(openings[0].area_sqft, 15.0);
        assert_eq!(openings[0].perimeter_ft, 16.0);
        assert_eq!(openings[0].width_ft, 3.0);
        assert_eq!(openings[0].height_ft, 5.0);
        assert_eq!(openings[1].width_ft, 3.5);
        assert_eq!(openings[1].height_ft, 6.0);
    }

    #[test]
    fn test_duplicate_label_first_wins() {
        let openings = parse_openings("I1 10 13 2 x 5\nI1 99 99 9 x 9\n");
        assert_eq!(openings.len(), 1);
        assert_eq!(openings[0].area_sqft, 10.0);
        assert_eq!(openings[0].height_ft, 5.0);
    }

    #[test]
    fn test_lowercase_label_ignored() {
        assert!(parse_openings("a1 10 13 2 x 5").is_empty());
    }

    #[test]
    fn test_elevation_directions() {
        let walls = wall_directions(ELEVATION_TEXT);
        assert_eq!(walls[&'A'], Direction::North);
        assert_eq!(walls[&'B'], Direction::North);
        assert_eq!(walls[&'C'], Direction::East);
        assert!(!walls.contains_key(&'D'));
    }

    #[test]
    fn test_diagram_directions() {
        let text = "\
WINDOW AND DOOR DIAGRAM
North
A1  15  16  3 x 5
South  B1  20  18  4 x 5
B2  20  18  4 x 5
REPORT SUMMARY
";
        let walls = wall_directions(text);
        assert_eq!(walls[&'A'], Direction::North);
        assert_eq!(walls[&'B'], Direction::South);
    }

    #[test]
    fn test_elevation_wins_over_diagram() {
        let text = format!(
            "{ELEVATION_TEXT}WINDOW AND DOOR DIAGRAM\nWest\nA1  15  16  3 x 5\nD1  15  16  3 x 5\n"
        );
        let openings = parse_openings(&text);
        let dir = |label: &str| {
            openings
                .iter()
                .find(|o| o.label == label)
                .map(|o| o.wall_direction)
        };
        assert_eq!(dir("A1"), Some(Direction::North));
        assert_eq!(dir("D1"), Some(Direction::West));
    }

    #[test]
    fn test_unresolved_wall_is_unknown() {
        let openings = parse_openings("Z9 10 13 2 x 5");
        assert_eq!(openings[0].wall_direction, Direction::Unknown);
    }
}
