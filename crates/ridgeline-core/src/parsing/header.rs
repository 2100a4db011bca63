//! Report header: property address and report metadata.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{PropertyInfo, ReportInfo};
use crate::parsing::fields::{self, Field};

/// A full street address: house number, street name with a known suffix,
/// city, two-letter state and 5- or 9-digit postal code. Only the state code
/// is case-sensitive.
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,6}\s+[a-z][a-z0-9\s]+(?:Lane|Ln|Street|St|Road|Rd|Ave|Avenue|Dr|Drive|Ct|Court|Blvd|Boulevard|Way|Circle|Cir|Place|Pl)\b[^,\n]*,\s*[a-z][a-z\s]*,\s*(?-i:[A-Z]{2})\s+\d{5}(?:-\d{4})?)\b",
    )
    .expect("address pattern is a valid regex")
});

/// Extract the property address. A match missing any element counts as no
/// address; a partial value is never returned.
pub fn extract_address(text: &str) -> Option<String> {
    ADDRESS
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| collapse_ws(m.as_str()))
}

/// Extract property information from the full report text.
pub fn parse_property(text: &str) -> PropertyInfo {
    let (latitude, longitude) = fields::parse_coordinates(text);
    PropertyInfo {
        address: extract_address(text),
        latitude,
        longitude,
    }
}

/// Extract report identification and the "prepared for" block.
pub fn parse_report_info(text: &str) -> ReportInfo {
    ReportInfo {
        report_number: fields::text(Field::ReportNumber, text),
        report_date: fields::text(Field::ReportDate, text),
        prepared_for_contact: fields::text(Field::Contact, text),
        prepared_for_company: fields::text(Field::Company, text),
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_address() {
        let text = "Prepared 3/14/2024\n1234 Maple Grove Ln, Springfield, IL 62704\nReport: 40123456";
        assert_eq!(
            extract_address(text).as_deref(),
            Some("1234 Maple Grove Ln, Springfield, IL 62704")
        );
    }

    #[test]
    fn test_extract_address_zip_plus_four() {
        let text = "88 Harbor View Drive, San Diego, CA 92101-1234";
        assert_eq!(
            extract_address(text).as_deref(),
            Some("88 Harbor View Drive, San Diego, CA 92101-1234")
        );
    }

    #[test]
    fn test_address_without_state_and_postal_is_absent() {
        assert_eq!(extract_address("1234 Maple Grove Ln, Springfield"), None);
        assert_eq!(extract_address("1234 Maple Grove Ln, Springfield, IL"), None);
    }

    #[test]
    fn test_address_requires_uppercase_state() {
        assert_eq!(extract_address("12 Oak St, Dover, de 19901"), None);
    }

    #[test]
    fn test_address_requires_known_suffix() {
        assert_eq!(extract_address("12 Oak Trail, Dover, DE 19901"), None);
    }

    #[test]
    fn test_parse_report_info() {
        let text = "Report: 40123456\n03/14/2024\nContact: Jane Roofer     Page 1\nCompany: Acme Roofing LLC";
        let info = parse_report_info(text);
        assert_eq!(info.report_number.as_deref(), Some("40123456"));
        assert_eq!(info.report_date.as_deref(), Some("03/14/2024"));
        assert_eq!(info.prepared_for_contact.as_deref(), Some("Jane Roofer"));
        assert_eq!(info.prepared_for_company.as_deref(), Some("Acme Roofing LLC"));
    }

    #[test]
    fn test_short_report_number_ignored() {
        assert_eq!(parse_report_info("Report: 123").report_number, None);
    }

    #[test]
    fn test_parse_property() {
        let p = parse_property("9 Elm Ct, Reno, NV 89501\nLatitude = 39.5\nLongitude = -119.8");
        assert_eq!(p.address.as_deref(), Some("9 Elm Ct, Reno, NV 89501"));
        assert_eq!(p.latitude, Some(39.5));
        assert_eq!(p.longitude, Some(-119.8));
    }
}
