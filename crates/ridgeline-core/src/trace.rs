use serde::{Deserialize, Serialize};

use crate::model::Report;
use crate::parsing::waste::{Strategy, WasteDecision};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Important,
    Info,
}

/// Which waste table a decision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceScope {
    Document,
    Structure { number: u32 },
}

impl std::fmt::Display for TraceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceScope::Document => write!(f, "document"),
            TraceScope::Structure { number } => write!(f, "structure {number}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDecision {
    pub decision_id: String,
    pub scope: TraceScope,
    pub columns: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_percent: Option<u32>,
    pub reason: String,
    pub severity: TraceSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<TraceScope>,
    pub message: String,
    pub severity: TraceSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    pub decisions: Vec<TraceDecision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
}

impl Default for TraceBundle {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            decisions: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl TraceBundle {
    /// The decision recorded for `scope`, if its waste table was traced.
    pub fn decision(&self, scope: TraceScope) -> Option<&TraceDecision> {
        self.decisions.iter().find(|d| d.scope == scope)
    }
}

pub fn build_waste_decision(scope: TraceScope, decision: &WasteDecision) -> TraceDecision {
    let decision_id = match scope {
        TraceScope::Document => "dec_waste_document".to_string(),
        TraceScope::Structure { number } => format!("dec_waste_structure_{number}"),
    };

    let (reason, severity) = match (decision.strategy, decision.suggested_percent) {
        _ if decision.columns == 0 => ("no waste table found".to_string(), TraceSeverity::Info),
        (Some(strategy), Some(percent)) => {
            let how = match strategy {
                Strategy::Geometry => "percent header printed above \"Suggested\"",
                Strategy::TextAdjacency => "percent nearest to \"Suggested\" in table text",
                Strategy::Heuristic => "estimated from the roof's pitch mix",
            };
            let severity = if strategy == Strategy::Heuristic {
                TraceSeverity::Important
            } else {
                TraceSeverity::Info
            };
            (format!("suggested {percent}%: {how}"), severity)
        }
        _ => (
            format!("none of {} columns could be confirmed", decision.columns),
            TraceSeverity::Important,
        ),
    };

    TraceDecision {
        decision_id,
        scope,
        columns: decision.columns,
        strategy: decision.strategy,
        suggested_percent: decision.suggested_percent,
        reason,
        severity,
    }
}

/// Warnings for sections a complete report is expected to carry.
pub fn build_warnings(report: &Report) -> Vec<TraceWarning> {
    let mut warnings = Vec::new();
    let mut warn = |scope: Option<TraceScope>, message: String| {
        warnings.push(TraceWarning {
            scope,
            message,
            severity: TraceSeverity::Important,
        })
    };

    if report.property.address.is_none() {
        warn(None, "property address not found".into());
    }
    if report.roof_measurements.total_area_sqft == 0.0 {
        warn(Some(TraceScope::Document), "total roof area not found".into());
    }
    if report.pitch_breakdown.is_empty() {
        warn(Some(TraceScope::Document), "pitch table not found".into());
    }
    if report.all_waste_calculations.is_empty() {
        warn(Some(TraceScope::Document), "waste table not found".into());
    }
    for s in &report.structures {
        if s.pitch_breakdown.is_empty() {
            warn(
                Some(TraceScope::Structure {
                    number: s.structure_number,
                }),
                format!("structure {} has no pitch table", s.structure_number),
            );
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_reasons() {
        let empty = build_waste_decision(TraceScope::Document, &WasteDecision::default());
        assert_eq!(empty.reason, "no waste table found");
        assert_eq!(empty.decision_id, "dec_waste_document");

        let heuristic = build_waste_decision(
            TraceScope::Structure { number: 2 },
            &WasteDecision {
                columns: 9,
                strategy: Some(Strategy::Heuristic),
                suggested_percent: Some(13),
            },
        );
        assert_eq!(heuristic.decision_id, "dec_waste_structure_2");
        assert_eq!(heuristic.severity, TraceSeverity::Important);
        assert!(heuristic.reason.starts_with("suggested 13%"));
    }

    #[test]
    fn test_scope_serialization() {
        let json = serde_json::to_string(&TraceScope::Structure { number: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"structure","number":3}"#);
        assert_eq!(TraceScope::Document.to_string(), "document");
    }
}
