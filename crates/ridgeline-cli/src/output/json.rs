use ridgeline_core::envelope::Envelope;
use ridgeline_core::error::RidgelineError;
use ridgeline_core::ParsedReport;
use serde_json::Value;

/// The report alone, or the report with its decision trace.
fn to_value(parsed: &ParsedReport, with_trace: bool) -> Result<Value, RidgelineError> {
    let value = if with_trace {
        serde_json::to_value(parsed)?
    } else {
        serde_json::to_value(&parsed.report)?
    };
    Ok(value)
}

pub fn render(parsed: &ParsedReport, with_trace: bool) -> Result<String, RidgelineError> {
    Ok(serde_json::to_string_pretty(&to_value(parsed, with_trace)?)?)
}

pub fn print(parsed: &ParsedReport, with_trace: bool) -> Result<(), RidgelineError> {
    println!("{}", render(parsed, with_trace)?);
    Ok(())
}

pub fn print_envelope(
    result: Result<ParsedReport, RidgelineError>,
    with_trace: bool,
) -> Result<(), RidgelineError> {
    let envelope = Envelope::from(result.and_then(|parsed| to_value(&parsed, with_trace)));
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if let Some(error) = &envelope.error {
        tracing::debug!(status = envelope.status(), error = %error, "parse failed");
    }
    Ok(())
}
