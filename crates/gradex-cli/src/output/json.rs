use gradex_core::error::ExtractionError;
use gradex_core::model::ParsedTranscript;
use gradex_core::trace::TraceBundle;

/// Pretty JSON for a transcript, with the pipeline trace under `"trace"`
/// when one was collected.
pub fn render(
    transcript: &ParsedTranscript,
    trace: Option<&TraceBundle>,
) -> Result<String, ExtractionError> {
    let mut value = serde_json::to_value(transcript)?;
    if let (Some(trace), Some(obj)) = (trace, value.as_object_mut()) {
        obj.insert("trace".into(), serde_json::to_value(trace)?);
    }
    Ok(serde_json::to_string_pretty(&value)?)
}
