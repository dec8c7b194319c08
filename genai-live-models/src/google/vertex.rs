//! Vertex AI resource names.

/// Resolve a model name to a Vertex AI publisher model path.
///
/// - `gemini-2.0-flash` → `publishers/google/models/gemini-2.0-flash`
/// - `acme/model-x` → `publishers/acme/models/model-x`
/// - `publishers/…` and `projects/…` paths are kept as-is
#[must_use]
pub fn publisher_model_path(model: &str) -> String {
    if model.starts_with("publishers/") || model.starts_with("projects/") {
        return model.to_string();
    }
    match model.split_once('/') {
        Some((publisher, name)) => format!("publishers/{}/models/{}", publisher, name),
        None => format!("publishers/google/models/{}", model),
    }
}

/// Resolve a model name to the full resource path used in the setup frame.
///
/// Publisher paths are scoped to `projects/{project}/locations/{location}/`
/// when both are known.
#[must_use]
pub fn model_resource_name(model: &str, project: Option<&str>, location: Option<&str>) -> String {
    let path = publisher_model_path(model);
    match (project, location) {
        (Some(project), Some(location)) if path.starts_with("publishers/") => {
            format!("projects/{}/locations/{}/{}", project, location, path)
        }
        _ => path,
    }
}
