//! Script blocks consumed by the client-side loader.
//!
//! The first `facade` directive of a template emits the engine scripts and
//! the loader configuration; every `facade` directive emits an entry call.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::LOADER_GLOBAL;
use crate::core::FacadeError;

/// Payload of the `neuron.config(...)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderConfig {
    /// Where the loader fetches modules from: a protocol-relative host URL,
    /// or the template-relative module root.
    pub path: String,

    /// `name@version → {dependency → version}` for the whole lock graph.
    pub graph: BTreeMap<String, BTreeMap<String, String>>,

    /// CDN hosts, when sharding is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
}

/// `<script src="...">` for one engine.
#[must_use]
pub fn engine_script(url: &str) -> String {
    format!(r#"<script src="{}"></script>"#, url.replace('"', "&quot;"))
}

/// Loader configuration script.
///
/// # Errors
///
/// [`FacadeError::JsonError`] if the payload cannot be serialized.
pub fn config_script(config: &LoaderConfig) -> Result<String, FacadeError> {
    let json = script_json(config)?;
    Ok(format!("<script>{LOADER_GLOBAL}.config({json});</script>"))
}

/// Entry registration script for module `id`.
///
/// # Errors
///
/// [`FacadeError::JsonError`] if the payload cannot be serialized.
///
/// ```rust
/// use facade_cli::resolver::bootstrap::entry_script;
///
/// assert_eq!(
///     entry_script("app@0.2.0")?,
///     r#"<script>facade({"entry":"app@0.2.0"});</script>"#
/// );
/// # Ok::<(), facade_cli::core::FacadeError>(())
/// ```
pub fn entry_script(id: &str) -> Result<String, FacadeError> {
    let json = script_json(&serde_json::json!({ "entry": id }))?;
    Ok(format!("<script>facade({json});</script>"))
}

/// Serialize for inline embedding; `</` is escaped so no value can close the tag.
fn script_json(value: &impl Serialize) -> Result<String, FacadeError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
