//! Deckhand core types: command/validate results and the object records they carry.
//!
//! Records are produced by a deployment or validation run and handed to the output
//! pipeline as-is. Serialization is compact: empty lists, false flags and absent
//! optionals are omitted and restored from defaults on the way back in.

#![forbid(unsafe_code)]

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod compact;
pub mod redact;

pub use compact::{CompactedCommandResult, ResultSummary};
pub use redact::{Obfuscator, RedactionGate, Redacted};

/// Warning text appended when the cluster identity could not be determined.
pub const MISSING_CLUSTER_ID_WARNING: &str = "failed to determine cluster ID due to missing get/list permissions for the kube-system namespace. This might result in follow up issues in regard to cluster differentiation stored command results";

fn is_false(b: &bool) -> bool { !*b }

/// Identity of a Kubernetes-style object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ObjectRef {
    pub fn new(group: &str, version: &str, kind: &str, namespace: Option<&str>, name: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.unwrap_or_default().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.version.is_empty() && self.kind.is_empty() && self.name.is_empty() && self.namespace.is_empty()
    }

    /// Core-group kinds (`v1/Secret`) have an empty group.
    pub fn is_core_kind(&self, kind: &str) -> bool {
        self.group.is_empty() && self.kind == kind
    }
}

impl fmt::Display for ObjectRef {
    /// `Kind[.group]/name`, prefixed with `namespace/` for namespaced objects.
    /// An empty reference renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() { return Ok(()); }
        if !self.namespace.is_empty() { write!(f, "{}/", self.namespace)?; }
        if self.group.is_empty() { write!(f, "{}/{}", self.kind, self.name) } else { write!(f, "{}.{}/{}", self.kind, self.group, self.name) }
    }
}

/// One changed field of an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub json_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unified_diff: String,
}

impl Change {
    pub fn new(json_path: impl Into<String>, unified_diff: impl Into<String>) -> Self {
        Self { json_path: json_path.into(), unified_diff: unified_diff.into() }
    }
}

/// Per-object outcome of a run. Flags are independent and may co-occur.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultObject {
    #[serde(rename = "ref")]
    pub object_ref: ObjectRef,
    #[serde(default, skip_serializing_if = "is_false")]
    pub new: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub orphan: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hook: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<Change>,
}

impl ResultObject {
    pub fn new(object_ref: ObjectRef) -> Self {
        Self { object_ref, ..Default::default() }
    }

    /// An object counts as changed exactly when it carries at least one change.
    pub fn is_changed(&self) -> bool { !self.changes.is_empty() }
}

/// A warning or error, optionally attached to an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentError {
    #[serde(rename = "ref", default, skip_serializing_if = "ObjectRef::is_empty")]
    pub object_ref: ObjectRef,
    pub message: String,
}

impl DeploymentError {
    pub fn new(object_ref: ObjectRef, message: impl Into<String>) -> Self {
        Self { object_ref, message: message.into() }
    }

    /// Diagnostic without object context.
    pub fn message(message: impl Into<String>) -> Self {
        Self { object_ref: ObjectRef::default(), message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandInitiator {
    #[default]
    CommandLine,
    Api,
    Webhook,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandInfo {
    #[serde(default)]
    pub initiator: CommandInitiator,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    #[serde(default)]
    pub cluster_id: String,
}

/// Structured outcome of one deployment command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub command: CommandInfo,
    #[serde(default)]
    pub cluster_info: ClusterInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ResultObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DeploymentError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DeploymentError>,
}

impl CommandResult {
    pub fn has_cluster_id(&self) -> bool { !self.cluster_info.cluster_id.is_empty() }

    /// View used for structured output and storage.
    pub fn to_compacted(&self) -> CompactedCommandResult<'_> { CompactedCommandResult::new(self) }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResultEntry {
    #[serde(rename = "ref")]
    pub object_ref: ObjectRef,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub annotation: String,
    pub message: String,
}

/// Structured outcome of one validation command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DeploymentError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DeploymentError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ValidateResultEntry>,
}

pub mod prelude {
    pub use super::{Obfuscator, Redacted, RedactionGate};
    pub use super::{Change, ClusterInfo, CommandInfo, CommandInitiator, CommandResult, DeploymentError, ObjectRef, ResultObject, ValidateResult, ValidateResultEntry};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ref_display_variants() {
        assert_eq!(ObjectRef::default().to_string(), "");
        assert_eq!(ObjectRef::new("", "v1", "ConfigMap", Some("ns"), "cm").to_string(), "ns/ConfigMap/cm");
        assert_eq!(ObjectRef::new("", "v1", "Namespace", None, "ns").to_string(), "Namespace/ns");
        assert_eq!(ObjectRef::new("apps", "v1", "Deployment", Some("ns"), "web").to_string(), "ns/Deployment.apps/web");
    }

    #[test]
    fn changed_follows_change_list() {
        let mut o = ResultObject::new(ObjectRef::new("", "v1", "ConfigMap", Some("ns"), "cm"));
        assert!(!o.is_changed());
        o.changes.push(Change::new("data.k", "-a\n+b"));
        assert!(o.is_changed());
    }

    #[test]
    fn serialization_omits_defaults() {
        let mut o = ResultObject::new(ObjectRef::new("", "v1", "ConfigMap", Some("ns"), "cm"));
        o.hook = true;
        let v = serde_json::to_value(&o).unwrap();
        let obj = v.as_object().unwrap();
        assert!(obj.contains_key("hook"));
        assert!(!obj.contains_key("new"));
        assert!(!obj.contains_key("changes"));
        let back: ResultObject = serde_json::from_value(v).unwrap();
        assert_eq!(back, o);
    }

    #[test]
    fn error_without_ref_roundtrips() {
        let e = DeploymentError::message("boom");
        let v = serde_json::to_value(&e).unwrap();
        assert!(v.get("ref").is_none());
        let back: DeploymentError = serde_json::from_value(v).unwrap();
        assert_eq!(back, e);
    }
}
