#![forbid(unsafe_code)]

use chrono::{TimeZone, Utc};
use deckhand_core::prelude::*;
use deckhand_render::render_command_result;

fn sample() -> CommandResult {
    let mut changed = ResultObject::new(ObjectRef::new("apps", "v1", "Deployment", Some("web"), "frontend"));
    changed.hook = true;
    changed.changes.push(Change::new("spec.replicas", "-1\n+3"));
    changed.changes.push(Change::new("spec.template.metadata.labels[\"a=b\"]", "+x: \"quoted: value\"\n"));
    let mut created = ResultObject::new(ObjectRef::new("", "v1", "Namespace", None, "web"));
    created.new = true;
    let untouched = ResultObject::new(ObjectRef::new("", "v1", "ConfigMap", Some("web"), "plain"));

    CommandResult {
        id: "9f0c7a4e-2f7e-4a53-8f0d-7f3f2b0d1c11".into(),
        command: CommandInfo {
            initiator: CommandInitiator::CommandLine,
            command: "deploy".into(),
            target: Some("prod".into()),
            start_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            end_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 42).unwrap()),
        },
        cluster_info: ClusterInfo { cluster_id: "c-123".into() },
        objects: vec![changed, created, untouched],
        warnings: vec![DeploymentError::message("multi\nline warning")],
        errors: vec![DeploymentError::new(ObjectRef::new("", "v1", "Secret", Some("web"), "creds"), "apply failed")],
    }
}

#[test]
fn yaml_output_parses_back_to_equal_record() {
    let cr = RedactionGate::exempt(sample());
    let yaml = render_command_result(&cr, "yaml", false).unwrap();
    let back: CommandResult = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(&back, &*cr);
}

#[test]
fn minimal_record_roundtrips() {
    let cr = RedactionGate::exempt(CommandResult::default());
    let yaml = render_command_result(&cr, "yaml", true).unwrap();
    let back: CommandResult = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(&back, &*cr);
}

#[test]
fn yaml_carries_summary() {
    let cr = RedactionGate::exempt(sample());
    let yaml = render_command_result(&cr, "yaml", false).unwrap();
    let v: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(v["summary"]["changedObjects"].as_u64(), Some(1));
    assert_eq!(v["summary"]["totalObjects"].as_u64(), Some(3));
}

#[test]
fn edge_case_records_roundtrip() {
    let mut blank = ResultObject::new(ObjectRef::default());
    blank.orphan = true;
    blank.changes.push(Change::new("", ""));
    blank.changes.push(Change::new("data.flag", "-no\n+yes"));
    let mut odd = ResultObject::new(ObjectRef::new("", "v1", "ConfigMap", Some("null"), "~"));
    odd.deleted = true;
    odd.changes.push(Change::new("data.yes", "true"));

    let records = vec![
        CommandResult { objects: vec![blank.clone()], ..Default::default() },
        CommandResult {
            id: "null".into(),
            command: CommandInfo { command: "yes".into(), target: Some("~".into()), ..Default::default() },
            cluster_info: ClusterInfo { cluster_id: "123".into() },
            objects: vec![odd, blank],
            warnings: vec![DeploymentError::message(""), DeploymentError::message("- not: a list")],
            errors: vec![DeploymentError::new(ObjectRef::default(), "off")],
        },
    ];

    for record in records {
        let cr = RedactionGate::exempt(record);
        let yaml = render_command_result(&cr, "yaml", false).unwrap();
        let back: CommandResult = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(&back, &*cr, "yaml was:\n{}", yaml);
    }
}
