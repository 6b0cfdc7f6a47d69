//! Integration tests: building objects from raw input through schemas,
//! including nested sub-objects, references to constructed objects, NOW
//! consistency, and sharing schemas across threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use stix_core::{ObjectError, PropertyError, StixObject, Value};
use stix_properties::{ElementKind, ObjectSchema, Property};

/// Turn a JSON object literal into keyword-style fields.
fn fields(json: serde_json::Value) -> BTreeMap<String, Value> {
    match Value::from(json) {
        Value::Map(map) => map,
        other => panic!("expected a JSON object, got {}", other.kind_name()),
    }
}

fn kill_chain_phase() -> Arc<ObjectSchema> {
    Arc::new(
        ObjectSchema::new("kill-chain-phase")
            .property("kill_chain_name", Property::string().required())
            .property("phase_name", Property::string().required()),
    )
}

fn malware_schema() -> ObjectSchema {
    ObjectSchema::with_core_properties("malware")
        .property("name", Property::string().required())
        .property("labels", Property::list(ElementKind::string()).required())
        .property("kill_chain_phases", Property::list(kill_chain_phase()))
        .property("created_by_ref", Property::reference_to("identity"))
        .property("revoked", Property::boolean())
}

fn identity_schema() -> ObjectSchema {
    ObjectSchema::with_core_properties("identity")
        .property("name", Property::string().required())
        .property("identity_class", Property::string().required())
}

fn relationship_schema() -> ObjectSchema {
    ObjectSchema::with_core_properties("relationship")
        .property("relationship_type", Property::string().required())
        .property("source_ref", Property::reference().required())
        .property("target_ref", Property::reference().required())
}

#[test]
fn builds_malware_from_json() {
    let malware = malware_schema()
        .construct(fields(json!({
            "name": "Cryptolocker",
            "labels": ["ransomware"],
            "revoked": "false",
            "created": "2016-04-06T20:03:00.000Z",
            "modified": "2016-04-06T20:03:00.000Z",
        })))
        .unwrap();

    assert_eq!(malware.get("revoked"), Some(&Value::Bool(false)));
    assert_eq!(malware.get("labels"), Some(&Value::from(vec!["ransomware"])));
    assert_eq!(
        malware.get("created").unwrap().to_string(),
        "2016-04-06T20:03:00Z"
    );

    let out = serde_json::to_value(Value::Object(malware)).unwrap();
    assert_eq!(out["type"], "malware");
    assert_eq!(out["name"], "Cryptolocker");
}

#[test]
fn nested_sub_objects_from_mappings() {
    let malware = malware_schema()
        .construct(fields(json!({
            "name": "Poison Ivy",
            "labels": ["remote-access-trojan"],
            "kill_chain_phases": [
                {"kill_chain_name": "lockheed-martin-cyber-kill-chain", "phase_name": "reconnaissance"}
            ],
        })))
        .unwrap();

    let Some(Value::List(phases)) = malware.get("kill_chain_phases") else {
        panic!("kill_chain_phases should be a list");
    };
    let phase = phases[0].as_object().unwrap();
    assert_eq!(phase.type_name(), "kill-chain-phase");
    assert_eq!(phase.get("phase_name"), Some(&Value::from("reconnaissance")));
}

#[test]
fn nested_sub_object_errors_surface() {
    let err = malware_schema()
        .construct(fields(json!({
            "name": "Poison Ivy",
            "labels": ["remote-access-trojan"],
            "kill_chain_phases": [{"kill_chain_name": "lockheed-martin-cyber-kill-chain"}],
        })))
        .unwrap_err();

    let ObjectError::InvalidProperty { property, source, .. } = err else {
        panic!("expected an invalid property error");
    };
    assert_eq!(property, "kill_chain_phases");
    assert_eq!(
        source,
        PropertyError::NestedObject(Box::new(ObjectError::MissingRequired {
            object_type: "kill-chain-phase".into(),
            property: "phase_name".into(),
        }))
    );
}

#[test]
fn constructed_sub_objects_pass_through_when_types_match() {
    let phase = kill_chain_phase()
        .construct(fields(json!({"kill_chain_name": "k", "phase_name": "p"})))
        .unwrap();
    let list = Property::list(kill_chain_phase());
    assert_eq!(
        list.validate(Value::List(vec![Value::Object(phase.clone())]))
            .unwrap(),
        Value::List(vec![Value::Object(phase)])
    );

    let stranger = StixObject::new("campaign", BTreeMap::new());
    assert!(matches!(
        list.validate(Value::List(vec![Value::Object(stranger)])),
        Err(PropertyError::NestedObject(_))
    ));
}

#[test]
fn references_accept_constructed_objects() {
    let identity = identity_schema()
        .construct(fields(json!({"name": "ACME", "identity_class": "organization"})))
        .unwrap();
    let identity_id = identity.id().unwrap().to_string();

    let mut input = fields(json!({"name": "x", "labels": ["worm"]}));
    input.insert("created_by_ref".into(), Value::Object(identity));
    let malware = malware_schema().construct(input).unwrap();
    assert_eq!(
        malware.get("created_by_ref"),
        Some(&Value::from(identity_id.as_str()))
    );

    let mut rel = BTreeMap::new();
    rel.insert("relationship_type".to_string(), Value::from("attributed-to"));
    rel.insert("source_ref".to_string(), Value::Object(malware.clone()));
    rel.insert("target_ref".to_string(), Value::from(identity_id.as_str()));
    let relationship = relationship_schema().construct(rel).unwrap();
    assert_eq!(
        relationship.get("source_ref").and_then(Value::as_str),
        malware.id()
    );
}

#[test]
fn reference_to_wrong_type_is_rejected() {
    let other = malware_schema()
        .construct(fields(json!({"name": "x", "labels": ["worm"]})))
        .unwrap();
    let mut input = fields(json!({"name": "y", "labels": ["worm"]}));
    input.insert("created_by_ref".into(), Value::Object(other));
    let err = malware_schema().construct(input).unwrap_err();
    assert!(err.to_string().contains("must start with 'identity--'."));
}

#[test]
fn now_defaults_are_identical_within_one_construction() {
    let schema = malware_schema();
    for _ in 0..32 {
        let obj = schema
            .construct(fields(json!({"name": "x", "labels": ["worm"]})))
            .unwrap();
        assert_eq!(obj.get("created"), obj.get("modified"));
    }
}

#[test]
fn copying_an_object_reproduces_it() {
    let schema = malware_schema();
    let original = schema
        .construct(fields(json!({"name": "x", "labels": ["worm"], "revoked": true})))
        .unwrap();
    let copy = schema.construct(original.fields().clone()).unwrap();
    assert_eq!(copy, original);
}

#[test]
fn schemas_are_shareable_across_threads() {
    let schema = Arc::new(malware_schema());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || {
                schema
                    .construct(fields(json!({"name": format!("m{i}"), "labels": ["worm"]})))
                    .map(|obj| obj.id().map(str::to_string))
            })
        })
        .collect();

    let mut ids: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}
