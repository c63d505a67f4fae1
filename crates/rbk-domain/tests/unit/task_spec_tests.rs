//! Task query text and shallow refinement merge.

use rbk_domain::entities::scaling::TaskSpec;
use serde_json::Value;

fn task_with_params(pairs: &[(&str, i64)]) -> TaskSpec {
    let mut parameters = serde_json::Map::new();
    for (key, value) in pairs {
        parameters.insert((*key).to_owned(), Value::from(*value));
    }
    TaskSpec {
        description: Some("rebuild the index".to_owned()),
        template_name: None,
        parameters,
    }
}

#[test]
fn query_text_prefers_description_over_template_name() {
    let task = TaskSpec {
        description: Some("rebuild the index".to_owned()),
        template_name: Some("index-template".to_owned()),
        parameters: serde_json::Map::new(),
    };
    assert_eq!(task.query_text(), "rebuild the index");

    let template_only = TaskSpec {
        description: None,
        template_name: Some("index-template".to_owned()),
        parameters: serde_json::Map::new(),
    };
    assert_eq!(template_only.query_text(), "index-template");
}

#[test]
fn query_text_is_canonical_over_parameter_order() {
    let ab = task_with_params(&[("alpha", 1), ("beta", 2)]);
    let ba = task_with_params(&[("beta", 2), ("alpha", 1)]);
    assert_eq!(ab.query_text(), ba.query_text());
    assert!(ab.query_text().contains("alpha"));
}

#[test]
fn merge_overrides_only_present_fields() {
    let base = task_with_params(&[("retries", 1)]);
    let refinement = TaskSpec {
        description: Some("rebuild the index with batching".to_owned()),
        template_name: None,
        parameters: serde_json::Map::new(),
    };

    let merged = base.merge(&refinement);
    assert_eq!(
        merged.description.as_deref(),
        Some("rebuild the index with batching")
    );
    // Empty refinement parameters leave the originals in place.
    assert_eq!(merged.parameters.get("retries"), Some(&Value::from(1)));
}

#[test]
fn merge_replaces_parameters_wholesale_when_present() {
    let base = task_with_params(&[("retries", 1), ("batch", 10)]);
    let refinement = task_with_params(&[("retries", 3)]);

    let merged = base.merge(&refinement);
    assert_eq!(merged.parameters.get("retries"), Some(&Value::from(3)));
    assert_eq!(merged.parameters.get("batch"), None, "shallow override, not a union");
}
