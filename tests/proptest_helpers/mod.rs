#![allow(dead_code)]

use labelflat::record::{Document, ImageRecord, Record};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use serde_json::{json, Map, Value};

/// Field names a generated label may carry besides the label columns.
pub const EXTRA_LABEL_FIELDS: [&str; 4] = ["id", "z_index", "color", "occluded"];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

fn arb_scalar() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1000i64..1000).prop_map(Value::from),
        "[a-z]{1,8}".prop_map(Value::from),
    ]
    .boxed()
}

fn arb_class_name() -> BoxedStrategy<String> {
    prop_oneof![
        Just("Bird".to_string()),
        Just("Fox".to_string()),
        Just("Deer".to_string()),
    ]
    .boxed()
}

fn arb_bbox() -> BoxedStrategy<Value> {
    proptest::collection::vec(0i64..2000, 4)
        .prop_map(|coords| json!(coords))
        .boxed()
}

/// A label with optional attributes, an optional individual field and any
/// subset of [`EXTRA_LABEL_FIELDS`].
pub fn arb_label() -> BoxedStrategy<Value> {
    (
        arb_class_name(),
        arb_bbox(),
        proptest::option::of("[MF]"),
        proptest::option::of(prop_oneof![Just("left"), Just("right")]),
        proptest::option::of("[A-Z][0-9]{2}"),
        proptest::collection::vec(arb_scalar(), EXTRA_LABEL_FIELDS.len()),
        proptest::collection::vec(any::<bool>(), EXTRA_LABEL_FIELDS.len()),
    )
        .prop_map(|(class_name, bbox, sex, foot, individual, extras, present)| {
            let mut label = Map::new();
            label.insert("class_name".into(), Value::from(class_name.clone()));
            label.insert("bbox".into(), bbox);

            for ((name, value), keep) in EXTRA_LABEL_FIELDS.iter().zip(extras).zip(present) {
                if keep {
                    label.insert(name.to_string(), value);
                }
            }

            let mut attributes = Map::new();
            if let Some(sex) = sex {
                attributes.insert("sex".into(), Value::from(sex));
            }
            if let Some(foot) = foot {
                attributes.insert("foot".into(), Value::from(foot));
            }
            label.insert("attributes".into(), Value::Object(attributes));

            if let Some(individual) = individual {
                label.insert(
                    format!("{class_name} - Individual"),
                    Value::from(individual),
                );
            }

            Value::Object(label)
        })
        .boxed()
}

/// An image with a valid `dataset_name`, tags, pass-through fields and
/// between zero and `max_labels` labels. `labels` is sometimes omitted.
pub fn arb_image(max_labels: usize) -> BoxedStrategy<ImageRecord> {
    (
        "[a-z]{1,6}",
        0u32..10_000,
        any::<bool>(),
        proptest::collection::vec(arb_label(), 0..=max_labels),
        0u32..4000,
    )
        .prop_map(|(prefix, rating, omit_labels, labels, width)| {
            let mut image = Record::new();
            image.insert("image_name".into(), Value::from(format!("{prefix}.jpg")));
            image.insert(
                "dataset_name".into(),
                Value::from(format!("{prefix}_{rating}")),
            );
            image.insert("width".into(), Value::from(width));
            image.insert("tags".into(), json!(["generated"]));
            if !(omit_labels && labels.is_empty()) {
                image.insert("labels".into(), Value::Array(labels));
            }
            ImageRecord::new(image)
        })
        .boxed()
}

pub fn arb_document(max_images: usize, max_labels: usize) -> BoxedStrategy<Document> {
    proptest::collection::vec(arb_image(max_labels), 0..=max_images)
        .prop_map(|images| Document { images })
        .boxed()
}

/// Number of labels an image carries (0 when `labels` is absent).
pub fn label_count(image: &ImageRecord) -> usize {
    image
        .labels()
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Rows the transformer must emit for `document`.
pub fn expected_row_count(document: &Document) -> usize {
    document
        .images
        .iter()
        .map(|image| label_count(image).max(1))
        .sum()
}
