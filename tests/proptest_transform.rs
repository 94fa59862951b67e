use labelflat::transform::{transform_document, ExclusionSet, ProjectionMode, TransformOptions};
use proptest::prelude::*;
use serde_json::Value;

mod proptest_helpers;

use proptest_helpers::{arb_document, expected_row_count, label_count, EXTRA_LABEL_FIELDS};

fn arb_exclusions() -> impl Strategy<Value = ExclusionSet> {
    proptest::sample::subsequence(
        vec!["id", "z_index", "color", "occluded", "attributes", "bbox"],
        0..=4,
    )
    .prop_map(|names| names.into_iter().collect::<ExclusionSet>())
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn row_count_is_sum_of_labels_or_one(doc in arb_document(6, 5)) {
        let output = transform_document(&doc, &TransformOptions::default()).expect("transform");

        prop_assert_eq!(output.table.len(), expected_row_count(&doc));
        prop_assert_eq!(output.report.rows, output.table.len());
        prop_assert_eq!(
            output.report.labels + output.report.placeholder_rows,
            output.table.len()
        );
    }

    #[test]
    fn excluded_fields_never_become_columns(doc in arb_document(4, 4), exclude in arb_exclusions()) {
        let options = TransformOptions { exclude: exclude.clone(), ..Default::default() };
        let output = transform_document(&doc, &options).expect("transform");

        for name in exclude.iter().filter(|n| !labelflat::table::is_derived_column(n)) {
            prop_assert!(!output.table.columns().iter().any(|c| c == name));
            prop_assert!(!output.report.dropped_fields.contains_key(name));
        }
        if exclude.contains("attributes") {
            for row in output.table.rows() {
                prop_assert_eq!(&row.label.sex, &Value::Null);
                prop_assert_eq!(&row.label.foot, &Value::Null);
            }
        }
        if exclude.contains("bbox") {
            prop_assert!(output.table.rows().iter().all(|row| row.label.bbox.is_null()));
        }
    }

    #[test]
    fn rows_match_their_source_labels_in_order(doc in arb_document(5, 4)) {
        let output = transform_document(&doc, &TransformOptions::default()).expect("transform");
        let mut rows = output.table.rows().iter();

        for image in &doc.images {
            let expected_rating: i64 = image
                .dataset_name()
                .and_then(|name| name.rsplit('_').next())
                .and_then(|digits| digits.parse().ok())
                .expect("generated dataset_name ends in digits");

            if label_count(image) == 0 {
                let row = rows.next().expect("placeholder row");
                prop_assert!(row.label.is_null());
                prop_assert_eq!(row.image_rating, expected_rating);
                continue;
            }

            let labels = image.labels().and_then(Value::as_array).expect("labels array");
            for label in labels {
                let row = rows.next().expect("row for label");
                let class_name = label["class_name"].as_str().expect("class_name");

                prop_assert_eq!(&row.label.class_name, &label["class_name"]);
                prop_assert_eq!(&row.label.bbox, &label["bbox"]);
                prop_assert_eq!(&row.label.sex, &label["attributes"]["sex"]);
                prop_assert_eq!(&row.label.foot, &label["attributes"]["foot"]);
                prop_assert_eq!(
                    &row.label.individual,
                    &label[format!("{class_name} - Individual").as_str()]
                );
                prop_assert_eq!(row.image_rating, expected_rating);
                prop_assert_eq!(row.image.get("image_name"), image.get("image_name"));
                prop_assert!(row.image.get("tags").is_none());
                prop_assert!(row.image.get("labels").is_none());
            }
        }
        prop_assert!(rows.next().is_none());
    }

    #[test]
    fn permissive_drops_only_extra_fields(doc in arb_document(4, 4)) {
        let output = transform_document(&doc, &TransformOptions::default()).expect("transform");

        for name in output.report.dropped_fields.keys() {
            prop_assert!(EXTRA_LABEL_FIELDS.contains(&name.as_str()), "dropped {}", name);
        }
    }

    #[test]
    fn strict_accepts_once_extras_are_excluded(doc in arb_document(4, 4)) {
        let options = TransformOptions {
            exclude: EXTRA_LABEL_FIELDS.iter().copied().collect(),
            projection: ProjectionMode::Strict,
        };
        let strict = transform_document(&doc, &options).expect("strict transform");
        let permissive = transform_document(
            &doc,
            &TransformOptions { projection: ProjectionMode::Permissive, ..options.clone() },
        )
        .expect("permissive transform");

        prop_assert_eq!(strict.table, permissive.table);
        prop_assert!(strict.report.is_lossless());
    }
}
