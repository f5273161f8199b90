//! Property-based tests for the tabular frame using proptest.

use proptest::prelude::*;
use serde_json::json;

use irisflow_core::Frame;

fn value_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        (-1000i64..1000).prop_map(|n| json!(n)),
        (-1000.0f64..1000.0).prop_map(|f| json!(f)),
        "[a-z]{1,8}".prop_map(|s| json!(s)),
    ]
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (1usize..=4).prop_flat_map(|n_cols| {
        prop::collection::vec(prop::collection::vec(value_strategy(), n_cols), 0..30).prop_map(
            move |rows| {
                let columns: Vec<String> = (0..n_cols).map(|i| format!("c{i}")).collect();
                Frame::new(columns, rows).unwrap()
            },
        )
    })
}

/// A frame plus an arbitrary subset of its column names.
fn frame_and_subset() -> impl Strategy<Value = (Frame, Vec<String>)> {
    (1usize..=4).prop_flat_map(|n_cols| {
        (
            prop::collection::vec(prop::collection::vec(value_strategy(), n_cols), 0..30),
            prop::collection::vec(any::<bool>(), n_cols),
        )
            .prop_map(move |(rows, mask)| {
                let columns: Vec<String> = (0..n_cols).map(|i| format!("c{i}")).collect();
                let named = columns
                    .iter()
                    .zip(&mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(c, _)| c.clone())
                    .collect();
                (Frame::new(columns, rows).unwrap(), named)
            })
    })
}

// --- drop_null_rows properties ---

proptest! {
    #[test]
    fn dropna_leaves_no_nulls_in_named_columns((frame, named) in frame_and_subset()) {
        let cleaned = frame.drop_null_rows(&named).unwrap();
        for name in &named {
            let idx = cleaned.column_index(name).unwrap();
            for row in cleaned.rows() {
                prop_assert!(!row[idx].is_null());
            }
        }
    }

    #[test]
    fn dropna_never_grows_the_frame((frame, named) in frame_and_subset()) {
        let cleaned = frame.drop_null_rows(&named).unwrap();
        prop_assert!(cleaned.n_rows() <= frame.n_rows());
        prop_assert_eq!(cleaned.columns(), frame.columns());
    }

    #[test]
    fn dropna_keeps_exactly_the_complete_rows((frame, named) in frame_and_subset()) {
        let indices: Vec<usize> = named
            .iter()
            .map(|name| frame.column_index(name).unwrap())
            .collect();
        let expected: Vec<_> = frame
            .rows()
            .iter()
            .filter(|row| indices.iter().all(|&i| !row[i].is_null()))
            .cloned()
            .collect();
        let cleaned = frame.drop_null_rows(&named).unwrap();
        prop_assert_eq!(cleaned.rows(), &expected[..]);
    }

    #[test]
    fn dropna_with_no_columns_is_identity(frame in frame_strategy()) {
        let cleaned = frame.drop_null_rows(&[]).unwrap();
        prop_assert_eq!(cleaned, frame);
    }
}

// --- CSV codec properties ---

proptest! {
    #[test]
    fn csv_round_trip_preserves_frame(frame in frame_strategy()) {
        let text = frame.to_csv();
        let back = Frame::from_csv(&text).unwrap();
        prop_assert_eq!(back, frame);
    }
}

// --- Feature/target split properties ---

proptest! {
    #[test]
    fn split_shapes_are_consistent(
        rows in prop::collection::vec(
            (prop::collection::vec(-100.0f64..100.0, 3), 0i64..3),
            1..40,
        )
    ) {
        let columns = vec![
            "f0".to_string(),
            "f1".to_string(),
            "label".to_string(),
            "f2".to_string(),
        ];
        let data: Vec<Vec<serde_json::Value>> = rows
            .iter()
            .map(|(features, label)| {
                vec![
                    json!(features[0]),
                    json!(features[1]),
                    json!(label),
                    json!(features[2]),
                ]
            })
            .collect();
        let frame = Frame::new(columns, data).unwrap();
        let (x, y) = frame.split_features_target("label").unwrap();
        prop_assert_eq!(x.nrows(), rows.len());
        prop_assert_eq!(x.ncols(), 3);
        prop_assert_eq!(y.len(), rows.len());
        for (label, (_, expected)) in y.iter().zip(&rows) {
            prop_assert_eq!(label, expected);
        }
    }
}
