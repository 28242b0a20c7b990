use schema_grouper_core::analysis::{
    compute_similarity, group_by_exact_match, group_by_similarity, jaccard, Groups,
};
use schema_grouper_core::{Error, FileSchema};

fn schema(path: &str, headers: &[&str]) -> FileSchema {
    FileSchema::from_headers(path, headers.to_vec())
}

fn partition(groups: &Groups) -> Vec<Vec<String>> {
    groups.values().map(|g| g.file_paths()).collect()
}

fn mixed_inputs() -> Vec<FileSchema> {
    vec![
        schema("/data/a.csv", &["id", "name", "value"]),
        schema("/data/b.csv", &["value", "id", "name"]),
        schema("/data/c.csv", &["timestamp", "temp", "humidity"]),
        schema("/data/d.csv", &["id", "name", "value", "extra"]),
        schema("/data/e.csv", &["humidity", "timestamp", "temp"]),
        schema("/data/f.csv", &["Id", "Name", "Value"]),
    ]
}

#[test]
fn test_same_headers_different_order_similarity_is_one() {
    let a = schema("/a.csv", &["name", "age", "city"]);
    let b = schema("/b.csv", &["city", "name", "age"]);
    assert_eq!(compute_similarity(&a, &b), 1.0);

    let exact = group_by_exact_match(&[a.clone(), b.clone()]);
    assert_eq!(exact.len(), 1);
    assert_eq!(exact["group_1"].file_paths(), vec!["/a.csv", "/b.csv"]);

    let similar = group_by_similarity(&[a, b], 0.8).unwrap();
    assert_eq!(similar.len(), 1);
}

#[test]
fn test_subset_similarity_and_threshold_boundary() {
    let a = schema("/a.csv", &["a", "b", "c", "d", "e", "f", "g", "h"]);
    let b = schema("/b.csv", &["a", "b", "c", "d", "e"]);
    assert_eq!(compute_similarity(&a, &b), 0.625);

    let together = group_by_similarity(&[a.clone(), b.clone()], 0.625).unwrap();
    assert_eq!(together.len(), 1);

    let lower = group_by_similarity(&[a.clone(), b.clone()], 0.5).unwrap();
    assert_eq!(lower.len(), 1);

    let apart = group_by_similarity(&[a, b], 0.63).unwrap();
    assert_eq!(apart.len(), 2);
}

#[test]
fn test_similarity_is_symmetric_over_inputs() {
    let inputs = mixed_inputs();
    for a in &inputs {
        assert_eq!(compute_similarity(a, a), 1.0);
        for b in &inputs {
            assert_eq!(compute_similarity(a, b), compute_similarity(b, a));
        }
    }
}

#[test]
fn test_empty_header_sets_are_identical() {
    let a = FileSchema::from_headers("/a.csv", Vec::<&str>::new());
    let b = FileSchema::from_headers("/b.csv", Vec::<&str>::new());
    let c = schema("/c.csv", &["x"]);
    assert_eq!(compute_similarity(&a, &b), 1.0);
    assert_eq!(compute_similarity(&a, &c), 0.0);
    assert_eq!(jaccard(&a.header_set(), &b.header_set()), 1.0);
    assert_eq!(group_by_exact_match(&[a, b, c]).len(), 2);
}

#[test]
fn test_exact_match_is_a_partition() {
    let inputs = mixed_inputs();
    let groups = group_by_exact_match(&inputs);

    let mut all_paths: Vec<String> = groups.values().flat_map(|g| g.file_paths()).collect();
    all_paths.sort();
    let mut expected: Vec<String> = inputs.iter().map(|s| s.path.clone()).collect();
    expected.sort();
    assert_eq!(all_paths, expected);

    for group in groups.values() {
        assert_eq!(group.similarity_threshold, 1.0);
        let anchor = group.members[0].header_set();
        for member in &group.members {
            assert_eq!(member.header_set(), anchor);
        }
    }

    // Members of different groups never share a header set.
    let anchors: Vec<_> = groups.values().map(|g| g.members[0].header_set()).collect();
    for i in 0..anchors.len() {
        for j in (i + 1)..anchors.len() {
            assert_ne!(anchors[i], anchors[j]);
        }
    }
}

#[test]
fn test_exact_match_names_follow_first_encounter() {
    let groups = group_by_exact_match(&mixed_inputs());
    let names: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["group_1", "group_2", "group_3", "group_4"]);
    assert_eq!(
        partition(&groups),
        vec![
            vec!["/data/a.csv".to_string(), "/data/b.csv".to_string()],
            vec!["/data/c.csv".to_string(), "/data/e.csv".to_string()],
            vec!["/data/d.csv".to_string()],
            vec!["/data/f.csv".to_string()],
        ]
    );
    assert_eq!(groups["group_2"].canonical_headers, vec!["timestamp", "temp", "humidity"]);
}

#[test]
fn test_threshold_one_matches_exact_partition() {
    let inputs = mixed_inputs();
    let exact = group_by_exact_match(&inputs);
    let similar = group_by_similarity(&inputs, 1.0).unwrap();
    assert_eq!(partition(&exact), partition(&similar));
    assert_eq!(
        exact.keys().collect::<Vec<_>>(),
        similar.keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_similarity_merges_superset_into_first_group() {
    // d has 3 of 4 fields in common with a: similarity 0.75.
    let groups = group_by_similarity(&mixed_inputs(), 0.75).unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(
        groups["group_1"].file_paths(),
        vec!["/data/a.csv", "/data/b.csv", "/data/d.csv"]
    );
    assert_eq!(groups["group_1"].similarity_threshold, 0.75);
}

#[test]
fn test_similarity_compares_against_canonical_headers_only() {
    // c is 0.75 similar to b but only 0.5 to the group anchor a.
    let a = schema("/a.csv", &["w", "x", "y"]);
    let b = schema("/b.csv", &["w", "x", "y", "z"]);
    let c = schema("/c.csv", &["x", "y", "z"]);
    let groups = group_by_similarity(&[a, b, c], 0.7).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["group_1"].file_paths(), vec!["/a.csv", "/b.csv"]);
    assert_eq!(groups["group_2"].file_paths(), vec!["/c.csv"]);
}

#[test]
fn test_similarity_ties_go_to_first_created_group() {
    let a = schema("/a.csv", &["p", "q"]);
    let b = schema("/b.csv", &["r", "s"]);
    let c = schema("/c.csv", &["p", "q", "r", "s"]);
    let groups = group_by_similarity(&[a, b, c], 0.5).unwrap();
    assert_eq!(groups["group_1"].file_paths(), vec!["/a.csv", "/c.csv"]);
    assert_eq!(groups["group_2"].file_paths(), vec!["/b.csv"]);
}

#[test]
fn test_grouping_depends_on_input_order() {
    let a = schema("/a.csv", &["w", "x", "y"]);
    let b = schema("/b.csv", &["w", "x", "y", "z"]);
    let c = schema("/c.csv", &["x", "y", "z"]);
    let forward = group_by_similarity(&[a.clone(), b.clone(), c.clone()], 0.7).unwrap();
    let reversed = group_by_similarity(&[c, b, a], 0.7).unwrap();
    assert_eq!(forward["group_1"].file_paths(), vec!["/a.csv", "/b.csv"]);
    assert_eq!(reversed["group_1"].file_paths(), vec!["/c.csv", "/b.csv"]);
}

#[test]
fn test_threshold_zero_puts_everything_together() {
    let groups = group_by_similarity(&mixed_inputs(), 0.0).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups["group_1"].len(), 6);
}

#[test]
fn test_invalid_threshold_rejected() {
    let inputs = mixed_inputs();
    assert!(matches!(
        group_by_similarity(&inputs, 1.5),
        Err(Error::InvalidThreshold(t)) if t == 1.5
    ));
    assert!(matches!(
        group_by_similarity(&inputs, -0.1),
        Err(Error::InvalidThreshold(_))
    ));
}

#[test]
fn test_repeated_path_grouped_once() {
    let inputs = vec![
        schema("/a.csv", &["x", "y"]),
        schema("/a.csv", &["x", "y"]),
        schema("/b.csv", &["x", "y"]),
    ];
    let groups = group_by_exact_match(&inputs);
    assert_eq!(groups["group_1"].file_paths(), vec!["/a.csv", "/b.csv"]);
    let groups = group_by_similarity(&inputs, 0.9).unwrap();
    assert_eq!(groups["group_1"].file_paths(), vec!["/a.csv", "/b.csv"]);
}

#[test]
fn test_empty_input_yields_no_groups() {
    assert!(group_by_exact_match(&[]).is_empty());
    assert!(group_by_similarity(&[], 0.5).unwrap().is_empty());
}
