use crate::validation::fragment_cycles::find_fragment_cycles;
use crate::validation::fragment_cycles::normalize_cycle;
use indexmap::IndexMap;

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Rotations of one cycle normalize to the same path.
#[test]
fn normalize_rotations() {
    let expected = strings(&["A", "B", "C", "A"]);
    assert_eq!(normalize_cycle(&strings(&["A", "B", "C", "A"])), expected);
    assert_eq!(normalize_cycle(&strings(&["B", "C", "A", "B"])), expected);
    assert_eq!(normalize_cycle(&strings(&["C", "A", "B", "C"])), expected);
}

/// A fragment spreading itself.
#[test]
fn self_cycle() {
    let graph = IndexMap::from([("A", vec!["A"])]);
    assert_eq!(find_fragment_cycles(&graph), vec![strings(&["A", "A"])]);
}

/// A three-fragment loop is found once, not once per member.
#[test]
fn three_fragment_cycle_reported_once() {
    let graph = IndexMap::from([("B", vec!["C"]), ("C", vec!["A"]), ("A", vec!["B"])]);
    assert_eq!(find_fragment_cycles(&graph), vec![strings(&["A", "B", "C", "A"])]);
}

/// Fragments leading into a cycle are not part of it.
#[test]
fn tail_is_excluded_from_cycle() {
    let graph = IndexMap::from([("X", vec!["A"]), ("A", vec!["B"]), ("B", vec!["A"])]);
    assert_eq!(find_fragment_cycles(&graph), vec![strings(&["A", "B", "A"])]);
}

/// Diamonds and undefined targets are not cycles.
#[test]
fn acyclic_graphs() {
    let graph = IndexMap::from([
        ("A", vec!["B", "C"]),
        ("B", vec!["D"]),
        ("C", vec!["D", "Missing"]),
        ("D", vec![]),
    ]);
    assert!(find_fragment_cycles(&graph).is_empty());
}
