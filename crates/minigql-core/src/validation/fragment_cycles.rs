use indexmap::IndexMap;
use std::collections::HashSet;

/// Finds every cycle in the fragment spread graph (fragment name to the
/// fragment names it spreads, directly or through nested selections).
///
/// Each cycle is reported once, rotated to start at its smallest name and
/// closed by repeating that name: `B -> C -> A -> B` becomes
/// `A -> B -> C -> A`.
pub(super) fn find_fragment_cycles<'a>(spreads: &IndexMap<&'a str, Vec<&'a str>>) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let mut seen_normalized = HashSet::new();

    for fragment_name in spreads.keys() {
        let mut path = Vec::new();
        let mut visiting = HashSet::new();
        visit(
            spreads,
            *fragment_name,
            &mut path,
            &mut visiting,
            &mut cycles,
            &mut seen_normalized,
        );
    }

    cycles
}

fn visit<'a>(
    spreads: &IndexMap<&'a str, Vec<&'a str>>,
    fragment_name: &'a str,
    path: &mut Vec<&'a str>,
    visiting: &mut HashSet<&'a str>,
    cycles: &mut Vec<Vec<String>>,
    seen_normalized: &mut HashSet<Vec<String>>,
) {
    if visiting.contains(fragment_name) {
        // Only the part of the path from the first visit onwards loops.
        let start = path.iter().position(|name| *name == fragment_name).unwrap_or(0);
        let mut cycle = path[start..].iter().map(|name| name.to_string()).collect::<Vec<_>>();
        cycle.push(fragment_name.to_string());

        let normalized = normalize_cycle(&cycle);
        if seen_normalized.insert(normalized.clone()) {
            cycles.push(normalized);
        }
        return;
    }

    // Undefined fragments are reported elsewhere.
    let Some(targets) = spreads.get(fragment_name) else {
        return;
    };

    path.push(fragment_name);
    visiting.insert(fragment_name);
    for target in targets {
        visit(spreads, *target, path, visiting, cycles, seen_normalized);
    }
    path.pop();
    visiting.remove(fragment_name);
}

/// Rotates a closed cycle (`[B, C, A, B]`) to start at its
/// lexicographically smallest name (`[A, B, C, A]`).
pub(super) fn normalize_cycle(cycle: &[String]) -> Vec<String> {
    if cycle.is_empty() {
        return Vec::new();
    }

    let open_cycle = &cycle[..cycle.len() - 1];
    let min_idx = open_cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&open_cycle[min_idx..]);
    normalized.extend_from_slice(&open_cycle[..min_idx]);
    if let Some(first) = normalized.first().cloned() {
        normalized.push(first);
    }
    normalized
}
