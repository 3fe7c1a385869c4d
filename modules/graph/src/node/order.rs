use std::collections::{HashMap, HashSet};

use espalier_entity::node;
use uuid::Uuid;

/// Arranges a product's versions along their predecessor chains.
///
/// Versions with no predecessor (or a predecessor outside the given set) start
/// a chain; each chain is walked head to tail via the successor map. Cycles
/// truncate instead of looping, and anything left unvisited, e.g. because of a
/// dangling or colliding predecessor link, is appended in input order. Every
/// input version appears exactly once in the output, no matter how malformed
/// the chain data is.
pub fn order_versions(versions: Vec<node::Model>) -> Vec<node::Model> {
    let ids: HashSet<Uuid> = versions.iter().map(|version| version.id).collect();

    // predecessor -> index of its successor; the first claim wins, a second
    // version pointing at the same predecessor falls back to input order
    let mut successors: HashMap<Uuid, usize> = HashMap::new();
    for (index, version) in versions.iter().enumerate() {
        if let Some(predecessor) = version.predecessor_id {
            if ids.contains(&predecessor) {
                successors.entry(predecessor).or_insert(index);
            }
        }
    }

    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut order: Vec<usize> = Vec::with_capacity(versions.len());

    for (index, version) in versions.iter().enumerate() {
        let is_head = match version.predecessor_id {
            None => true,
            Some(predecessor) => !ids.contains(&predecessor),
        };
        if !is_head {
            continue;
        }

        let mut current = Some(index);
        while let Some(i) = current {
            if !visited.insert(versions[i].id) {
                break;
            }
            order.push(i);
            current = successors.get(&versions[i].id).copied();
        }
    }

    for (index, version) in versions.iter().enumerate() {
        if !visited.contains(&version.id) {
            order.push(index);
        }
    }

    let mut slots: Vec<Option<node::Model>> = versions.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
