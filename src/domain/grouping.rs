use std::collections::HashMap;
use std::hash::Hash;

/// Attaches each child to its parent, keeping parent order and the relative
/// order of children. Every child whose key matches a parent ends up under
/// exactly one parent; children without a matching parent are returned
/// separately so the caller can decide what to do with them.
pub fn group_children<P, C, K>(
    parents: Vec<P>,
    children: Vec<C>,
    parent_key: impl Fn(&P) -> K,
    child_key: impl Fn(&C) -> K,
) -> (Vec<(P, Vec<C>)>, Vec<C>)
where
    K: Eq + Hash,
{
    let index: HashMap<K, usize> = parents
        .iter()
        .enumerate()
        .map(|(i, p)| (parent_key(p), i))
        .collect();

    let mut buckets: Vec<Vec<C>> = parents.iter().map(|_| Vec::new()).collect();
    let mut orphans = Vec::new();
    for child in children {
        match index.get(&child_key(&child)) {
            Some(&i) => buckets[i].push(child),
            None => orphans.push(child),
        }
    }

    (parents.into_iter().zip(buckets).collect(), orphans)
}
