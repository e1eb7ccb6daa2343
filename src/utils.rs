/// Small helpers shared by the station and warning modules.

use std::cmp::Ordering;

/// Returns `items` sorted by the key produced by `key`, ascending unless
/// `reverse` is set.
///
/// The sort is stable: elements with equal keys keep their input order in
/// both directions. Keys that do not compare equal to themselves (NaN
/// distances) sort after every other key in either direction, so the
/// comparator stays a total order.
pub fn sorted_by_key<T, K, F>(mut items: Vec<T>, key: F, reverse: bool) -> Vec<T>
where
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    items.sort_by(|a, b| {
        let (ka, kb) = (key(a), key(b));
        match (is_unordered(&ka), is_unordered(&kb)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = ka.partial_cmp(&kb).unwrap_or(Ordering::Equal);
                if reverse { ord.reverse() } else { ord }
            }
        }
    });
    items
}

fn is_unordered<K: PartialOrd>(k: &K) -> bool {
    k.partial_cmp(k).is_none()
}
