//! Positional reorder for plain lists.

/// Moves the element at `from` so that it ends up at index `to`.
///
/// The element is removed first and then inserted, so indices past `from`
/// shift down by one before the insert. Out-of-range `from` is a no-op and
/// `to` is clamped to the end of the list. Returns true if anything moved.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() || from == to {
        return false;
    }
    let item = list.remove(from);
    let to = to.min(list.len());
    list.insert(to, item);
    true
}
