// Canonical ordering of a blossom's subflowers.

/// Rearrange a cyclic sequence around two anchors.
///
/// The result starts with the `start` item, followed by an odd number of
/// items, then the `end` item, then an even number of items. When the run
/// from `start` to `end` is even, its complement is the odd one, so the
/// sequence is walked the other way round.
///
/// Returns the rearranged sequence and the new index of the `end` item,
/// which is always even.
pub fn reorder<T: Clone>(items: &[T], start: usize, end: usize) -> (Vec<T>, usize) {
    let n = items.len();
    assert!(start < n && end < n, "anchors {} and {} outside a cycle of {}", start, end, n);

    let mut items = items.to_vec();
    let (mut start, mut end) = (start, end);

    // Size of the run that would remain between the anchors.
    let mut segment = end as isize - start as isize + 1;
    if segment < 1 {
        segment += n as isize;
    }

    if segment % 2 == 0 {
        items.reverse();
        start = n - 1 - start;
        end   = n - 1 - end;
    }

    // shifts back of vec to front: v = v[start:] + v[:start]
    items.rotate_left(start);

    let end = if start > end { end + n - start } else { end - start };
    (items, end)
}
