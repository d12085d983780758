use blossom_forest::reorder;
use proptest::prelude::*;

// Blossoms are odd cycles.
fn cycle_and_anchors() -> impl Strategy<Value = (usize, usize, usize)> {
    (0usize..20).prop_map(|k| 2 * k + 1)
                .prop_flat_map(|n| (Just(n), 0..n, 0..n))
}

fn is_rotation(a: &[usize], b: &[usize]) -> bool {
    a.len() == b.len() && (a.is_empty() || (0..a.len()).any(|r| a[r..].iter().chain(&a[..r]).eq(b.iter())))
}

proptest! {
    #[test]
    fn anchors_land_in_place((n, start, end) in cycle_and_anchors()) {
        let items: Vec<usize> = (0..n).map(|i| i * 7 + 1).collect();
        let (got, new_end) = reorder(&items, start, end);
        prop_assert_eq!(got.len(), n);
        prop_assert_eq!(got[0], items[start]);
        prop_assert!(new_end < n);
        prop_assert_eq!(got[new_end], items[end]);
        prop_assert_eq!(new_end % 2, 0);
    }

    #[test]
    fn odd_runs_keep_direction((n, start, end) in cycle_and_anchors()) {
        let items: Vec<usize> = (0..n).collect();
        let (_, new_end) = reorder(&items, start, end);
        let run = (end + n - start) % n;
        if run % 2 == 0 {
            prop_assert_eq!(new_end, run);
        }
    }

    #[test]
    fn result_is_a_rotation((n, start, end) in cycle_and_anchors()) {
        let items: Vec<usize> = (0..n).collect();
        let (got, _) = reorder(&items, start, end);
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert!(is_rotation(&items, &got) || is_rotation(&reversed, &got));
    }
}
