use crate::types::Size;

/// Maximum number of orders, the incoming one included, that can form a combination.
pub const MAX_COMBINED_ORDERS: usize = 4;

/// Searches resting orders that make the incoming size a multiple of `unit` when added to it.
///
/// The search is breadth-first over chains of extensions: every resting order is tried
/// as a pair with the incoming one, then every failed pair is extended by one more
/// resting order, and so on until [`MAX_COMBINED_ORDERS`] orders are combined.
/// Candidates are tried in the arrival order of the resting orders,
/// and the first qualifying one is returned. Combinations outside this bound are never found.
///
/// # Arguments
///
/// * `incoming` — Size of the incoming order.
/// * `resting` — `(key, Size)` pairs of the resting orders in arrival order.
/// Keys are expected to be distinct, e.g. positions in the book side.
/// * `unit` — Tradable unit of the exchange.
///
/// # Returns
///
/// Keys of the selected resting orders in selection order.
pub fn find_divisible_subset<Key: Copy + Eq>(
    incoming: Size,
    resting: &[(Key, Size)],
    unit: Size) -> Option<Vec<Key>>
{
    if !unit.is_positive() {
        return None;
    }
    let mut candidates: Vec<(Vec<Key>, Size)> = vec![(Vec::new(), incoming)];
    for round in 1..MAX_COMBINED_ORDERS {
        let last_round = round == MAX_COMBINED_ORDERS - 1;
        let mut extended = Vec::new();
        for (keys, partial_sum) in &candidates {
            for &(key, size) in resting {
                if keys.contains(&key) {
                    continue;
                }
                let sum = *partial_sum + size;
                if sum.is_multiple_of(unit) {
                    let mut keys = keys.clone();
                    keys.push(key);
                    return Some(keys);
                }
                // Candidates of the last round have no further extensions
                if !last_round {
                    let mut keys = keys.clone();
                    keys.push(key);
                    extended.push((keys, sum))
                }
            }
        }
        candidates = extended
    }
    None
}

#[cfg(test)]
mod tests {
    use {super::*, crate::types::OrderID};

    fn resting(sizes: &[i64]) -> Vec<(OrderID, Size)> {
        sizes.iter()
            .enumerate()
            .map(|(i, size)| (OrderID(i as u64 + 1), Size(*size)))
            .collect()
    }

    #[test]
    fn test_pair_found()
    {
        assert_eq!(
            find_divisible_subset(Size(3), &resting(&[4, 7, 1]), Size(5)),
            Some(vec![OrderID(2)])
        )
    }

    #[test]
    fn test_first_pair_in_arrival_order_wins()
    {
        assert_eq!(
            find_divisible_subset(Size(3), &resting(&[1, 2, 7]), Size(5)),
            Some(vec![OrderID(2)])
        )
    }

    #[test]
    fn test_triplet_found()
    {
        // 3 + 1 + 1 = 5
        assert_eq!(
            find_divisible_subset(Size(3), &resting(&[1, 1]), Size(5)),
            Some(vec![OrderID(1), OrderID(2)])
        )
    }

    #[test]
    fn test_quadruplet_found()
    {
        // 1 + 1 + 1 + 2 = 5
        assert_eq!(
            find_divisible_subset(Size(1), &resting(&[1, 1, 2]), Size(5)),
            Some(vec![OrderID(1), OrderID(2), OrderID(3)])
        )
    }

    #[test]
    fn test_search_is_bounded()
    {
        // 1 + 1 + 1 + 1 + 1 = 5 requires four resting orders
        assert_eq!(find_divisible_subset(Size(1), &resting(&[1, 1, 1, 1]), Size(5)), None)
    }

    #[test]
    fn test_no_resting_orders()
    {
        assert_eq!(find_divisible_subset(Size(3), &[] as &[(OrderID, Size)], Size(5)), None)
    }

    #[test]
    fn test_non_positive_unit()
    {
        assert_eq!(find_divisible_subset(Size(3), &resting(&[2]), Size(0)), None)
    }

    #[test]
    fn test_search_without_solution_stays_cheap()
    {
        // Two to four orders of size 1 never sum to a multiple of 5
        let resting = resting(&[1; 400]);
        assert_eq!(find_divisible_subset(Size(1), &resting, Size(5)), None)
    }

    #[test]
    fn test_positions_as_keys()
    {
        // Duplicate order IDs stay distinguishable by position
        let resting = [(OrderID(7), Size(4)), (OrderID(7), Size(2))];
        let by_position: Vec<(usize, Size)> = resting.iter()
            .enumerate()
            .map(|(position, (_, size))| (position, *size))
            .collect();
        assert_eq!(find_divisible_subset(Size(3), &by_position, Size(5)), Some(vec![1]))
    }
}
