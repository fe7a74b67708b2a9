//! Largest-remainder (Hamilton) apportionment.
//!
//! Shared by both allocation steps: questions across segments (weighted by
//! character length) and a segment's questions across types and difficulty
//! levels (equal weights).

/// Split `total` into integer parts proportional to `weights`.
///
/// Each part starts at the floor of its exact share; the units left over are
/// handed one by one to the largest fractional remainders. Equal remainders
/// go to the lower position counted from `first_priority` (wrapping), so
/// `first_priority = 0` means "lowest index wins".
///
/// The result always sums to `total` when `weights` is non-empty. All-zero
/// weights are treated as equal weights. Arithmetic is exact integer math.
pub fn largest_remainder(total: u32, weights: &[u64], first_priority: usize) -> Vec<u32> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let mut weight_sum: u128 = weights.iter().map(|&w| w as u128).sum();
    let equal;
    let weights = if weight_sum == 0 {
        equal = vec![1u64; n];
        weight_sum = n as u128;
        &equal[..]
    } else {
        weights
    };

    let mut parts = Vec::with_capacity(n);
    let mut remainders = Vec::with_capacity(n);
    for &w in weights {
        let exact = total as u128 * w as u128;
        parts.push((exact / weight_sum) as u32);
        remainders.push(exact % weight_sum);
    }

    let assigned: u32 = parts.iter().sum();
    let leftover = (total - assigned) as usize;
    if leftover == 0 {
        return parts;
    }

    let start = first_priority % n;
    let rank = |i: usize| (i + n - start) % n;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        remainders[b]
            .cmp(&remainders[a])
            .then_with(|| rank(a).cmp(&rank(b)))
    });

    for &i in order.iter().take(leftover) {
        parts[i] += 1;
    }
    parts
}

/// Equal-weight split of `total` over `n` slots.
pub fn equal_split(total: u32, n: usize, first_priority: usize) -> Vec<u32> {
    largest_remainder(total, &vec![1; n], first_priority)
}
