use std::cmp::Ordering;

#[inline]
fn median_of_three_index(data: &[i32], low: usize, mid: usize, high: usize) -> usize {
    let a = data[low];
    let b = data[mid];
    let c = data[high];
    if (a <= b && b <= c) || (c <= b && b <= a) {
        mid
    } else if (b <= a && a <= c) || (c <= a && a <= b) {
        low
    } else {
        high
    }
}

/// Partition data in-place using Lomuto scheme
fn partition_inplace(data: &mut [i32], low: usize, high: usize) -> usize {
    if low >= high {
        return low;
    }
    let mid = low + (high - low) / 2;
    let pivot_index = median_of_three_index(data, low, mid, high);

    data.swap(pivot_index, high);
    let pivot_value = data[high];

    // `i` tracks the boundary between elements <= pivot and elements > pivot
    let mut i = low;
    for j in low..high {
        if data[j] <= pivot_value {
            data.swap(i, j);
            i += 1;
        }
    }
    data.swap(i, high);
    i
}

// Iterative quickselect with median-of-three pivoting to avoid the
// worst-case quadratic runtime on sorted input
fn select_inplace(data: &mut [i32], k: usize) -> Option<i32> {
    if data.is_empty() || k >= data.len() {
        return None;
    }

    let mut low = 0;
    let mut high = data.len() - 1;

    loop {
        if low == high {
            return if low == k { Some(data[low]) } else { None };
        }
        let pivot_index = partition_inplace(data, low, high);
        match pivot_index.cmp(&k) {
            Ordering::Equal => return Some(data[k]),
            Ordering::Greater => {
                if pivot_index == 0 {
                    return None;
                }
                high = pivot_index - 1;
            }
            Ordering::Less => {
                low = pivot_index + 1;
            }
        }
        if low > high {
            return None;
        }
    }
}

/// The value with `rank` values greater than or equal to it; rank 0 is
/// the maximum. Returns `None` when `rank` is out of range.
pub fn kth_largest(data: &[i32], rank: usize) -> Option<i32> {
    if rank >= data.len() {
        return None;
    }
    let mut data_copy = data.to_vec();
    let k = data.len() - 1 - rank;
    select_inplace(&mut data_copy, k)
}
