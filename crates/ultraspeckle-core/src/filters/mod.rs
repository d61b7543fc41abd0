pub mod cleanup;
pub mod gaussian_laplace;
pub mod median;
pub mod roi;
pub mod srad;

/// Map an out-of-range index back into `0..n` with half-sample symmetric
/// reflection (`d c b a | a b c d | d c b a`), repeating for offsets wider
/// than the axis.
pub(crate) fn reflect_index(idx: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = idx.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}
