/// Quantile `q` of `values` by linear interpolation between closest ranks.
///
/// Matches the default "linear" method of common statistics packages:
/// position `h = (n - 1) * q` over the sorted values. Returns `None` for an
/// empty slice or a `q` outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_quartile_on_exact_rank() {
        let q = quantile(&[3.0, 3.5, 4.0, 4.5, 5.0], 0.75).unwrap();
        assert_eq!(q, 4.5);
    }

    #[test]
    fn interpolates_between_ranks() {
        // h = 3 * 0.75 = 2.25 -> 3.0 + 0.25 * (4.0 - 3.0)
        let q = quantile(&[4.0, 1.0, 3.0, 2.0], 0.75).unwrap();
        assert!((q - 3.25).abs() < 1e-12);
    }

    #[test]
    fn bounds_and_single_value() {
        let values = [4.1, 4.7, 3.9];
        assert_eq!(quantile(&values, 0.0), Some(3.9));
        assert_eq!(quantile(&values, 1.0), Some(4.7));
        assert_eq!(quantile(&[4.4], 0.75), Some(4.4));
    }

    #[test]
    fn empty_or_out_of_range() {
        assert_eq!(quantile(&[], 0.75), None);
        assert_eq!(quantile(&[1.0], 1.5), None);
        assert_eq!(quantile(&[1.0], f64::NAN), None);
    }
}
