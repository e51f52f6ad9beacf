/// Computes the arithmetic mean of the defined values. Returns `None` when
/// there are none.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_skips_undefined() {
        assert_eq!(mean([Some(53.0), None, Some(54.0)]), Some(53.5));
    }

    #[test]
    fn test_mean_of_nothing() {
        assert_eq!(mean([None, None]), None);
        assert_eq!(mean(Vec::<Option<f64>>::new()), None);
    }
}
