/// Display formatting for storefront badges
///
/// Counts below 1,000 are shown exactly. Larger counts are rounded to the
/// nearest hundred and shown in thousands with a `K+` suffix:
/// 1427 -> "1.4K+", 2003 -> "2K+".
pub fn format_holder_count(count: u64) -> String {
    if count < 1000 {
        return count.to_string();
    }

    let hundreds = (count + 50) / 100;
    let (whole, tenth) = (hundreds / 10, hundreds % 10);
    if tenth == 0 {
        format!("{}K+", whole)
    } else {
        format!("{}.{}K+", whole, tenth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_counts_exact() {
        assert_eq!(format_holder_count(0), "0");
        assert_eq!(format_holder_count(999), "999");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(format_holder_count(1000), "1K+");
        assert_eq!(format_holder_count(1427), "1.4K+");
        assert_eq!(format_holder_count(1450), "1.5K+");
        assert_eq!(format_holder_count(1449), "1.4K+");
        assert_eq!(format_holder_count(2003), "2K+");
        assert_eq!(format_holder_count(1960), "2K+");
        assert_eq!(format_holder_count(12_345), "12.3K+");
    }
}
