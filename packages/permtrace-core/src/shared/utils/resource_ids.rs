//! Resource identifier extraction
//!
//! Compiled resource references show up in decompiled code as plain decimal
//! constants (`0x7f0e0042` is printed as `2131623970`). Any run of ten ASCII
//! digits is a candidate.

use once_cell::sync::Lazy;
use regex::Regex;

static RESOURCE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{10}").expect("resource id pattern is valid"));

/// Candidate resource ids in `source`, left to right, non-overlapping.
///
/// Longer digit runs contribute their leading ten digits, then continue
/// scanning after them.
pub fn find_resource_ids(source: &str) -> Vec<u64> {
    RESOURCE_ID
        .find_iter(source)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_ids_in_call_arguments() {
        let source = "this.requestPermissions(new String[]{getString(2131623970)}, 1234567890);";
        assert_eq!(find_resource_ids(source), vec![2131623970, 1234567890]);
    }

    #[test]
    fn test_short_numbers_ignored() {
        assert!(find_resource_ids("int code = 42; long t = 123456789;").is_empty());
    }

    #[test]
    fn test_long_runs_split_without_overlap() {
        // 12 digits: the first ten are taken, the remaining two are too short
        assert_eq!(find_resource_ids("x = 123456789012"), vec![1234567890]);
        // 20 digits: two consecutive ids
        assert_eq!(
            find_resource_ids("12345678909876543210"),
            vec![1234567890, 9876543210]
        );
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        assert!(find_resource_ids("١٢٣٤٥٦٧٨٩٠").is_empty());
    }
}
