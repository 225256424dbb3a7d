use std::cmp::Ordering;

/// Compare two dotted version strings segment by segment.
///
/// Numeric segments compare by value, so `1.10 > 1.9`. Empty segments
/// produced by repeated or trailing dots are ignored. When one version is a
/// prefix of the other, the shorter one is older (`1.16 < 1.16.0`).
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = segments(a);
    let mut right = segments(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(x), Some(y)) => match compare_segment(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Returns true if `candidate` is strictly newer than `current`.
pub fn is_newer_than(candidate: &str, current: &str) -> bool {
    compare_versions(candidate, current) == Ordering::Greater
}

fn segments(version: &str) -> impl Iterator<Item = &str> {
    version.split('.').filter(|segment| !segment.is_empty())
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| s.bytes().all(|byte| byte.is_ascii_digit());
    if numeric(a) && numeric(b) {
        // Compare digit strings without parsing so arbitrarily long segments cannot overflow.
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_conventional_dotted_versions() {
        let descending = ["1.16.5", "1.16.4", "1.9", "1.2.10", "1.2.9"];
        for pair in descending.windows(2) {
            assert_eq!(
                compare_versions(pair[0], pair[1]),
                Ordering::Greater,
                "{} should be newer than {}",
                pair[0],
                pair[1]
            );
            assert_eq!(compare_versions(pair[1], pair[0]), Ordering::Less);
        }
        assert!(is_newer_than("1.16.5", "1.2.9"));
    }

    #[test]
    fn equal_versions_are_not_newer() {
        assert_eq!(compare_versions("1.17", "1.17"), Ordering::Equal);
        assert!(!is_newer_than("1.17", "1.17"));
        assert_eq!(compare_versions("1.017", "1.17"), Ordering::Equal);
    }

    #[test]
    fn shorter_prefix_is_older() {
        assert_eq!(compare_versions("1.16", "1.16.0"), Ordering::Less);
        assert_eq!(compare_versions("1.16.0.1", "1.16.0"), Ordering::Greater);
    }

    #[test]
    fn ignores_empty_segments() {
        assert_eq!(compare_versions("1..2.", "1.2"), Ordering::Equal);
        assert_eq!(compare_versions("", ""), Ordering::Equal);
        assert_eq!(compare_versions("", "0"), Ordering::Less);
    }

    #[test]
    fn long_segments_do_not_overflow() {
        assert_eq!(
            compare_versions("1.99999999999999999999999", "1.99999999999999999999998"),
            Ordering::Greater
        );
    }
}
