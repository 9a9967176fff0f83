//! Modification-time comparison for newer-wins decisions

use std::cmp::Ordering;
use std::time::SystemTime;

use filetime::FileTime;

/// Timestamp comparator
///
/// Times are compared at whole-second resolution so that filesystems with
/// coarser timestamps than the source do not cause endless re-copies.
#[derive(Debug)]
pub struct TimestampComparator;

impl TimestampComparator {
    /// Seconds since the Unix epoch, negative before it
    #[must_use]
    pub fn seconds(time: SystemTime) -> i64 {
        FileTime::from_system_time(time).unix_seconds()
    }

    /// Order two modification times
    #[must_use]
    pub fn compare(source: SystemTime, destination: SystemTime) -> Ordering {
        Self::seconds(source).cmp(&Self::seconds(destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64, nanos: u32) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::new(secs, nanos)
    }

    #[test]
    fn test_source_newer() {
        assert_eq!(TimestampComparator::compare(at(200, 0), at(100, 0)), Ordering::Greater);
    }

    #[test]
    fn test_destination_newer() {
        assert_eq!(TimestampComparator::compare(at(100, 0), at(200, 0)), Ordering::Less);
    }

    #[test]
    fn test_sub_second_difference_is_equal() {
        assert_eq!(
            TimestampComparator::compare(at(100, 1), at(100, 999_999_999)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_before_epoch() {
        let before = SystemTime::UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(TimestampComparator::seconds(before), -10);
        assert_eq!(
            TimestampComparator::compare(SystemTime::UNIX_EPOCH, before),
            Ordering::Greater
        );
    }
}
