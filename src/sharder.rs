//! Percentage bucketing.
//!
//! A user is assigned to one of [`TOTAL_BUCKETS`] buckets by hashing their identifier:
//!
//! ```text
//! bucket = u32::from_be_bytes(md5(user_id)[0..4]) % 100
//! ```
//!
//! The bucket does not depend on the flag, so a user sits in the same bucket for every flag. This
//! function decides which variation every user receives; changing it would move users between
//! variations of running rollouts.
use md5;

use crate::Variation;

/// Number of buckets percentages are expressed in.
pub const TOTAL_BUCKETS: u64 = 100;

/// Maps an input onto one of `total_shards` shards.
pub trait Sharder {
    #[allow(missing_docs)]
    fn get_shard(&self, input: impl AsRef<[u8]>, total_shards: u64) -> u64;
}

/// The default (and only) sharder.
pub struct Md5Sharder;

impl Sharder for Md5Sharder {
    fn get_shard(&self, input: impl AsRef<[u8]>, total_shards: u64) -> u64 {
        let hash = md5::compute(input);
        let value = u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]);
        (value as u64) % total_shards
    }
}

/// Bucket of `user_id`, in `0..TOTAL_BUCKETS`.
pub fn bucket_of(user_id: &str) -> u64 {
    bucket_with(&Md5Sharder, user_id)
}

pub(crate) fn bucket_with(sharder: &impl Sharder, user_id: &str) -> u64 {
    sharder.get_shard(user_id, TOTAL_BUCKETS)
}

/// Select the variation `user_id` falls into.
///
/// Variations occupy contiguous ranges of `[0, 100)` in declaration order, each as wide as its
/// percentage. Returns `None` if the user's bucket lies past the last range.
pub fn bucket<'a>(variations: &'a [Variation], user_id: &str) -> Option<&'a Variation> {
    variation_for_bucket(variations, bucket_of(user_id)).map(|(_, variation)| variation)
}

/// Find the variation whose range contains `bucket`, along with its index.
pub(crate) fn variation_for_bucket(
    variations: &[Variation],
    bucket: u64,
) -> Option<(usize, &Variation)> {
    let mut end = 0;
    variations.iter().enumerate().find(|(_, variation)| {
        end += u64::from(variation.percentage);
        bucket < end
    })
}

#[cfg(test)]
pub struct DeterministicSharder(pub std::collections::HashMap<String, u64>);

#[cfg(test)]
impl Sharder for DeterministicSharder {
    fn get_shard(&self, input: impl AsRef<[u8]>, total_shards: u64) -> u64 {
        let input = String::from_utf8_lossy(input.as_ref());
        self.0.get(&*input).copied().unwrap_or(0) % total_shards
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::Variation;

    use super::{bucket, bucket_of, variation_for_bucket, DeterministicSharder, Md5Sharder, Sharder};

    #[test]
    fn test_md5_sharder() {
        assert_eq!(Md5Sharder.get_shard("test-input", 10_000), 5619);
        assert_eq!(Md5Sharder.get_shard("alice", 10_000), 3170);
        assert_eq!(Md5Sharder.get_shard("bob", 10_000), 7420);
        assert_eq!(Md5Sharder.get_shard("charlie", 10_000), 7497);
    }

    #[test]
    fn bucket_of_is_stable() {
        assert_eq!(bucket_of("alice"), 70);
        assert_eq!(bucket_of("bob"), 20);
        assert_eq!(bucket_of("charlie"), 97);
        assert_eq!(bucket_of("user-2"), 12);
        for _ in 0..10 {
            assert_eq!(bucket_of("alice"), 70);
        }
    }

    #[test]
    fn deterministic_sharder_overrides_hash() {
        let sharder = DeterministicSharder(HashMap::from([("alice".to_owned(), 142)]));
        assert_eq!(sharder.get_shard("alice", 100), 42);
        assert_eq!(sharder.get_shard("bob", 100), 0);
    }

    #[test]
    fn ranges_follow_declaration_order() {
        let variations = vec![
            Variation::new("a", 10),
            Variation::new("b", 30),
            Variation::new("c", 60),
        ];

        assert_eq!(variation_for_bucket(&variations, 0).unwrap().1.value, "a");
        assert_eq!(variation_for_bucket(&variations, 9).unwrap().1.value, "a");
        assert_eq!(variation_for_bucket(&variations, 10).unwrap().1.value, "b");
        assert_eq!(variation_for_bucket(&variations, 39).unwrap().1.value, "b");
        assert_eq!(variation_for_bucket(&variations, 40).unwrap().0, 2);
        assert_eq!(variation_for_bucket(&variations, 99).unwrap().1.value, "c");
    }

    #[test]
    fn zero_width_variations_are_skipped() {
        let variations = vec![Variation::new("never", 0), Variation::new("always", 100)];
        assert_eq!(variation_for_bucket(&variations, 0).unwrap().1.value, "always");
    }

    #[test]
    fn bucket_past_last_range_selects_nothing() {
        let variations = vec![Variation::new("a", 50)];
        assert!(variation_for_bucket(&variations, 50).is_none());
        assert!(variation_for_bucket(&[], 0).is_none());
    }

    #[test]
    fn bucket_uses_user_hash() {
        // alice is in bucket 70, bob in bucket 20.
        let variations = vec![Variation::new("low", 50), Variation::new("high", 50)];
        assert_eq!(bucket(&variations, "alice").unwrap().value, "high");
        assert_eq!(bucket(&variations, "bob").unwrap().value, "low");
    }
}
