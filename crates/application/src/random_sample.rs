//! Sampling helpers used by every stage: deduplication, uniform
//! sampling-without-replacement, and the random throwaway vhost labels used
//! both for SNI and for baseline calibration (spec.md §4.5, §4.6.1).

use std::collections::HashSet;
use std::hash::Hash;

/// Deduplicates `values`, discarding order (matches `get_unique_list` in
/// the original tool, which goes through a `set`).
pub fn unique<T: Eq + Hash + Clone>(values: Vec<T>) -> Vec<T> {
    values.into_iter().collect::<HashSet<_>>().into_iter().collect()
}

/// Uniform sample without replacement, always returned in randomized
/// order. When `cap` is `None` the entire input is returned, shuffled —
/// spec.md §9 requires iteration order to stay randomized even when no cap
/// is set, so an early-terminating consumer (stage 3's candidate loop)
/// never biases toward alphabetically-early entries.
pub fn random_sample<T>(mut values: Vec<T>, cap: Option<usize>) -> Vec<T> {
    fastrand::shuffle(&mut values);
    if let Some(limit) = cap {
        values.truncate(limit);
    }
    values
}

const LABEL_LEN: usize = 8;
const LABEL_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// A random, vanishingly-unlikely-to-exist vhost label under `.com`, used
/// as a generic "unknown vhost" probe (spec.md §4.5, §4.6.1).
pub fn random_vhost_label() -> String {
    let mut s = String::with_capacity(LABEL_LEN + 4);
    for _ in 0..LABEL_LEN {
        let idx = fastrand::usize(..LABEL_ALPHABET.len());
        s.push(LABEL_ALPHABET[idx] as char);
    }
    s.push_str(".com");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_dedupes() {
        let mut result = unique(vec![1, 2, 2, 3, 1]);
        result.sort_unstable();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn random_sample_without_cap_keeps_all_elements() {
        let values: Vec<u32> = (0..50).collect();
        let mut sampled = random_sample(values.clone(), None);
        sampled.sort_unstable();
        assert_eq!(sampled, values);
    }

    #[test]
    fn random_sample_with_cap_truncates() {
        let values: Vec<u32> = (0..50).collect();
        let sampled = random_sample(values, Some(10));
        assert_eq!(sampled.len(), 10);
    }

    #[test]
    fn random_sample_cap_larger_than_input_returns_all() {
        let values = vec![1, 2, 3];
        let sampled = random_sample(values, Some(100));
        assert_eq!(sampled.len(), 3);
    }

    #[test]
    fn random_vhost_label_is_well_formed() {
        let label = random_vhost_label();
        assert!(label.ends_with(".com"));
        let name_part = &label[..label.len() - 4];
        assert_eq!(name_part.len(), LABEL_LEN);
        assert!(name_part.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn random_vhost_label_is_unlikely_to_collide() {
        assert_ne!(random_vhost_label(), random_vhost_label());
    }
}
