//! Short alphanumeric suffixes for ids the backend did not supply.

use rand::distributions::{Alphanumeric, DistString};

const ID_LEN: usize = 8;

pub fn generate_random_id() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), ID_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_alphanumeric_and_distinct() {
        let a = generate_random_id();
        let b = generate_random_id();
        assert_eq!(a.len(), ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
