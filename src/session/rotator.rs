// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cycles through a fixed pool of registered API credentials, one per
/// verification attempt, to spread request volume across them.  Rotation
/// order is deterministic round-robin; this is rate-limit hygiene, not a
/// security boundary.
#[derive(Debug)]
pub struct KeyRotator {
    pool: Vec<String>,
    pos: AtomicUsize,
}

impl KeyRotator {
    pub fn new(pool: Vec<String>) -> Result<Self, Error> {
        if pool.is_empty() {
            return Err(Error::Config("empty credential pool".to_string()));
        }

        Ok(Self {
            pool,
            pos: AtomicUsize::new(0),
        })
    }

    /// The next credential in rotation.  Advances the position exactly once
    /// per call, wrapping after the last entry, regardless of how the
    /// attempt using the credential turns out.
    pub fn next(&self) -> String {
        let i = self.pos.fetch_add(1, Ordering::Relaxed);
        self.pool[i % self.pool.len()].clone()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_pool() {
        let r = KeyRotator::new(Vec::new());

        assert!(matches!(r, Err(Error::Config(_))));
    }

    #[test]
    fn cycles_in_order_and_wraps() {
        let r = KeyRotator::new(vec!["k0".into(), "k1".into(), "k2".into()]).unwrap();

        let seen: Vec<String> = (0..7).map(|_| r.next()).collect();

        assert_eq!(seen, ["k0", "k1", "k2", "k0", "k1", "k2", "k0"]);
    }

    #[test]
    fn single_entry_pool_repeats() {
        let r = KeyRotator::new(vec!["only".into()]).unwrap();

        assert_eq!(r.next(), "only");
        assert_eq!(r.next(), "only");
    }
}
