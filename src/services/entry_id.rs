use std::sync::Mutex;

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 11;

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

/// Issues cache entry ids: a base-36 millisecond timestamp followed by a
/// random base-36 suffix. Collisions are unlikely, not impossible.
pub struct EntryIdGenerator {
    rng: Mutex<StdRng>,
}

impl EntryIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn next_id(&self) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.random_range(0..36)] as char)
            .collect();
        format!("{}{}", to_base36(millis), suffix)
    }
}

impl Default for EntryIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
