//! License key format.
//!
//! Keys look like `ARPRO-1a2b-3c4d-5e6f`: the tier prefix followed by three
//! groups of four hex characters. They are meant to be read out over a
//! support ticket. They are not secrets and carry no authority on their own.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LicenseTier;

const GROUP_LEN: usize = 4;
const GROUP_COUNT: usize = 3;

/// A license key issued to a purchaser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Generate a fresh key for the given tier.
    pub fn generate(tier: LicenseTier) -> Self {
        let mut key = String::from(tier.key_prefix());
        for _ in 0..GROUP_COUNT {
            key.push('-');
            key.push_str(&Uuid::new_v4().simple().to_string()[..GROUP_LEN]);
        }
        Self(key)
    }

    /// Wrap a key read back from storage.
    pub fn from_string(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the key has the shape produced by [`LicenseKey::generate`] for `tier`.
    pub fn matches_tier(&self, tier: LicenseTier) -> bool {
        let mut parts = self.0.split('-');
        if parts.next() != Some(tier.key_prefix()) {
            return false;
        }
        let groups: Vec<&str> = parts.collect();
        groups.len() == GROUP_COUNT
            && groups.iter().all(|g| {
                g.len() == GROUP_LEN
                    && g.chars()
                        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            })
    }
}

impl std::fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
