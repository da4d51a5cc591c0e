//! Complaint id generation.

use rand::Rng;

/// Prefix shared by every complaint id.
pub const ID_PREFIX: char = 'C';

/// Number of random characters after the prefix.
pub const ID_SUFFIX_LEN: usize = 6;

/// Source of candidate complaint ids.
///
/// Candidates are not required to be unique; the store re-rolls on collision.
pub trait IdGenerator: Send + Sync {
    /// Produce one candidate id.
    fn generate(&self) -> String;
}

/// Random ids: `C` followed by six uppercase base-36 digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut id = String::with_capacity(1 + ID_SUFFIX_LEN);
        id.push(ID_PREFIX);
        for _ in 0..ID_SUFFIX_LEN {
            let digit = rng.gen_range(0..36);
            if let Some(c) = char::from_digit(digit, 36) {
                id.push(c.to_ascii_uppercase());
            }
        }
        id
    }
}

/// Check that `id` has the generated shape.
#[must_use]
pub fn is_well_formed(id: &str) -> bool {
    let mut chars = id.chars();
    chars.next() == Some(ID_PREFIX)
        && id.len() == 1 + ID_SUFFIX_LEN
        && chars.all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}
