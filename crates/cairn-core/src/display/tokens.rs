//! Token count display utilities.

use std::fmt;

/// Formats a token count the way status lines and the history table do:
/// counts of a thousand or more collapse to one decimal with a `k`
/// suffix (`7200` → `7.2k`), smaller counts print as-is.
pub struct Tokens(pub u64);

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1000 {
            write!(f, "{:.1}k", self.0 as f64 / 1000.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
