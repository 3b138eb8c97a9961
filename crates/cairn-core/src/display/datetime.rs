//! DateTime display utilities.

use std::fmt;

use jiff::civil::DateTime;

/// A wrapper around a civil [`DateTime`] that formats it the way the
/// history table and status lines expect: `YYYY-MM-DD HH:MM:SS`.
///
/// History timestamps are naive local datetimes by format; this wrapper
/// keeps every rendering site consistent with the on-disk grammar.
pub struct LocalDateTime<'a>(pub &'a DateTime);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.strftime("%Y-%m-%d %H:%M:%S"))
    }
}
