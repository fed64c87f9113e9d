//! Session tokens scoping a pacing wait to one queue generation.

use core::fmt;

/// Generation token minted by every queue clear.
///
/// A pacing wait started under one session is abandoned as soon as the queue
/// reports a different one. Tokens only move forward, so a value is never
/// handed out twice within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Session(u64);

impl Session {
    pub const fn initial() -> Self {
        Session(0)
    }

    /// The token that replaces `self`.
    pub const fn next(self) -> Self {
        Session(self.0.wrapping_add(1))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_strictly_newer() {
        let s = Session::initial();
        assert!(s.next() > s);
        assert_ne!(s.next(), s.next().next());
        assert_eq!(s.next().to_string(), "#1");
    }
}
