use std::fmt;

/// Liveness token of one mirrored entity.
///
/// Every entity (modem, SIM, connection manager, context, technology) gets a
/// fresh token when it is created. Remote-call completions and signal
/// deliveries are tagged with the token of the entity that requested them;
/// once the entity is torn down its token never matches again, so late
/// completions are dropped instead of touching a dead or re-created entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tokens that are unique for the lifetime of the source.
#[derive(Debug, Default)]
pub struct TokenSource {
    issued: u64,
}

impl TokenSource {
    /// Returns a token that has never been handed out before.
    pub fn issue(&mut self) -> Token {
        self.issued += 1;
        Token(self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_never_reused() {
        let mut source = TokenSource::default();
        let first = source.issue();
        let second = source.issue();

        assert_ne!(first, second);
        assert!(first < second);
    }
}
