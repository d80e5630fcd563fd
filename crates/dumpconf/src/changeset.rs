/// One sysdumpdev option, optionally followed by its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Option such as `-p`
    pub flag: &'static str,
    /// Value following the option, if it takes one
    pub value: Option<String>,
}

/// Ordered, append-only list of options for one sysdumpdev call.
///
/// sysdumpdev applies options in argument order, so tokens are kept in
/// the order they were pushed. `-P` in particular only makes sense after
/// the device options it makes permanent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    tokens: Vec<Token>,
}

impl ChangeSet {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option that takes no value
    pub fn flag(&mut self, flag: &'static str) -> &mut Self {
        self.tokens.push(Token { flag, value: None });
        self
    }

    /// Append an option followed by its value
    pub fn option(&mut self, flag: &'static str, value: impl Into<String>) -> &mut Self {
        self.tokens.push(Token {
            flag,
            value: Some(value.into()),
        });
        self
    }

    /// True if applying this set would change something
    pub fn is_changed(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Tokens in the order they were pushed
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Flatten into the argument vector passed to sysdumpdev
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.tokens.len() * 2);
        for token in &self.tokens {
            args.push(token.flag.to_string());
            if let Some(value) = &token.value {
                args.push(value.clone());
            }
        }
        args
    }

    /// The command line as it would be typed, prefixed with `program`
    pub fn command_line(&self, program: &str) -> String {
        std::iter::once(program.to_string())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_preserve_push_order() {
        let mut changes = ChangeSet::new();
        changes
            .option("-p", "/dev/sysdump0")
            .option("-s", "/dev/sysdump1")
            .flag("-P");

        assert!(changes.is_changed());
        assert_eq!(changes.tokens().len(), 3);
        assert_eq!(
            changes.args(),
            vec!["-p", "/dev/sysdump0", "-s", "/dev/sysdump1", "-P"]
        );
        assert_eq!(
            changes.command_line("sysdumpdev"),
            "sysdumpdev -p /dev/sysdump0 -s /dev/sysdump1 -P"
        );
    }

    #[test]
    fn test_empty_set() {
        let changes = ChangeSet::new();
        assert!(!changes.is_changed());
        assert!(changes.args().is_empty());
        assert_eq!(changes.command_line("sysdumpdev"), "sysdumpdev");
    }
}
