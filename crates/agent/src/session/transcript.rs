//! Transcript views derived from the history

/// Canonical (pivot) and local renderings of the same history
///
/// Both are replaced together on every refresh so line positions in one can
/// be used to address the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub canonical: String,
    pub local: String,
}

impl Transcript {
    pub fn canonical_lines(&self) -> Vec<&str> {
        self.canonical.split('\n').collect()
    }

    pub fn local_lines(&self) -> Vec<&str> {
        self.local.split('\n').collect()
    }

    /// Last `n` local lines joined with newlines
    pub fn local_tail(&self, n: usize) -> String {
        let lines = self.local_lines();
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }

    /// Local lines from index `from` onwards
    pub fn local_from(&self, from: usize) -> String {
        let lines = self.local_lines();
        lines.get(from..).map(|l| l.join("\n")).unwrap_or_default()
    }

    /// True when translation left the text unchanged
    pub fn is_untranslated(&self) -> bool {
        self.canonical == self.local
    }
}
