//! Log tags identify the subsystem a message comes from.
//!
//! Each tag maps to a `--debug-<key>` flag that unlocks its debug output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Tokens,
    Scoring,
    Dedup,
    Ranking,
    Filtering,
    Search,
    Session,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` / `--verbose-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Tokens => "tokens".to_string(),
            LogTag::Scoring => "scoring".to_string(),
            LogTag::Dedup => "dedup".to_string(),
            LogTag::Ranking => "ranking".to_string(),
            LogTag::Filtering => "filtering".to_string(),
            LogTag::Search => "search".to_string(),
            LogTag::Session => "session".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(name) => name.to_lowercase().replace(' ', "-"),
        }
    }

    /// Uppercase label without color codes (used for plain output)
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Tokens => "TOKENS".to_string(),
            LogTag::Scoring => "SCORING".to_string(),
            LogTag::Dedup => "DEDUP".to_string(),
            LogTag::Ranking => "RANKING".to_string(),
            LogTag::Filtering => "FILTER".to_string(),
            LogTag::Search => "SEARCH".to_string(),
            LogTag::Session => "SESSION".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(name) => name.to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
