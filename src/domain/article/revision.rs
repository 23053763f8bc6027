use serde::{Deserialize, Serialize};
use std::fmt;

/// Which revision of an article row to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RevisionSelector {
    #[default]
    Latest,
    Online,
    Exact(i64),
}

impl fmt::Display for RevisionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Online => f.write_str("online"),
            Self::Exact(rev) => write!(f, "r{rev}"),
        }
    }
}
