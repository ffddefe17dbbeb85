use std::fmt;

use serde::{Deserialize, Serialize};

/// The oracle's answer to a question about a single commit.
///
/// Serializes as the bare strings `"Good"` / `"Bad"`, which is exactly
/// how the answer appears on the wire inside `{"Answer": …}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The commit does not contain the bug; neither it nor any ancestor
    /// can be the bug.
    Good,
    /// The commit contains the bug; the bug is it or one of its ancestors.
    Bad,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Bad => write!(f, "Bad"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        assert_eq!(serde_json::to_string(&Verdict::Good).unwrap(), "\"Good\"");
        assert_eq!(serde_json::to_string(&Verdict::Bad).unwrap(), "\"Bad\"");
    }

    #[test]
    fn deserializes_from_bare_string() {
        let v: Verdict = serde_json::from_str("\"Bad\"").unwrap();
        assert_eq!(v, Verdict::Bad);
    }

    #[test]
    fn unknown_value_is_rejected() {
        assert!(serde_json::from_str::<Verdict>("\"Maybe\"").is_err());
    }
}
