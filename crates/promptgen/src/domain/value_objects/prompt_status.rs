//! PromptStatus - Lifecycle of a prompt record
//!
//! CREATED -> GENERATING -> GENERATED | ERROR

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a prompt record, serialized as the graph API enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptStatus {
    Created,
    Generating,
    Generated,
    Error,
}

impl PromptStatus {
    /// GENERATED and ERROR are final; nothing moves a record out of them.
    pub fn is_terminal(self) -> bool {
        matches!(self, PromptStatus::Generated | PromptStatus::Error)
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// A worker can fail before it manages to write GENERATING, so
    /// CREATED -> ERROR is allowed. GENERATING may be written again by a
    /// re-invoked worker.
    pub fn can_transition_to(self, next: PromptStatus) -> bool {
        use PromptStatus::*;
        match (self, next) {
            (Created, Generating) | (Created, Error) => true,
            (Generating, Generating) | (Generating, Generated) | (Generating, Error) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromptStatus::Created => "CREATED",
            PromptStatus::Generating => "GENERATING",
            PromptStatus::Generated => "GENERATED",
            PromptStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for PromptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PromptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATED" => Ok(PromptStatus::Created),
            "GENERATING" => Ok(PromptStatus::Generating),
            "GENERATED" => Ok(PromptStatus::Generated),
            "ERROR" => Ok(PromptStatus::Error),
            _ => Err(format!("Unknown prompt status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PromptStatus::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(Created.can_transition_to(Generating));
        assert!(Generating.can_transition_to(Generated));
        assert!(Generating.can_transition_to(Error));
        assert!(Created.can_transition_to(Error));
    }

    #[test]
    fn test_terminal_states_are_closed() {
        for terminal in [Generated, Error] {
            assert!(terminal.is_terminal());
            for next in [Created, Generating, Generated, Error] {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn test_no_transition_back_to_created() {
        assert!(!Generating.can_transition_to(Created));
        assert!(!Created.can_transition_to(Generated));
    }

    #[test]
    fn test_serializes_as_graphql_enum() {
        assert_eq!(serde_json::to_string(&Generating).unwrap(), "\"GENERATING\"");
        let status: PromptStatus = serde_json::from_str("\"ERROR\"").unwrap();
        assert_eq!(status, Error);
        assert_eq!("generated".parse::<PromptStatus>().unwrap(), Generated);
    }
}
