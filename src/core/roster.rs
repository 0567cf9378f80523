use super::error::LedgerError;
use serde::{Deserialize, Serialize};

/// The configured set of partners whose balances are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Roster(Vec<String>);

impl From<Vec<String>> for Roster {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.0
    }
}

impl Roster {
    pub fn new<I, S>(participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in participants {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self(names)
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.0.iter().any(|p| p == participant)
    }

    /// Returns the roster's spelling of `participant`, or an error if it is
    /// not a member.
    pub fn require(&self, participant: &str) -> Result<&str, LedgerError> {
        self.0
            .iter()
            .find(|p| p.as_str() == participant.trim())
            .map(String::as_str)
            .ok_or_else(|| LedgerError::UnknownParticipant(participant.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(["Balu", "Mani"])
    }
}
