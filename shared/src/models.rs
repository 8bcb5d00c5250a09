use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Persisted layout of `users.json`, keyed by username.
pub type UserTable = BTreeMap<String, UserRecord>;

/// Persisted layout of `votes.json`, keyed by candidate name. The key set is
/// the candidate set.
pub type TallyTable = BTreeMap<String, u64>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub password: String,
    #[serde(default)]
    pub voted: bool,
}

impl UserRecord {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            voted: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(rocket::FromForm))]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(rocket::FromForm))]
pub struct VoteForm {
    pub candidate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(rocket::FromForm))]
pub struct CandidateForm {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    pub name: String,
    pub votes: u64,
    pub percentage: f64,
    pub leading: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub candidates: Vec<CandidateResult>,
    pub total_votes: u64,
}

impl Results {
    pub fn from_tally(tally: &TallyTable) -> Self {
        let total_votes: u64 = tally.values().sum();
        let top = tally.values().copied().max().unwrap_or(0);

        let candidates = tally
            .iter()
            .map(|(name, &votes)| CandidateResult {
                name: name.clone(),
                votes,
                percentage: if total_votes == 0 {
                    0.0
                } else {
                    votes as f64 * 100.0 / total_votes as f64
                },
                leading: total_votes > 0 && votes == top,
            })
            .collect();

        Self { candidates, total_votes }
    }

    pub fn leaders(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .filter(|c| c.leading)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Cross-store check: every voted user should be matched by exactly one
/// tally increment. A crash between the two writes of a vote breaks this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub voted_users: u64,
    pub total_votes: u64,
}

impl ConsistencyReport {
    pub fn from_tables(users: &UserTable, tally: &TallyTable) -> Self {
        Self {
            voted_users: users.values().filter(|u| u.voted).count() as u64,
            total_votes: tally.values().sum(),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.voted_users == self.total_votes
    }

    /// Voted users with no matching tally increment.
    pub fn unrecorded_votes(&self) -> u64 {
        self.voted_users.saturating_sub(self.total_votes)
    }
}
