use shared::models::{ConsistencyReport, TallyTable};
use shared::validation::validate_candidate_name;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::session::Voter;
use crate::store::Store;

/// Proof that the caller is the designated administrator.
#[derive(Debug, Clone)]
pub struct Admin {
    username: String,
}

impl Admin {
    pub fn authorize(voter: Option<Voter>, admin_username: &str) -> Result<Self, ApiError> {
        let voter = voter.ok_or(ApiError::Unauthenticated)?;
        if voter.username() != admin_username {
            warn!("User {} attempted an admin action", voter.username());
            return Err(ApiError::Unauthorized);
        }
        Ok(Self {
            username: voter.username().to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

pub struct AdminService;

impl AdminService {
    /// Zeroes every tally entry, then clears every voted flag.
    ///
    /// An unreadable tally is rebuilt from the seed candidates. Runs under the
    /// ballot lock, so no vote is half-recorded while the tables are cleared.
    pub fn reset_all(store: &Store, admin: &Admin) -> Result<(), ApiError> {
        let _ballot = store.ballot()?;
        let reset = store.tally().update(|tally| {
            tally.values_mut().for_each(|count| *count = 0);
            Ok::<_, ApiError>(())
        });

        match reset {
            Ok(()) => {}
            Err(ApiError::Store(e)) if e.is_corrupt() => {
                warn!("Reinitializing tally store: {}", e);
                store.tally().replace(&store.initial_tally())?;
            }
            Err(e) => return Err(e),
        }

        store.users().update(|users| {
            users.values_mut().for_each(|user| user.voted = false);
            Ok::<_, ApiError>(())
        })?;

        info!("Votes reset by {}", admin.username());
        Ok(())
    }

    /// Adds a candidate with zero votes and returns the stored name.
    pub fn add_candidate(store: &Store, admin: &Admin, name: &str) -> Result<String, ApiError> {
        let name = name.trim();
        validate_candidate_name(name).map_err(ApiError::InvalidName)?;

        store.tally().update(|tally| {
            let lowered = name.to_lowercase();
            if let Some(existing) = tally.keys().find(|k| k.to_lowercase() == lowered) {
                return Err(ApiError::DuplicateCandidate(existing.clone()));
            }
            tally.insert(name.to_string(), 0);
            Ok(())
        })?;

        info!("Candidate {} added by {}", name, admin.username());
        Ok(name.to_string())
    }

    /// Everything the admin page shows. Store failures are reported in
    /// `problem` rather than failing, so the reset action stays reachable.
    pub fn overview(store: &Store, _admin: &Admin) -> AdminOverview {
        let tally = store.tally().read();
        let users = store.users().read();

        let problem = [tally.as_ref().err(), users.as_ref().err()]
            .into_iter()
            .flatten()
            .map(ToString::to_string)
            .next();
        let report = match (&users, &tally) {
            (Ok(users), Ok(tally)) => Some(ConsistencyReport::from_tables(users, tally)),
            _ => None,
        };

        AdminOverview {
            tally: tally.ok(),
            registered_users: users.map(|u| u.len()).ok(),
            report,
            problem,
        }
    }
}

#[derive(Debug)]
pub struct AdminOverview {
    pub tally: Option<TallyTable>,
    pub registered_users: Option<usize>,
    pub report: Option<ConsistencyReport>,
    pub problem: Option<String>,
}
