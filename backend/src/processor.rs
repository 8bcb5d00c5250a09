use shared::models::{Results, TallyTable};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::session::Voter;
use crate::store::Store;

pub struct VoteProcessor;

impl VoteProcessor {
    /// Records one vote for `candidate` on behalf of `voter`.
    ///
    /// The voter's flag is checked and set under the credential lock and
    /// persisted before the tally is incremented under the tally lock. A
    /// failure between the two writes leaves a voted user without a counted
    /// vote; the consistency report surfaces it. The ballot lock is held
    /// throughout so an admin reset cannot land between the two writes.
    pub fn submit_vote(store: &Store, voter: &Voter, candidate: &str) -> Result<(), ApiError> {
        let _ballot = store.ballot()?;
        if !store.tally().read()?.contains_key(candidate) {
            return Err(ApiError::InvalidCandidate(candidate.to_string()));
        }

        store.users().update(|users| {
            let user = users
                .get_mut(voter.username())
                .ok_or(ApiError::Unauthenticated)?;
            if user.voted {
                return Err(ApiError::AlreadyVoted);
            }
            user.voted = true;
            Ok(())
        })?;

        store
            .tally()
            .update(|tally| {
                *tally.entry(candidate.to_string()).or_insert(0) += 1;
                Ok::<_, ApiError>(())
            })
            .map_err(|e| {
                error!(
                    "User {} is marked as voted but the vote for {} was not counted: {}",
                    voter.username(),
                    candidate,
                    e
                );
                e
            })?;

        info!("Recorded vote from {} for {}", voter.username(), candidate);
        Ok(())
    }

    pub fn has_voted(store: &Store, voter: &Voter) -> Result<bool, ApiError> {
        Ok(store
            .users()
            .read()?
            .get(voter.username())
            .is_some_and(|user| user.voted))
    }

    /// Current tally, or an empty one when the store cannot be read.
    pub fn tally_or_empty(store: &Store) -> TallyTable {
        store.tally().read().unwrap_or_else(|e| {
            warn!("Serving empty results: {}", e);
            TallyTable::new()
        })
    }

    pub fn results(store: &Store) -> Results {
        Results::from_tally(&Self::tally_or_empty(store))
    }
}
