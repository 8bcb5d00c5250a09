use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};
use tracing::{info, warn};

use crate::cache_control::NoStore;
use crate::catchers::{bad_request, forbidden, internal_error, not_found, unprocessable};
use crate::config::AppConfig;
use crate::routes::{
    add_candidate, admin, api_results, index, login, login_page, logout, register, register_page,
    reset_votes, results, static_file, submit_vote, vote_page, AppState,
};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<rocket::figment::Error>),
    #[error("Cannot open data store: {0}")]
    Store(#[from] StoreError),
}

/// Builds the application from a figment holding both Rocket's settings and
/// the [`AppConfig`] keys.
pub fn build(figment: Figment) -> Result<Rocket<Build>, BootError> {
    let config: AppConfig = figment.extract().map_err(Box::new)?;
    info!(
        "📂 Data directory {}, admin account '{}'",
        config.data_dir.display(),
        config.admin_username
    );

    let state = AppState::new(&config)?;
    match state.store.consistency_report() {
        Ok(report) if report.is_consistent() => {
            info!("✓ Stores consistent: {} vote(s) cast", report.total_votes)
        }
        Ok(report) => warn!(
            "⚠️ {} voter(s) but {} counted vote(s); an admin reset restores consistency",
            report.voted_users, report.total_votes
        ),
        Err(e) => warn!("⚠️ Cannot check store consistency: {}", e),
    }

    Ok(rocket::custom(figment)
        .attach(NoStore)
        .manage(state)
        .mount(
            "/",
            routes![
                index,
                register_page,
                register,
                login_page,
                login,
                logout,
                vote_page,
                submit_vote,
                results,
                api_results,
                admin,
                reset_votes,
                add_candidate,
                static_file
            ],
        )
        .register(
            "/",
            catchers![bad_request, forbidden, not_found, unprocessable, internal_error],
        ))
}
