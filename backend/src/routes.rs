use std::path::PathBuf;
use std::sync::Arc;

use include_dir::{include_dir, Dir};
use rocket::form::Form;
use rocket::http::{ContentType, CookieJar};
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::serde::json::Json;
use rocket::tokio::task;
use rocket::{get, post, State};
use shared::models::{CandidateForm, CredentialsForm, TallyTable, VoteForm};
use tracing::{debug, instrument};

use crate::admin::{Admin, AdminService};
use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::pages;
use crate::processor::VoteProcessor;
use crate::session::{self, Voter};
use crate::store::{Store, StoreError};

static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

pub struct AppState {
    pub store: Arc<Store>,
    pub auth: Arc<AuthService>,
    pub admin_username: String,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, StoreError> {
        Ok(Self {
            store: Arc::new(Store::open(&config.data_dir, &config.candidates)?),
            auth: Arc::new(AuthService::new(config.password_iterations)),
            admin_username: config.admin_username.clone(),
        })
    }
}

/// Runs password hashing and fsync'd rewrites off the async workers.
pub(crate) async fn blocking<T, F>(job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(job).await?
}

#[get("/")]
pub fn index(flash: Option<FlashMessage<'_>>, voter: Option<Voter>) -> RawHtml<String> {
    pages::home(flash.as_ref(), voter.as_ref())
}

#[get("/register")]
pub fn register_page(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    pages::register(flash.as_ref())
}

#[instrument(skip(state, form), fields(username = %form.username))]
#[post("/register", data = "<form>")]
pub async fn register(state: &State<AppState>, form: Form<CredentialsForm>) -> Result<Flash<Redirect>, ApiError> {
    let (store, auth) = (state.store.clone(), state.auth.clone());
    let form = form.into_inner();
    blocking(move || auth.register(&store, &form.username, &form.password)).await?;
    Ok(Flash::success(
        Redirect::to("/login"),
        "Registration successful, please log in.",
    ))
}

#[get("/login")]
pub fn login_page(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    pages::login(flash.as_ref())
}

#[instrument(skip(state, cookies, form), fields(username = %form.username))]
#[post("/login", data = "<form>")]
pub async fn login(
    state: &State<AppState>,
    cookies: &CookieJar<'_>,
    form: Form<CredentialsForm>,
) -> Result<Flash<Redirect>, ApiError> {
    let (store, auth) = (state.store.clone(), state.auth.clone());
    let form = form.into_inner();
    let voter = blocking(move || auth.login(&store, &form.username, &form.password)).await?;
    session::begin(cookies, &voter);
    Ok(Flash::success(
        Redirect::to("/vote"),
        format!("Welcome, {}!", voter.username()),
    ))
}

#[get("/logout")]
pub fn logout(cookies: &CookieJar<'_>) -> Flash<Redirect> {
    session::end(cookies);
    Flash::success(Redirect::to("/"), "You have been logged out.")
}

#[get("/vote")]
pub fn vote_page(
    state: &State<AppState>,
    flash: Option<FlashMessage<'_>>,
    voter: Option<Voter>,
) -> Result<RawHtml<String>, ApiError> {
    let voter = voter.ok_or(ApiError::Unauthenticated)?;
    let tally = state.store.tally().read()?;
    let already_voted = VoteProcessor::has_voted(&state.store, &voter)?;
    Ok(pages::vote(flash.as_ref(), &voter, tally.keys(), already_voted))
}

#[instrument(skip(state, voter, form), fields(candidate))]
#[post("/submit_vote", data = "<form>")]
pub async fn submit_vote(
    state: &State<AppState>,
    voter: Option<Voter>,
    form: Form<VoteForm>,
) -> Result<Flash<Redirect>, ApiError> {
    let voter = voter.ok_or(ApiError::Unauthenticated)?;
    let candidate = form.into_inner().candidate.unwrap_or_default();
    tracing::Span::current().record("candidate", candidate.as_str());

    let store = state.store.clone();
    blocking(move || VoteProcessor::submit_vote(&store, &voter, &candidate)).await?;
    Ok(Flash::success(Redirect::to("/results"), "Thank you, your vote was counted."))
}

#[get("/results")]
pub fn results(
    state: &State<AppState>,
    flash: Option<FlashMessage<'_>>,
    voter: Option<Voter>,
) -> RawHtml<String> {
    pages::results(flash.as_ref(), voter.as_ref(), &VoteProcessor::results(&state.store))
}

#[get("/api/results")]
pub fn api_results(state: &State<AppState>) -> Json<TallyTable> {
    Json(VoteProcessor::tally_or_empty(&state.store))
}

#[get("/admin")]
pub fn admin(
    state: &State<AppState>,
    flash: Option<FlashMessage<'_>>,
    voter: Option<Voter>,
) -> Result<RawHtml<String>, ApiError> {
    let admin = Admin::authorize(voter, &state.admin_username)?;
    let overview = AdminService::overview(&state.store, &admin);
    Ok(pages::admin(flash.as_ref(), &Voter::new(admin.username()), &overview))
}

#[instrument(skip(state, voter))]
#[get("/admin/reset_votes")]
pub async fn reset_votes(state: &State<AppState>, voter: Option<Voter>) -> Result<Flash<Redirect>, ApiError> {
    let admin = Admin::authorize(voter, &state.admin_username)?;
    let store = state.store.clone();
    blocking(move || AdminService::reset_all(&store, &admin)).await?;
    Ok(Flash::success(Redirect::to("/admin"), "All votes have been reset."))
}

#[instrument(skip(state, voter, form), fields(name = %form.name))]
#[post("/admin/add_candidate", data = "<form>")]
pub async fn add_candidate(
    state: &State<AppState>,
    voter: Option<Voter>,
    form: Form<CandidateForm>,
) -> Result<Flash<Redirect>, ApiError> {
    let admin = Admin::authorize(voter, &state.admin_username)?;
    let store = state.store.clone();
    let requested = form.into_inner().name;
    let name = blocking(move || AdminService::add_candidate(&store, &admin, &requested)).await?;
    Ok(Flash::success(Redirect::to("/admin"), format!("Added candidate {}.", name)))
}

#[get("/static/<path..>")]
pub fn static_file(path: PathBuf) -> Option<(ContentType, &'static [u8])> {
    let file = STATIC_DIR.get_file(&path)?;
    let content_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ContentType::from_extension)
        .unwrap_or(ContentType::Binary);
    debug!("Serving embedded asset {}", path.display());
    Some((content_type, file.contents()))
}
