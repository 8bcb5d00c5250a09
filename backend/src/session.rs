use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

pub const SESSION_COOKIE: &str = "ballot_box_user";

/// Authenticated caller, read from the encrypted session cookie.
///
/// Handlers take `Option<Voter>` and pass the identity explicitly into the
/// services; an absent cookie forwards so that `None` reaches the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voter {
    username: String,
}

impl Voter {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Voter {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.cookies().get_private(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => Outcome::Success(Voter::new(cookie.value())),
            _ => Outcome::Forward(Status::Unauthorized),
        }
    }
}

pub fn begin(cookies: &CookieJar<'_>, voter: &Voter) {
    let cookie = Cookie::build((SESSION_COOKIE, voter.username().to_string()))
        .http_only(true)
        .same_site(SameSite::Lax);
    cookies.add_private(cookie);
}

pub fn end(cookies: &CookieJar<'_>) {
    cookies.remove_private(SESSION_COOKIE);
}
