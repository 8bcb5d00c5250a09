use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{catch, Either, Request};
use shared::{ErrorCode, ErrorResponse};

use crate::pages;

type Caught = Either<Json<ErrorResponse>, RawHtml<String>>;

fn respond(req: &Request, status: u16, message: &str) -> Caught {
    if req.uri().path().starts_with("/api") {
        Either::Left(Json(ErrorResponse::new(ErrorCode::from_status(status), message)))
    } else {
        Either::Right(pages::error(status, message))
    }
}

#[catch(400)]
pub fn bad_request(req: &Request) -> Caught {
    respond(req, 400, "Invalid request parameters.")
}

#[catch(403)]
pub fn forbidden(req: &Request) -> Caught {
    respond(req, 403, "Access forbidden.")
}

#[catch(404)]
pub fn not_found(req: &Request) -> Caught {
    respond(req, 404, "The requested page was not found.")
}

#[catch(422)]
pub fn unprocessable(req: &Request) -> Caught {
    respond(req, 422, "The submitted form is incomplete.")
}

#[catch(500)]
pub fn internal_error(req: &Request) -> Caught {
    respond(req, 500, "An internal server error occurred.")
}
