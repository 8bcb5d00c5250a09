//! Server-rendered HTML. Every piece of user-supplied text goes through
//! [`esc`] before it reaches the markup.

use std::borrow::Cow;
use std::fmt::Write;

use rocket::http::RawStr;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use shared::models::{ConsistencyReport, Results};

use crate::admin::AdminOverview;
use crate::session::Voter;

fn esc(text: &str) -> Cow<'_, str> {
    RawStr::new(text).html_escape()
}

fn layout(title: &str, flash: Option<&FlashMessage<'_>>, voter: Option<&Voter>, body: &str) -> RawHtml<String> {
    let nav = match voter {
        Some(voter) => format!(
            r#"<span class="who">Signed in as <strong>{}</strong></span> <a href="/vote">Vote</a> <a href="/results">Results</a> <a href="/logout">Log out</a>"#,
            esc(voter.username())
        ),
        None => r#"<a href="/login">Log in</a> <a href="/register">Register</a> <a href="/results">Results</a>"#.to_string(),
    };

    let flash = flash
        .map(|f| format!(r#"<p class="flash {}">{}</p>"#, esc(f.kind()), esc(f.message())))
        .unwrap_or_default();

    RawHtml(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Ballot Box</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<header><a class="brand" href="/">Ballot Box</a><nav>{nav}</nav></header>
<main>
<h1>{title}</h1>
{flash}
{body}
</main>
</body>
</html>"#,
        title = esc(title),
    ))
}

pub fn home(flash: Option<&FlashMessage<'_>>, voter: Option<&Voter>) -> RawHtml<String> {
    let body = match voter {
        Some(_) => r#"<p>You are signed in. <a href="/vote">Cast your vote</a> or <a href="/results">see the results</a>.</p>"#,
        None => r#"<p>Register an account, log in and cast a single vote for your candidate.</p>
<p><a class="button" href="/register">Register</a> <a class="button" href="/login">Log in</a></p>"#,
    };
    layout("Welcome", flash, voter, body)
}

fn credentials_form(action: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">{submit}</button>
</form>"#
    )
}

pub fn register(flash: Option<&FlashMessage<'_>>) -> RawHtml<String> {
    let body = credentials_form("/register", "Register")
        + r#"<p>Already registered? <a href="/login">Log in</a>.</p>"#;
    layout("Register", flash, None, &body)
}

pub fn login(flash: Option<&FlashMessage<'_>>) -> RawHtml<String> {
    let body = credentials_form("/login", "Log in")
        + r#"<p>No account yet? <a href="/register">Register</a>.</p>"#;
    layout("Log in", flash, None, &body)
}

pub fn vote<'a>(
    flash: Option<&FlashMessage<'_>>,
    voter: &Voter,
    candidates: impl Iterator<Item = &'a String>,
    already_voted: bool,
) -> RawHtml<String> {
    if already_voted {
        let body = r#"<p>Your vote has been recorded. <a href="/results">See the results</a>.</p>"#;
        return layout("Vote", flash, Some(voter), body);
    }

    let mut options = String::new();
    for name in candidates {
        let _ = write!(
            options,
            r#"<label class="candidate"><input type="radio" name="candidate" value="{0}" required> {0}</label>"#,
            esc(name)
        );
    }

    let body = if options.is_empty() {
        "<p>There are no candidates on the ballot yet.</p>".to_string()
    } else {
        format!(
            r#"<form method="post" action="/submit_vote">
{options}
<button type="submit">Submit vote</button>
</form>"#
        )
    };
    layout("Vote", flash, Some(voter), &body)
}

fn results_table(results: &Results) -> String {
    if results.is_empty() {
        return "<p>No results are available.</p>".to_string();
    }

    let mut rows = String::new();
    for c in &results.candidates {
        let _ = write!(
            rows,
            r#"<tr{}><td>{}</td><td>{}</td><td>{:.1}%</td></tr>"#,
            if c.leading { r#" class="leading""# } else { "" },
            esc(&c.name),
            c.votes,
            c.percentage
        );
    }

    format!(
        r#"<table>
<thead><tr><th>Candidate</th><th>Votes</th><th>Share</th></tr></thead>
<tbody>{rows}</tbody>
<tfoot><tr><td>Total</td><td>{}</td><td></td></tr></tfoot>
</table>"#,
        results.total_votes
    )
}

pub fn results(flash: Option<&FlashMessage<'_>>, voter: Option<&Voter>, results: &Results) -> RawHtml<String> {
    let leaders = results.leaders();
    let summary = match leaders.as_slice() {
        [] => String::new(),
        [leader] => format!("<p>{} is leading.</p>", esc(leader)),
        tied => format!(
            "<p>Tied for the lead: {}.</p>",
            tied.iter().map(|name| esc(name)).collect::<Vec<_>>().join(", ")
        ),
    };
    let body = summary + &results_table(results);
    layout("Results", flash, voter, &body)
}

fn consistency(report: &ConsistencyReport) -> String {
    if report.is_consistent() {
        format!(
            r#"<p class="ok">Stores are consistent: {} voter(s), {} vote(s).</p>"#,
            report.voted_users, report.total_votes
        )
    } else {
        format!(
            r#"<p class="warning">Stores disagree: {} voter(s) but {} counted vote(s) ({} unrecorded). Resetting votes restores consistency.</p>"#,
            report.voted_users,
            report.total_votes,
            report.unrecorded_votes()
        )
    }
}

pub fn admin(flash: Option<&FlashMessage<'_>>, voter: &Voter, overview: &AdminOverview) -> RawHtml<String> {
    let mut body = String::new();

    if let Some(problem) = &overview.problem {
        let _ = write!(
            body,
            r#"<p class="warning">Data store problem: {}. Resetting votes reinitializes an unreadable tally.</p>"#,
            esc(problem)
        );
    }
    if let Some(report) = &overview.report {
        body += &consistency(report);
    }
    if let Some(users) = overview.registered_users {
        let _ = write!(body, "<p>{} registered user(s).</p>", users);
    }
    if let Some(tally) = &overview.tally {
        body += &results_table(&Results::from_tally(tally));
    }

    body += r#"<h2>Add candidate</h2>
<form method="post" action="/admin/add_candidate">
<label>Name <input name="name" required></label>
<button type="submit">Add</button>
</form>
<h2>Reset</h2>
<p><a class="button danger" href="/admin/reset_votes">Reset all votes</a></p>"#;

    layout("Administration", flash, Some(voter), &body)
}

pub fn error(status: u16, message: &str) -> RawHtml<String> {
    let body = format!(
        r#"<p class="status">{}</p><p>{}</p><p><a href="/">Back to the start page</a></p>"#,
        status,
        esc(message)
    );
    layout("Something went wrong", None, None, &body)
}
