//! Request routing and responses
//!
//! The node serves two read-only pages and answers everything else with a
//! plain-text 404 that echoes what it was asked for.

use alloc::string::String;
use core::fmt::Write;

use terrasense_protocol::{content_type, Request, StatusCode};

use crate::config::Identity;
use crate::render::{render_exposition, render_human};
use crate::state::NodeState;
use crate::traits::{RequestHandler, SystemInfo};

/// Known routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// `/` - human status page
    Root,
    /// `/metrics` - metrics exposition
    Metrics,
    /// Anything else
    NotFound,
}

impl Route {
    /// Match a request path; the query string is not part of the match
    pub fn resolve(path: &str) -> Self {
        match path {
            "/" => Route::Root,
            "/metrics" => Route::Metrics,
            _ => Route::NotFound,
        }
    }
}

/// A complete response ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type,
            body,
        }
    }

    /// Plain-text diagnostic for an unmatched request
    ///
    /// ```text
    /// File Not Found
    ///
    /// URI: /missing
    /// Method: GET
    /// Arguments: 1
    ///  a: 1
    /// ```
    pub fn not_found(request: &Request<'_>) -> Self {
        let mut body = String::new();
        // Writing into a String cannot fail.
        let _ = write!(
            body,
            "File Not Found\n\nURI: {}\nMethod: {}\nArguments: {}\n",
            request.path,
            request.method.as_str(),
            request.args.len()
        );
        for arg in &request.args {
            let _ = writeln!(body, " {}: {}", arg.name, arg.value);
        }
        Self {
            status: StatusCode::NotFound,
            content_type: content_type::TEXT_PLAIN,
            body,
        }
    }

    /// Plain-text reply for a request head that could not be parsed
    pub fn bad_request() -> Self {
        Self {
            status: StatusCode::BadRequest,
            content_type: content_type::TEXT_PLAIN,
            body: String::from("Bad Request\n"),
        }
    }
}

/// Answers requests from a borrowed view of the node
pub struct Responder<'a, Y> {
    state: &'a NodeState,
    identity: &'a Identity,
    system: &'a Y,
}

impl<'a, Y: SystemInfo> Responder<'a, Y> {
    pub fn new(state: &'a NodeState, identity: &'a Identity, system: &'a Y) -> Self {
        Self {
            state,
            identity,
            system,
        }
    }
}

impl<Y: SystemInfo> RequestHandler for Responder<'_, Y> {
    fn handle(&self, request: &Request<'_>) -> Response {
        match Route::resolve(request.path) {
            Route::Root => Response::ok(
                content_type::TEXT_HTML,
                render_human(self.state, self.identity),
            ),
            Route::Metrics => Response::ok(
                content_type::TEXT_PLAIN,
                render_exposition(self.state, self.identity, &self.system.snapshot()),
            ),
            Route::NotFound => Response::not_found(request),
        }
    }
}
