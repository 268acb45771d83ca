//! Request listener traits

use terrasense_protocol::Request;

use crate::http::Response;

/// Produces a response for a parsed request
///
/// Handlers only read node state; they never block or mutate it.
pub trait RequestHandler {
    fn handle(&self, request: &Request<'_>) -> Response;
}

/// The network side of the node
///
/// Each call services at most the exchanges pending right now and returns
/// within a bounded time whether or not a client showed up.
#[allow(async_fn_in_trait)]
pub trait RequestListener {
    async fn service_once<H: RequestHandler>(&mut self, handler: &H);
}
