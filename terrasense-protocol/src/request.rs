//! Request head parsing
//!
//! Parsing borrows from the receive buffer; nothing is copied. Query
//! arguments are split on `&` and `=` but not percent-decoded, so the
//! not-found echo shows them exactly as the client sent them.

use heapless::Vec;

/// Maximum number of query arguments kept per request
pub const MAX_ARGS: usize = 8;

/// End-of-head marker
const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Errors that can occur while parsing a request head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// No `\r\n\r\n` terminator in the buffer yet
    Incomplete,
    /// Head is not valid UTF-8
    InvalidUtf8,
    /// Request line has no method token
    MissingMethod,
    /// Method token is not one we recognise
    UnknownMethod,
    /// Request line has no target
    MissingTarget,
    /// Request line has no protocol version
    MissingVersion,
    /// Protocol version is not HTTP/1.x
    UnsupportedVersion,
    /// More than [`MAX_ARGS`] query arguments
    TooManyArgs,
    /// Output buffer too small for an encoded head
    BufferTooSmall,
}

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    /// Parse a method token (case-sensitive, as on the wire)
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "OPTIONS" => Some(Method::Options),
            "PATCH" => Some(Method::Patch),
            _ => None,
        }
    }

    /// Wire name of the method
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

/// One `name=value` query argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Arg<'a> {
    pub name: &'a str,
    /// Empty when the argument had no `=`
    pub value: &'a str,
}

/// A parsed request head
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request<'a> {
    /// Request method
    pub method: Method,
    /// Full request target as sent (`/metrics?x=1`)
    pub target: &'a str,
    /// Target up to the first `?`
    pub path: &'a str,
    /// Raw query string after the `?`, if any
    pub query: Option<&'a str>,
    /// Query arguments in the order they appeared
    pub args: Vec<Arg<'a>, MAX_ARGS>,
}

impl<'a> Request<'a> {
    /// Look up the first argument with the given name
    pub fn arg(&self, name: &str) -> Option<&'a str> {
        self.args.iter().find(|a| a.name == name).map(|a| a.value)
    }
}

/// Find the end of the request head
///
/// Returns the offset just past the `\r\n\r\n` terminator.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .map(|pos| pos + HEAD_TERMINATOR.len())
}

/// Parse a request head from the start of `buf`
///
/// Header lines after the request line are tolerated but not interpreted.
pub fn parse_request(buf: &[u8]) -> Result<Request<'_>, ParseError> {
    let end = find_head_end(buf).ok_or(ParseError::Incomplete)?;
    let head = core::str::from_utf8(&buf[..end]).map_err(|_| ParseError::InvalidUtf8)?;

    let line = head.split("\r\n").next().unwrap_or("");
    let mut tokens = line.split(' ').filter(|t| !t.is_empty());

    let method_token = tokens.next().ok_or(ParseError::MissingMethod)?;
    let method = Method::parse(method_token).ok_or(ParseError::UnknownMethod)?;
    let target = tokens.next().ok_or(ParseError::MissingTarget)?;
    let version = tokens.next().ok_or(ParseError::MissingVersion)?;
    if !version.starts_with("HTTP/1.") {
        return Err(ParseError::UnsupportedVersion);
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    let mut args = Vec::new();
    if let Some(query) = query {
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            args.push(Arg { name, value })
                .map_err(|_| ParseError::TooManyArgs)?;
        }
    }

    Ok(Request {
        method,
        target,
        path,
        query,
        args,
    })
}
