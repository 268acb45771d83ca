//! Sensor node HTTP head codec
//!
//! The node answers plain HTTP/1.x `GET` scrapes from browsers and metric
//! collectors. Only the request head is ever read: bodies are ignored and
//! every response closes the connection.
//!
//! ```text
//! GET /metrics?verbose=1 HTTP/1.1\r\n      request line
//! Host: sensor-01.kingdom.local\r\n        headers (skipped)
//! \r\n                                     end of head
//! ```
//!
//! Responses carry a status line, `Content-Type`, `Content-Length` and
//! `Connection: close`, followed by the body written by the caller.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod request;
pub mod response;

pub use request::{find_head_end, parse_request, Arg, Method, ParseError, Request, MAX_ARGS};
pub use response::{content_type, ResponseHead, StatusCode, MAX_HEAD_LEN};
