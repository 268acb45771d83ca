//! Response head encoding

use core::fmt::Write;

use heapless::String;

use crate::request::ParseError;

/// Largest encoded response head
pub const MAX_HEAD_LEN: usize = 128;

/// Content types served by the node
pub mod content_type {
    pub const TEXT_HTML: &str = "text/html";
    pub const TEXT_PLAIN: &str = "text/plain";
}

/// Response status codes the node emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusCode {
    /// 200
    Ok,
    /// 400
    BadRequest,
    /// 404
    NotFound,
}

impl StatusCode {
    /// Numeric status code
    pub const fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Reason phrase for the status line
    pub const fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Everything needed to write a response head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseHead<'a> {
    pub status: StatusCode,
    pub content_type: &'a str,
    pub content_length: usize,
}

impl<'a> ResponseHead<'a> {
    pub const fn new(status: StatusCode, content_type: &'a str, content_length: usize) -> Self {
        Self {
            status,
            content_type,
            content_length,
        }
    }

    /// Write the head, including the blank line that ends it
    pub fn write_to<W: Write>(&self, out: &mut W) -> core::fmt::Result {
        write!(
            out,
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.content_length,
        )
    }

    /// Encode the head into a fixed-capacity string
    pub fn encode(&self) -> Result<String<MAX_HEAD_LEN>, ParseError> {
        let mut out = String::new();
        self.write_to(&mut out)
            .map_err(|_| ParseError::BufferTooSmall)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines() {
        assert_eq!(StatusCode::Ok.code(), 200);
        assert_eq!(StatusCode::BadRequest.code(), 400);
        assert_eq!(StatusCode::NotFound.code(), 404);
        assert_eq!(StatusCode::NotFound.reason(), "Not Found");
    }

    #[test]
    fn test_encode_head() {
        let head = ResponseHead::new(StatusCode::Ok, content_type::TEXT_PLAIN, 42)
            .encode()
            .unwrap();
        assert_eq!(
            head.as_str(),
            "HTTP/1.1 200 OK\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 42\r\n\
             Connection: close\r\n\
             \r\n"
        );
    }

    #[test]
    fn test_encode_rejects_oversized_head() {
        let long_type = "x".repeat(MAX_HEAD_LEN);
        let head = ResponseHead::new(StatusCode::Ok, &long_type, 0);
        assert_eq!(head.encode(), Err(ParseError::BufferTooSmall));
    }
}
