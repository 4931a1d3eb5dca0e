//! Helpers for router and extractor tests.

use axum::body::Body;
use axum::http::{header, Request};

pub const BOUNDARY: &str = "video-analyzer-test-boundary";

pub enum MultipartPart<'a> {
    File {
        name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

impl<'a> MultipartPart<'a> {
    pub fn file(name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        MultipartPart::File {
            name,
            content_type,
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        MultipartPart::Text { name, value }
    }
}

pub fn multipart_body(parts: &[MultipartPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            MultipartPart::File {
                name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload.bin\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            MultipartPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[MultipartPart<'_>]) -> Request<Body> {
    let body = multipart_body(parts);
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}
