//! One request/response exchange.
//!
//! # Responsibilities
//! - Dump the request head and body before sending
//! - Send through the pooled client, mapping failures to `ClientError`
//! - Dump the response head, then read, decode or discard the body
//!
//! # Design Decisions
//! - The dump policy is snapshotted once per exchange
//! - Discarded bodies are streamed chunk by chunk into the dump and dropped,
//!   unless the dump wants decoded text

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::dump::{format, DumpOptions, Dumper};
use crate::error::{ClientError, ClientResult};
use crate::http::Response;
use crate::transport::response_options::{is_text_content, ResponseOptionState};

/// Everything a request needs from its transport, frozen at request
/// creation. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct TransportHandle {
    http: reqwest::Client,
    response_options: ResponseOptionState,
    dumper: Option<Dumper>,
}

impl TransportHandle {
    pub(crate) fn new(
        http: reqwest::Client,
        response_options: ResponseOptionState,
        dumper: Option<Dumper>,
    ) -> Self {
        Self {
            http,
            response_options,
            dumper,
        }
    }

    pub fn response_options(&self) -> ResponseOptionState {
        self.response_options
    }

    pub fn dumper(&self) -> Option<&Dumper> {
        self.dumper.as_ref()
    }

    /// Execute `request` and buffer the response.
    pub async fn round_trip(&self, request: reqwest::Request) -> ClientResult<Response> {
        let timeout = request.timeout().copied();
        let dump = self.dumper.as_ref().map(|d| (d, d.snapshot()));

        if let Some((dumper, opts)) = &dump {
            if opts.captures_request() {
                dump_request(dumper, opts, &request);
            }
        }

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            timeout = ?timeout,
            "Sending request"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let url = response.url().clone();

        tracing::debug!(status = %status, url = %url, "Response received");

        let response_dump = dump.as_ref().filter(|(_, opts)| opts.captures_response());
        if let Some((dumper, opts)) = response_dump {
            if opts.response_head {
                dumper.write(opts, format::response_head(version, status, &headers));
            }
        }
        let body_dump = response_dump.filter(|(_, opts)| opts.response_body);

        let decode = self.response_options.auto_decode_text
            && headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(is_text_content);

        if self.response_options.discard_body {
            match body_dump {
                // The dump shows decoded text, so the body has to be read whole.
                Some((dumper, opts)) if decode => {
                    let text = response.text().await.map_err(|e| transport_error(e, timeout))?;
                    dumper.write(opts, format::body(text.as_bytes()));
                    tracing::trace!(bytes = text.len(), "Response body discarded");
                }
                _ => discard_body(response, body_dump, timeout).await?,
            }
            return Ok(Response::new(status, version, headers, url, Bytes::new(), true));
        }

        let body = if decode {
            Bytes::from(response.text().await.map_err(|e| transport_error(e, timeout))?)
        } else {
            response.bytes().await.map_err(|e| transport_error(e, timeout))?
        };

        if let Some((dumper, opts)) = body_dump {
            dumper.write(opts, format::body(&body));
        }

        Ok(Response::new(status, version, headers, url, body, false))
    }
}

/// Stream the raw body into the dump, if any, chunk by chunk.
async fn discard_body(
    mut response: reqwest::Response,
    body_dump: Option<&(&Dumper, DumpOptions)>,
    timeout: Option<Duration>,
) -> ClientResult<()> {
    let mut discarded = 0usize;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| transport_error(e, timeout))?
    {
        discarded += chunk.len();
        if let Some((dumper, opts)) = body_dump {
            dumper.write(opts, chunk.to_vec());
        }
    }
    if let Some((dumper, opts)) = body_dump {
        dumper.write(opts, b"\r\n".to_vec());
    }
    tracing::trace!(bytes = discarded, "Response body discarded");
    Ok(())
}

fn dump_request(dumper: &Dumper, opts: &DumpOptions, request: &reqwest::Request) {
    if opts.request_head {
        let head = format::request_head(
            request.method(),
            request.url(),
            request.version(),
            request.headers(),
        );
        dumper.write(opts, head);
    }
    if opts.request_body {
        if let Some(bytes) = request.body().and_then(|b| b.as_bytes()) {
            dumper.write(opts, format::body(bytes));
        }
    }
}

fn transport_error(e: reqwest::Error, timeout: Option<Duration>) -> ClientError {
    match timeout {
        Some(limit) if e.is_timeout() => ClientError::Timeout(limit),
        _ => ClientError::Transport(e),
    }
}
