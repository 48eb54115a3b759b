//! What to capture and where to send it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dump::output::DumpOutput;

/// Capture policy for request/response dumps.
///
/// Presets are exclusive overwrites: each one clears all four capture flags
/// before setting its own pair.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub request_head: bool,
    pub request_body: bool,
    pub response_head: bool,
    pub response_body: bool,
    /// Write records from a background worker instead of the request path.
    pub async_mode: bool,
    /// Destination. `None` means records are discarded.
    pub output: Option<DumpOutput>,
}

impl DumpOptions {
    /// Options with every flag off and no destination.
    pub fn empty() -> Self {
        Self {
            request_head: false,
            request_body: false,
            response_head: false,
            response_body: false,
            async_mode: false,
            output: None,
        }
    }

    /// Capture request head and body only.
    pub fn only_request(&mut self) -> &mut Self {
        self.set_flags(true, true, false, false)
    }

    /// Capture response head and body only.
    pub fn only_response(&mut self) -> &mut Self {
        self.set_flags(false, false, true, true)
    }

    /// Capture the heads of both sides.
    pub fn only_head(&mut self) -> &mut Self {
        self.set_flags(true, false, true, false)
    }

    /// Capture the bodies of both sides.
    pub fn only_body(&mut self) -> &mut Self {
        self.set_flags(false, true, false, true)
    }

    /// Capture everything.
    pub fn all(&mut self) -> &mut Self {
        self.set_flags(true, true, true, true)
    }

    fn set_flags(
        &mut self,
        request_head: bool,
        request_body: bool,
        response_head: bool,
        response_body: bool,
    ) -> &mut Self {
        self.request_head = request_head;
        self.request_body = request_body;
        self.response_head = response_head;
        self.response_body = response_body;
        self
    }

    /// The four capture flags as `(req_head, req_body, resp_head, resp_body)`.
    pub fn flags(&self) -> (bool, bool, bool, bool) {
        (
            self.request_head,
            self.request_body,
            self.response_head,
            self.response_body,
        )
    }

    pub fn captures_request(&self) -> bool {
        self.request_head || self.request_body
    }

    pub fn captures_response(&self) -> bool {
        self.response_head || self.response_body
    }
}

impl Default for DumpOptions {
    /// Capture everything to stdout, synchronously.
    fn default() -> Self {
        Self {
            request_head: true,
            request_body: true,
            response_head: true,
            response_body: true,
            async_mode: false,
            output: Some(DumpOutput::stdout()),
        }
    }
}

/// Named capture preset, as selected from config files and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpPreset {
    #[default]
    All,
    Head,
    Body,
    Request,
    Response,
}

impl DumpPreset {
    pub fn apply(self, opts: &mut DumpOptions) {
        match self {
            DumpPreset::All => opts.all(),
            DumpPreset::Head => opts.only_head(),
            DumpPreset::Body => opts.only_body(),
            DumpPreset::Request => opts.only_request(),
            DumpPreset::Response => opts.only_response(),
        };
    }
}

impl FromStr for DumpPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(DumpPreset::All),
            "head" => Ok(DumpPreset::Head),
            "body" => Ok(DumpPreset::Body),
            "request" => Ok(DumpPreset::Request),
            "response" => Ok(DumpPreset::Response),
            other => Err(format!(
                "unknown dump preset '{other}' (expected all, head, body, request or response)"
            )),
        }
    }
}

impl fmt::Display for DumpPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DumpPreset::All => "all",
            DumpPreset::Head => "head",
            DumpPreset::Body => "body",
            DumpPreset::Request => "request",
            DumpPreset::Response => "response",
        };
        f.write_str(name)
    }
}
