//! Dump control on [`Client`].
//!
//! Every enabling call first materialises the default options (capture
//! everything to stdout), mutates them in place and then arms the transport
//! hook if it is not armed yet. Disabling detaches the hook but keeps the
//! options, so the next arm resumes where the client left off.

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::client::{read_shared, write_shared, Client};
use crate::dump::{DumpOptions, DumpOutput, DumpPreset};

impl Client {
    fn dump_options_mut(&mut self) -> Arc<RwLock<DumpOptions>> {
        Arc::clone(
            self.dump_options
                .get_or_insert_with(|| Arc::new(RwLock::new(DumpOptions::default()))),
        )
    }

    fn enable_dump(&mut self) {
        if self.transport.is_dump_enabled() {
            return;
        }
        let options = self.dump_options_mut();
        self.transport.attach_dump(options);
    }

    fn update_dump(&mut self, f: impl FnOnce(&mut DumpOptions)) -> &mut Self {
        let options = self.dump_options_mut();
        f(&mut write_shared(&options));
        self.enable_dump();
        self
    }

    /// `true` arms the dump hook, `false` detaches it. Options are kept
    /// either way.
    pub fn dump(&mut self, enable: bool) -> &mut Self {
        if enable {
            self.enable_dump();
        } else {
            self.transport.detach_dump();
        }
        self
    }

    /// Replace the dump options wholesale. An armed hook sees them on its
    /// next exchange; an unarmed client stays unarmed.
    pub fn set_dump_options(&mut self, options: DumpOptions) -> &mut Self {
        match &self.dump_options {
            Some(shared) => *write_shared(shared) = options,
            None => self.dump_options = Some(Arc::new(RwLock::new(options))),
        }
        self
    }

    pub fn dump_only_request(&mut self) -> &mut Self {
        self.update_dump(|opts| {
            opts.only_request();
        })
    }

    pub fn dump_only_response(&mut self) -> &mut Self {
        self.update_dump(|opts| {
            opts.only_response();
        })
    }

    pub fn dump_only_head(&mut self) -> &mut Self {
        self.update_dump(|opts| {
            opts.only_head();
        })
    }

    pub fn dump_only_body(&mut self) -> &mut Self {
        self.update_dump(|opts| {
            opts.only_body();
        })
    }

    pub fn dump_all(&mut self) -> &mut Self {
        self.update_dump(|opts| {
            opts.all();
        })
    }

    /// Apply a named preset and arm.
    pub fn dump_preset(&mut self, preset: DumpPreset) -> &mut Self {
        self.update_dump(|opts| preset.apply(opts))
    }

    /// Send dump records to `output` and arm.
    pub fn dump_to(&mut self, output: impl Into<DumpOutput>) -> &mut Self {
        let output = output.into();
        self.update_dump(|opts| opts.output = Some(output))
    }

    /// Create `path` and send dump records to it. If the file cannot be
    /// created the error goes to the logger and nothing changes.
    pub fn dump_to_file(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = path.as_ref();
        match DumpOutput::create_file(path) {
            Ok(output) => self.dump_to(output),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to create dump file"
                );
                crate::logf!(self.logger, "create dump file error: {}", e);
                self
            }
        }
    }

    /// Write dump records from a background worker and arm.
    pub fn dump_async(&mut self) -> &mut Self {
        self.update_dump(|opts| opts.async_mode = true)
    }

    pub fn is_dump_enabled(&self) -> bool {
        self.transport.is_dump_enabled()
    }

    /// Copy of the current dump options, if any were ever created.
    pub fn dump_options_snapshot(&self) -> Option<DumpOptions> {
        self.dump_options
            .as_ref()
            .map(|shared| read_shared(shared).clone())
    }

    /// Wait for queued async dump records to be written.
    ///
    /// Returns false if `timeout` elapsed first. Returns true immediately
    /// when dumping is off.
    pub async fn flush_dump(&self, timeout: Duration) -> bool {
        match self.transport.dumper() {
            Some(dumper) => dumper.flush(timeout).await,
            None => true,
        }
    }
}
