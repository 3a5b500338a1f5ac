//! ---
//! courier_section: "05-external-interfaces"
//! courier_subsection: "binary"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Command line tool to build, inspect and answer envelopes."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use courier_common::CourierConfig;
use tracing::info;

use crate::input::{parse_header, print_envelope, read_envelope};

#[derive(Debug, Args)]
pub struct ReplyCommand {
    /// Wire envelope being answered, or `-` for stdin.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Sender of the reply; defaults to `envelope.sender` from the configuration.
    #[arg(long, value_name = "NAME")]
    sender: Option<String>,

    /// Content-Type header of the reply; `Plain` when omitted.
    #[arg(long = "content-type", value_name = "TAG")]
    content_type: Option<String>,

    /// Extra header as KEY=VALUE; overrides copied headers of the same name.
    #[arg(long = "header", value_name = "KEY=VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Raw reply payload.
    #[arg(long, value_name = "TEXT", default_value = "")]
    payload: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl ReplyCommand {
    pub fn execute(self, config: &CourierConfig) -> Result<()> {
        let original = read_envelope(&self.input)?;
        let mut builder = config.envelope_factory().reply_for(&original);
        if let Some(sender) = self.sender {
            builder = builder.with_sender(sender);
        }
        if let Some(content_type) = self.content_type {
            builder = builder.content_type(content_type);
        }
        let reply = builder
            .with_headers(self.headers)
            .with_payload(self.payload)
            .build()
            .context("reply could not be built")?;
        info!(
            envelope_id = reply.id(),
            replies_to = original.id(),
            copied = original.copy_headers().len(),
            "reply built"
        );
        print_envelope(&reply, self.pretty)
    }
}
