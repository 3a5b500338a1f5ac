//! ---
//! courier_section: "05-external-interfaces"
//! courier_subsection: "binary"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Command line tool to build, inspect and answer envelopes."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use anyhow::{Context, Result};
use clap::Args;
use courier_common::CourierConfig;
use courier_envelope::EnvelopeBuilder;
use tracing::info;

use crate::input::{parse_header, print_envelope};

#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Sender; defaults to `envelope.sender` from the configuration.
    #[arg(long, value_name = "NAME")]
    sender: Option<String>,

    /// Envelope id; a random UUID when omitted.
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Message-Type header (Simple, Reply, Command or a custom tag).
    #[arg(long = "type", value_name = "TYPE")]
    message_type: Option<String>,

    /// Command header.
    #[arg(long, value_name = "COMMAND")]
    command: Option<String>,

    /// Replies-To header.
    #[arg(long = "replies-to", value_name = "ID")]
    replies_to: Option<String>,

    /// Content-Type header (Plain, JSON or a custom tag); `Plain` when omitted.
    #[arg(long = "content-type", value_name = "TAG")]
    content_type: Option<String>,

    /// Extra header as KEY=VALUE; repeatable, later flags win.
    #[arg(long = "header", value_name = "KEY=VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Header names the receiver should copy into its reply.
    #[arg(long = "copy-headers", value_name = "NAME", value_delimiter = ',')]
    copy_headers: Vec<String>,

    /// Raw payload.
    #[arg(long, value_name = "TEXT", default_value = "")]
    payload: String,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl BuildCommand {
    pub fn execute(self, config: &CourierConfig) -> Result<()> {
        let pretty = self.pretty;
        let envelope = self
            .into_builder(config)
            .build()
            .context("envelope could not be built")?;
        info!(
            envelope_id = envelope.id(),
            message_type = envelope.message_type().unwrap_or("-"),
            "envelope built"
        );
        print_envelope(&envelope, pretty)
    }

    fn into_builder(self, config: &CourierConfig) -> EnvelopeBuilder {
        let mut builder = config.envelope_factory().create();
        if let Some(sender) = self.sender {
            builder = builder.with_sender(sender);
        }
        if let Some(id) = self.id {
            builder = builder.with_id(id);
        }
        if let Some(message_type) = self.message_type {
            builder = builder.message_type(message_type);
        }
        if let Some(command) = self.command {
            builder = builder.command(command);
        }
        if let Some(replies_to) = self.replies_to {
            builder = builder.replies_to(replies_to);
        }
        if let Some(content_type) = self.content_type {
            builder = builder.content_type(content_type);
        }
        if !self.copy_headers.is_empty() {
            builder = builder.copy_headers(self.copy_headers.iter().map(|name| name.trim()));
        }
        builder.with_headers(self.headers).with_payload(self.payload)
    }
}
