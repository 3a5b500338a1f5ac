//! ---
//! courier_section: "05-external-interfaces"
//! courier_subsection: "binary"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Command line tool to build, inspect and answer envelopes."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use courier_envelope::Envelope;
use serde::Serialize;
use tracing::warn;

use crate::input::read_envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Args)]
pub struct InspectCommand {
    /// Wire envelope file, or `-` for stdin.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output format of the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Everything worth knowing about an envelope at a glance.
#[derive(Debug, Serialize)]
struct EnvelopeSummary {
    id: String,
    sender: String,
    timestamp: String,
    message_type: Option<String>,
    content_type: Option<String>,
    replies_to: Option<String>,
    command: Option<String>,
    copy_headers: Vec<String>,
    /// Companion header the message type requires but the envelope lacks.
    missing_header: Option<String>,
    headers: BTreeMap<String, String>,
    payload_bytes: usize,
}

impl EnvelopeSummary {
    fn of(envelope: &Envelope) -> Self {
        Self {
            id: envelope.id().to_owned(),
            sender: envelope.sender().to_owned(),
            timestamp: envelope.timestamp().to_rfc3339(),
            message_type: envelope.message_type().map(str::to_owned),
            content_type: envelope.content_type().map(str::to_owned),
            replies_to: envelope.replies_to().map(str::to_owned),
            command: envelope.command().map(str::to_owned),
            copy_headers: envelope
                .copy_headers()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            missing_header: envelope
                .missing_required_header()
                .map(|header| header.as_str().to_owned()),
            headers: envelope.headers().to_map(),
            payload_bytes: envelope.payload().len(),
        }
    }

    fn render_text(&self) -> String {
        let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_owned());
        let mut lines = vec![
            format!("id:             {}", self.id),
            format!("sender:         {}", self.sender),
            format!("timestamp:      {}", self.timestamp),
            format!("message type:   {}", or_dash(&self.message_type)),
            format!("content type:   {}", or_dash(&self.content_type)),
            format!("replies to:     {}", or_dash(&self.replies_to)),
            format!("command:        {}", or_dash(&self.command)),
            format!("copy headers:   {}", self.copy_headers.join(", ")),
            format!("payload bytes:  {}", self.payload_bytes),
        ];
        if let Some(missing) = &self.missing_header {
            lines.push(format!("missing header: {missing}"));
        }
        lines.push("headers:".to_owned());
        lines.extend(
            self.headers
                .iter()
                .map(|(key, value)| format!("  {key}: {value}")),
        );
        lines.join("\n")
    }
}

impl InspectCommand {
    pub fn execute(self) -> Result<()> {
        let envelope = read_envelope(&self.input)?;
        let summary = EnvelopeSummary::of(&envelope);
        if let Some(missing) = &summary.missing_header {
            warn!(
                envelope_id = envelope.id(),
                missing_header = %missing,
                "envelope lacks a header required by its message type"
            );
        }
        let rendered = match self.format {
            OutputFormat::Text => summary.render_text(),
            OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
            OutputFormat::Yaml => serde_yaml::to_string(&summary)?,
        };
        println!("{}", rendered.trim_end());
        Ok(())
    }
}
