//! CLI entry point for Concierge.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Concierge CLI
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about = "Talk to the team agents and manage the knowledge base")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the team info agent
    Chat(ChatArgs),
    /// Send an inquiry to a team member
    Inquire(InquireArgs),
    /// Knowledge base management
    Kb(KbArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Override the configured chat agent id
    #[arg(long)]
    pub agent_id: Option<String>,

    /// One-shot prompt; omit for an interactive session
    pub prompt: Option<String>,
}

/// Arguments for the `inquire` subcommand.
#[derive(Parser, Debug)]
pub struct InquireArgs {
    /// Visitor name
    #[arg(long)]
    pub name: String,

    /// Visitor email
    #[arg(long)]
    pub email: String,

    /// Interest type (Course, Agent, Consultation, Other)
    #[arg(long, default_value = "Other")]
    pub interest: String,

    /// Inquiry message
    #[arg(short, long)]
    pub message: String,

    /// Team member the inquiry is for
    #[arg(long)]
    pub member_name: String,

    /// Address the inquiry is sent to
    #[arg(long)]
    pub member_email: String,
}

/// Arguments for the `kb` subcommand group.
#[derive(Parser, Debug)]
pub struct KbArgs {
    #[command(subcommand)]
    pub command: KbCommands,
}

/// Knowledge base subcommands.
#[derive(Subcommand, Debug)]
pub enum KbCommands {
    /// List documents
    List,
    /// Upload and train a document (.pdf, .docx, .txt)
    Upload(UploadArgs),
    /// Delete a document by file name
    Delete(DeleteArgs),
}

/// Arguments for `concierge kb upload`.
#[derive(Parser, Debug)]
pub struct UploadArgs {
    pub path: PathBuf,
}

/// Arguments for `concierge kb delete`.
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    pub file_name: String,
}
