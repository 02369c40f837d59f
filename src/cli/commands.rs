//! CLI command handlers for chat, inquiries, and the knowledge base.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::{ChatArgs, InquireArgs, KbCommands};
use crate::agent::HttpAgentClient;
use crate::chat::ConversationSession;
use crate::config::ConciergeConfig;
use crate::inquiry::{InquiryForm, InquiryWorkflow, SubmitOutcome, TeamContact};
use crate::knowledge::{HttpKnowledgeStore, KnowledgeBaseManager, UploadFile};
use crate::render::render;
use crate::types::{Message, Status, StatusKind};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Handle `concierge chat [PROMPT]`.
pub async fn handle_chat(config: &ConciergeConfig, args: ChatArgs) -> CliResult {
    let agent_id = args
        .agent_id
        .unwrap_or_else(|| config.chat_agent_id.clone());
    let client = Arc::new(HttpAgentClient::from_config(config));
    let mut session = ConversationSession::new(client, agent_id);

    let mut stdout = std::io::stdout();
    if let Some(prompt) = args.prompt {
        if let Some(reply) = session.send(&prompt).await {
            write_reply(&mut stdout, reply)?;
        }
        return Ok(());
    }

    eprintln!("Type a message and press enter. Ctrl-D to quit.");
    chat_loop(&mut session, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    Ok(())
}

/// Send each input line as a turn until end of input. Returns the number of
/// replies written.
pub async fn chat_loop<R, W>(
    session: &mut ConversationSession,
    input: R,
    out: &mut W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut replies = 0;
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        // Blank lines are not sent.
        if let Some(reply) = session.send(&line).await {
            write_reply(out, reply)?;
            replies += 1;
        }
    }
    writeln!(out)?;
    Ok(replies)
}

fn write_reply<W: Write>(out: &mut W, reply: &Message) -> std::io::Result<()> {
    writeln!(out, "[{}]", reply.timestamp())?;
    for block in render(reply.text()) {
        writeln!(out, "{block}")?;
    }
    Ok(())
}

/// Handle `concierge inquire ...`.
pub async fn handle_inquire(config: &ConciergeConfig, args: InquireArgs) -> CliResult {
    let client = Arc::new(HttpAgentClient::from_config(config));
    let member = TeamContact::new(args.member_name, args.member_email);
    let mut workflow = InquiryWorkflow::new(client, &config.inquiry_agent_id, member);
    workflow.set_form(InquiryForm {
        name: args.name,
        email: args.email,
        interest_type: args.interest,
        message: args.message,
    });

    match workflow.submit().await {
        SubmitOutcome::Incomplete => {
            let missing = workflow.form().missing_fields().join(", ");
            Err(format!("Missing required fields: {missing}").into())
        }
        SubmitOutcome::Sent => report_status(workflow.status()),
    }
}

/// Handle `concierge kb <list|upload|delete>`.
pub async fn handle_kb(config: &ConciergeConfig, command: KbCommands) -> CliResult {
    let store = Arc::new(HttpKnowledgeStore::from_config(config));
    let mut manager = KnowledgeBaseManager::new(store, &config.knowledge_base_id);

    match command {
        KbCommands::List => {
            let snapshot = manager.refresh().await?;
            if snapshot.is_empty() {
                println!("No documents in knowledge base {}.", config.knowledge_base_id);
            }
            for doc in &snapshot.documents {
                println!("  {}", doc.file_name);
            }
            Ok(())
        }
        KbCommands::Upload(args) => {
            let file = UploadFile::from_path(&args.path).await?;
            println!("⏳ Uploading {}...", file.file_name());
            manager.upload_and_train(&file).await;
            report_status(manager.status())
        }
        KbCommands::Delete(args) => {
            manager.delete(&args.file_name).await;
            report_status(manager.status())
        }
    }
}

fn report_status(status: &Status) -> CliResult {
    match status.kind {
        StatusKind::Success => {
            println!("✅ {}", status.message);
            Ok(())
        }
        StatusKind::Error => Err(status.message.clone().into()),
        StatusKind::None => Ok(()),
    }
}
