//! Console command handler.
//!
//! Reads one tool name per line and answers each with the tool's text. This
//! is the interactive stand-in for an RPC shim driving the relay.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::tools::{RelayTools, Tool};

/// Help text listing every command the console accepts.
pub fn help_text() -> String {
    let mut text = String::from("Commands:\n");
    for tool in Tool::ALL {
        text.push_str(&format!("  {:<7} {}\n", tool.name(), tool.description()));
    }
    text.push_str("  help    show this list\n");
    text.push_str("  quit    stop the server if running, then exit\n");
    text
}

/// Drive `tools` from `input` until `quit` or end of input.
///
/// A server still running when the session ends is stopped the same way
/// the `stop` tool does it.
pub async fn run<R, W>(tools: &RelayTools, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        debug!(command, "Console command");

        let reply = match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" | "?" => help_text(),
            _ => match command.parse::<Tool>() {
                Ok(tool) => tools.run(tool).await,
                Err(e) => format!("{e}. Type 'help' for the list of commands."),
            },
        };
        write_reply(output, &reply).await?;
    }

    if tools.server().is_running().await {
        let reply = tools.stop().await;
        write_reply(output, &reply).await?;
    }
    Ok(())
}

async fn write_reply<W: AsyncWrite + Unpin>(output: &mut W, reply: &str) -> Result<()> {
    output.write_all(reply.as_bytes()).await?;
    if !reply.ends_with('\n') {
        output.write_all(b"\n").await?;
    }
    output.flush().await?;
    Ok(())
}

pub async fn execute(ctx: &CliContext) -> Result<()> {
    println!("tailrelay console. Type 'help' for commands.");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run(ctx.tools(), stdin, &mut stdout).await
}
