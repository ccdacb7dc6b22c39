use anyhow::Result;
use clap::Parser;
use stockchat_client::{ChatClient, ClientError, MessageList};
use stockchat_types::Role;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

#[derive(Parser)]
#[command(name = "stockchat-cli", version, about = "Chat with a stockchat server")]
struct Cli {
    /// Server root URL.
    #[arg(long, env = "STOCKCHAT_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Log requests and raw stream bodies to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Send one message and exit. Without it, read messages from stdin.
    message: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose { "stockchat_client=debug" } else { "error" })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = ChatClient::new(&cli.server)?;
    debug!(endpoint = %client.endpoint(), "client ready");

    let mut conversation = MessageList::new();
    match cli.message {
        Some(message) => {
            client.ask(&mut conversation, message).await?;
            print_from(&conversation, 1);
        }
        None => repl(&client, &mut conversation).await?,
    }
    Ok(())
}

async fn repl(client: &ChatClient, conversation: &mut MessageList) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let before = conversation.len();
        match client.ask(conversation, line).await {
            // Skip the echoed user message.
            Ok(_) => print_from(conversation, before + 1),
            Err(ClientError::Api { message, .. }) => eprintln!("error: {message}"),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

fn print_from(conversation: &MessageList, start: usize) {
    for message in conversation.messages().iter().skip(start) {
        match message.role {
            Role::Assistant => println!("{}", message.content),
            role => println!("[{role}] {}", message.content),
        }
    }
}
