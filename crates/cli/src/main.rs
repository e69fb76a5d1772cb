use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use messenger::api::{
    MessengerClient, ProfileFieldsOptions, RequestOptions, SendOptions, SenderAction,
};
use messenger::config::{self, Config};
use messenger::incoming::{EventKind, MessagingEvent};
use messenger::templates::{self, AttachmentType, MessageOptions};
use messenger::webhook::{self, EventHandler};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "messenger")]
#[command(about = "Messenger Platform CLI", long_about = None)]
struct Cli {
    /// Config file path (default: MESSENGER_CONFIG_PATH or ~/.messenger/config.json)
    #[arg(long, short, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the webhook server with an echo bot: text is echoed back, postbacks and quick replies are acknowledged.
    Serve {
        /// Webhook port (default from config or 5000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send a text message to a page-scoped user id.
    Send {
        recipient: String,
        text: String,
    },

    /// Send a sender action (typing-on, typing-off, mark-seen).
    Action {
        recipient: String,
        action: SenderAction,
    },

    /// Fetch a user's profile.
    User { id: String },

    /// Read, set, or delete the page's messenger profile.
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Upload a reusable attachment from a URL and print its attachment id.
    Upload {
        /// image, video, audio, or file
        #[arg(value_parser = parse_upload_kind)]
        kind: AttachmentType,
        url: String,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the messenger profile.
    Get {
        /// Comma-separated fields (default: all known fields)
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },
    /// Set the messenger profile from a JSON file.
    Set { file: PathBuf },
    /// Delete messenger profile fields.
    Delete {
        /// Comma-separated fields (default: all known fields)
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Run with --help for usage");
        return;
    };
    if let Commands::Version = command {
        println!("messenger {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = run(cli.config, command).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config_path: Option<PathBuf>, command: Commands) -> anyhow::Result<()> {
    let (mut config, path) = config::load_config(config_path)?;
    log::debug!("using config {}", path.display());
    let client = config::build_client(&config);

    match command {
        Commands::Version => {}
        Commands::Serve { port } => {
            if let Some(p) = port {
                config.webhook.port = p;
            }
            run_serve(config, client).await?;
        }
        Commands::Send { recipient, text } => {
            let message = templates::text_message(text, MessageOptions::default());
            let res = client
                .send_message(&recipient, &message, SendOptions::default())
                .await?;
            print_json(&res)?;
        }
        Commands::Action { recipient, action } => {
            let res = client
                .send_sender_action(&recipient, action, RequestOptions::default())
                .await?;
            print_json(&res)?;
        }
        Commands::User { id } => {
            let profile = client.get_user_profile(&id, RequestOptions::default()).await?;
            print_json(&profile)?;
        }
        Commands::Profile { command } => run_profile(&client, command).await?,
        Commands::Upload { kind, url } => {
            let res = client
                .upload_attachment(kind, &url, RequestOptions::default())
                .await?;
            print_json(&res)?;
        }
    }
    Ok(())
}

async fn run_profile(client: &MessengerClient, command: ProfileCommand) -> anyhow::Result<()> {
    let res = match command {
        ProfileCommand::Get { fields } => {
            client
                .get_messenger_profile(ProfileFieldsOptions {
                    fields,
                    access_token: None,
                })
                .await?
        }
        ProfileCommand::Set { file } => {
            let s = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let profile: serde_json::Value = serde_json::from_str(&s)
                .with_context(|| format!("parsing {}", file.display()))?;
            client
                .set_messenger_profile(&profile, RequestOptions::default())
                .await?
        }
        ProfileCommand::Delete { fields } => {
            client
                .delete_messenger_profile(ProfileFieldsOptions {
                    fields,
                    access_token: None,
                })
                .await?
        }
    };
    print_json(&res)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Uploads are media only; templates cannot be saved as reusable attachments.
fn parse_upload_kind(s: &str) -> Result<AttachmentType, String> {
    match s.parse::<AttachmentType>()? {
        AttachmentType::Template => Err("template is not an uploadable attachment type".to_string()),
        kind => Ok(kind),
    }
}

async fn run_serve(config: Config, client: MessengerClient) -> anyhow::Result<()> {
    log::info!(
        "starting webhook on {}:{}",
        config.webhook.bind,
        config.webhook.port
    );
    let bot: Arc<dyn EventHandler> = Arc::new(EchoBot { client });
    webhook::run_webhook_server(config, bot).await
}

/// Demo bot: classify the event, build a reply, send it.
struct EchoBot {
    client: MessengerClient,
}

impl EchoBot {
    fn reply_for(event: &MessagingEvent) -> Option<templates::OutboundMessage> {
        let opts = MessageOptions::default();
        match event.kind() {
            EventKind::Text => event.text().map(|t| templates::text_message(t, opts)),
            EventKind::QuickReply => event
                .quick_reply_payload()
                .map(|p| templates::text_message(format!("quick reply: {}", p), opts)),
            EventKind::Postback => event
                .postback_payload()
                .map(|p| templates::text_message(format!("postback: {}", p), opts)),
            EventKind::Attachment => Some(templates::text_message(
                format!("received {} attachment(s)", event.attachments().len()),
                opts,
            )),
            _ => None,
        }
    }
}

#[async_trait]
impl EventHandler for EchoBot {
    async fn handle_event(&self, event: MessagingEvent) {
        let Some(sender) = event.sender_id() else {
            log::debug!("event without sender: {:?}", event.kind());
            return;
        };
        let Some(reply) = Self::reply_for(&event) else {
            log::debug!("no reply for {:?} from {}", event.kind(), sender);
            return;
        };
        if let Err(e) = self
            .client
            .send_sender_action(sender, SenderAction::TypingOn, RequestOptions::default())
            .await
        {
            log::debug!("typing indicator failed: {}", e);
        }
        match self
            .client
            .send_message(sender, &reply, SendOptions::default())
            .await
        {
            Ok(res) => log::info!("replied to {} ({})", res.recipient_id, res.message_id),
            Err(e) => log::warn!("reply to {} failed: {}", sender, e),
        }
    }
}
