//! CLI argument parsing and subcommand handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use narwhal::{
    Client, ConfigFile,
    schema::{
        AudioSpeechQuery, ChatMessage, ChatQuery, EmbeddingsQuery, ModelQuery, ModerationsQuery,
        Voice,
    },
};
use std::path::PathBuf;

pub mod stream;

/// Default model for chat commands.
pub const CHAT_MODEL: &str = "gpt-4o-mini";

/// Default model for `embed`.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default model for `speech`.
pub const SPEECH_MODEL: &str = "tts-1";

/// Narwhal inference client.
#[derive(Parser, Debug)]
#[command(name = "narwhal", about = "Narwhal inference client")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path of the client configuration.
    #[arg(long, global = true, default_value = "narwhal.toml")]
    pub config: PathBuf,

    /// Model name override.
    #[arg(long, global = true)]
    pub model: Option<String>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available models.
    Models,
    /// Show one model.
    Model {
        /// Model identifier.
        id: String,
    },
    /// Ask a single question and print the answer.
    Chat {
        /// Message content.
        prompt: String,
    },
    /// Ask a question and print the answer as it is generated.
    Stream {
        /// Message content.
        prompt: String,
    },
    /// Print the embedding of a text.
    Embed {
        /// Text to embed.
        text: String,
    },
    /// Classify a text against the moderation policy.
    Moderate {
        /// Text to classify.
        text: String,
    },
    /// Synthesize speech into a file.
    Speech {
        /// Text to speak.
        text: String,
        /// Output file.
        #[arg(long, short)]
        out: PathBuf,
        /// Voice name.
        #[arg(long, default_value = "alloy")]
        voice: String,
    },
}

impl Cli {
    /// Load the configuration and run the subcommand.
    pub async fn run(self) -> Result<()> {
        let config = ConfigFile::load(&self.config)?.into_config();
        tracing::debug!(?config, "loaded {}", self.config.display());
        let client = Client::new(config);
        let model = |default: &str| self.model.clone().unwrap_or_else(|| default.to_owned());

        match &self.command {
            Command::Models => {
                for model in client.models().await?.data {
                    println!("{}\t{}", model.id, model.owned_by);
                }
            }
            Command::Model { id } => {
                let model = client.model(&ModelQuery::new(id.as_str())).await?;
                println!("{}", serde_json::to_string_pretty(&model)?);
            }
            Command::Chat { prompt } => {
                let messages = vec![ChatMessage::user(prompt.as_str())];
                let query = ChatQuery::new(model(CHAT_MODEL), messages);
                let result = client.chats(&query).await?;
                println!("{}", result.content().unwrap_or_default());
            }
            Command::Stream { prompt } => {
                let messages = vec![ChatMessage::user(prompt.as_str())];
                let query = ChatQuery::new(model(CHAT_MODEL), messages);
                stream::chat(&client, &query, &mut std::io::stdout()).await?;
                println!();
            }
            Command::Embed { text } => {
                let query = EmbeddingsQuery::new(model(EMBEDDING_MODEL), text.as_str());
                let result = client.embeddings(&query).await?;
                let embedding = result
                    .data
                    .into_iter()
                    .next()
                    .context("server returned no embedding")?;
                println!("{}", serde_json::to_string(&embedding.embedding)?);
            }
            Command::Moderate { text } => {
                let mut query = ModerationsQuery::new(text.as_str());
                query.model = self.model.clone();
                let result = client.moderations(&query).await?;
                for verdict in result.results {
                    println!("{}", serde_json::to_string_pretty(&verdict)?);
                }
            }
            Command::Speech { text, out, voice } => {
                let voice = parse_voice(voice)?;
                let query = AudioSpeechQuery::new(model(SPEECH_MODEL), text.as_str(), voice);
                let result = client.audio_create_speech(&query).await?;
                std::fs::write(out, &result.audio)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("wrote {} bytes to {}", result.audio.len(), out.display());
            }
        }

        Ok(())
    }
}

/// Parse a voice by its wire name, e.g. `alloy`.
pub fn parse_voice(name: &str) -> Result<Voice> {
    serde_json::from_value(serde_json::Value::String(name.to_lowercase()))
        .with_context(|| format!("unknown voice {name}"))
}
