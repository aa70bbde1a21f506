//! edge-tts-cli 文字转语音命令行工具：合成、批量合成、SSML 校验、语音查询与配置管理
//!
//! Usage:
//!   edge-tts-cli speak "Hello"                    Synthesize, save and play one text
//!   edge-tts-cli batch -f lines.txt               Synthesize every line of a file
//!   edge-tts-cli validate --file speech.xml       Check SSML markup
//!   edge-tts-cli voices --language en             List voices
//!   edge-tts-cli multilingual demos/multilingual.json

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use edge_tts_client::audio::AudioPlayer;
use edge_tts_client::batch::BatchStrategy;
use edge_tts_client::config::{ConfigManager, TtsConfig};
use edge_tts_client::ssml::{create_ssml_from_template, SsmlTemplate, SsmlValidator};
use edge_tts_client::utils::safe_filename;
use edge_tts_client::voice::{filter_by_gender, filter_by_language, Voice};
use edge_tts_client::TtsClient;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "edge-tts-cli", version)]
#[command(about = "Text-to-speech from the command line: synthesize, validate SSML, list voices")]
struct Cli {
    /// Configuration file (JSON or YAML); default search paths are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Start from a named preset instead of the default configuration
    #[arg(long, global = true, conflicts_with = "config")]
    preset: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize one text and save it
    Speak {
        /// Text to speak
        #[arg(required_unless_present = "ssml")]
        text: Option<String>,

        /// Raw SSML markup to synthesize instead of plain text
        #[arg(long, conflicts_with_all = ["text", "template"])]
        ssml: Option<String>,

        /// Speaking style template (see `templates`)
        #[arg(short, long)]
        template: Option<String>,

        #[arg(long)]
        rate: Option<String>,

        #[arg(long)]
        pitch: Option<String>,

        #[arg(long)]
        volume: Option<String>,

        /// Voice name (default from configuration)
        #[arg(long)]
        voice: Option<String>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not play the audio after saving it
        #[arg(long)]
        no_play: bool,
    },
    /// List available voices
    Voices {
        /// Language (`en`) or locale (`en-US`)
        #[arg(short, long)]
        language: Option<String>,

        #[arg(short, long)]
        gender: Option<String>,

        /// Show display name, locale and gender
        #[arg(short, long)]
        detailed: bool,
    },
    /// Synthesize many texts with bounded concurrency
    Batch {
        /// Texts to synthesize
        texts: Vec<String>,

        /// Read texts from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Maximum concurrent synthesis calls (default from configuration)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Process one text at a time
        #[arg(long, conflicts_with = "concurrency")]
        sequential: bool,

        /// Treat every text as SSML markup
        #[arg(long)]
        ssml: bool,

        #[arg(long)]
        voice: Option<String>,

        /// Output path template; `{}` is replaced by the 1-based item number
        #[arg(short, long)]
        output_template: Option<String>,
    },
    /// Validate SSML markup
    Validate {
        /// Markup to validate
        #[arg(required_unless_present = "file")]
        ssml: Option<String>,

        /// Read markup from a file
        #[arg(short, long, conflicts_with = "ssml")]
        file: Option<PathBuf>,
    },
    /// List speaking style templates
    Templates,
    /// Create or inspect configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Synthesize one sentence per language from a JSON description
    Multilingual {
        file: PathBuf,

        /// Directory for the generated files (default from configuration)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Play each file after it is generated
        #[arg(long)]
        play: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a configuration file from `--preset` (or the defaults)
    Init { path: PathBuf },
    /// Print the effective configuration
    Show,
}

#[derive(Debug, Deserialize)]
struct MultilingualFile {
    languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    code: String,
    name: String,
    #[serde(default)]
    flag: String,
    text: String,
    voice: String,
    #[serde(default)]
    alt_voice: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    let preset = cli.preset.as_deref();

    match cli.command {
        Commands::Templates => cmd_templates(),
        Commands::Validate { ssml, file } => return cmd_validate(ssml, file),
        Commands::Config { action } => cmd_config(action, config_path, preset)?,
        Commands::Speak {
            text,
            ssml,
            template,
            rate,
            pitch,
            volume,
            voice,
            output,
            no_play,
        } => {
            let client = build_client(config_path, preset)?;
            let req = SpeakRequest {
                text,
                ssml,
                template,
                rate,
                pitch,
                volume,
                voice,
                output,
                play: !no_play,
            };
            cmd_speak(&client, req).await?;
        }
        Commands::Voices {
            language,
            gender,
            detailed,
        } => {
            let client = build_client(config_path, preset)?;
            cmd_voices(&client, language, gender, detailed).await?;
        }
        Commands::Batch {
            texts,
            file,
            concurrency,
            sequential,
            ssml,
            voice,
            output_template,
        } => {
            let texts = collect_texts(texts, file.as_deref())?;
            let client = build_client(config_path, preset)?;
            let limit = if sequential { None } else { Some(concurrency) };
            cmd_batch(&client, &texts, limit, ssml, voice, output_template).await?;
        }
        Commands::Multilingual {
            file,
            output_dir,
            play,
        } => {
            let client = build_client(config_path, preset)?;
            return cmd_multilingual(&client, &file, output_dir, play).await;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&Path>, preset: Option<&str>) -> Result<TtsConfig> {
    let config = match (path, preset) {
        (None, Some(name)) => TtsConfig::preset(name)?,
        _ => ConfigManager::new().load(path)?,
    };
    Ok(config.apply_env_overrides()?)
}

fn build_client(path: Option<&Path>, preset: Option<&str>) -> Result<TtsClient> {
    let config = load_config(path, preset)?;
    TtsClient::new(config).context("Failed to initialize TTS client")
}

struct SpeakRequest {
    text: Option<String>,
    ssml: Option<String>,
    template: Option<String>,
    rate: Option<String>,
    pitch: Option<String>,
    volume: Option<String>,
    voice: Option<String>,
    output: Option<PathBuf>,
    play: bool,
}

async fn cmd_speak(client: &TtsClient, req: SpeakRequest) -> Result<()> {
    let config = client.config();
    let voice = req.voice.as_deref().unwrap_or(&config.default_voice);
    let prosody_flags = req.rate.is_some() || req.pitch.is_some() || req.volume.is_some();

    let (input, use_ssml, label) = match (req.ssml, req.text) {
        (Some(markup), _) => (markup, true, "ssml".to_string()),
        (None, Some(text)) => {
            let label = text.clone();
            if let Some(name) = req.template.as_deref() {
                (create_ssml_from_template(name, &text, voice)?, true, label)
            } else if prosody_flags || config.ssml {
                let markup = client.create_prosody_ssml(
                    &text,
                    Some(voice),
                    req.rate.as_deref(),
                    req.pitch.as_deref(),
                    req.volume.as_deref(),
                );
                (markup, true, label)
            } else {
                (text, false, label)
            }
        }
        (None, None) => bail!("Nothing to speak: pass a text or --ssml"),
    };

    let started = Instant::now();
    let audio = client.synthesize_text(&input, Some(voice), use_ssml).await?;
    let path = req
        .output
        .unwrap_or_else(|| client.output_path(&safe_filename(&label, 50)));
    client.save_audio(&audio, &path).await?;
    println!(
        "Saved {} bytes to {} ({:.2}s)",
        audio.len(),
        path.display(),
        started.elapsed().as_secs_f64()
    );

    if req.play && config.auto_play {
        play(&path).await;
    }
    Ok(())
}

async fn play(path: &Path) {
    match AudioPlayer::detect(None) {
        Ok(player) => {
            if let Err(e) = player.play_file(path).await {
                eprintln!("Could not play audio: {}", e);
            }
        }
        Err(e) => eprintln!("Could not play audio: {}", e),
    }
}

async fn cmd_voices(
    client: &TtsClient,
    language: Option<String>,
    gender: Option<String>,
    detailed: bool,
) -> Result<()> {
    let mut voices: Vec<Voice> = client.list_voices().await?;
    if let Some(language) = language.as_deref() {
        voices = filter_by_language(&voices, language);
    }
    if let Some(gender) = gender.as_deref() {
        voices = filter_by_gender(&voices, gender);
    }
    for voice in &voices {
        if detailed {
            println!(
                "{:<36} {:<10} {:<8} {}",
                voice.name, voice.locale, voice.gender, voice.display_name
            );
        } else {
            println!("{}", voice.name);
        }
    }
    println!("\n{} voice(s)", voices.len());
    Ok(())
}

fn collect_texts(mut texts: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        texts.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
    }
    if texts.is_empty() {
        bail!("No texts given: pass them as arguments or with --file");
    }
    Ok(texts)
}

/// `limit` is `None` for sequential processing, `Some(None)` for the configured concurrency.
async fn cmd_batch(
    client: &TtsClient,
    texts: &[String],
    limit: Option<Option<usize>>,
    use_ssml: bool,
    voice: Option<String>,
    output_template: Option<String>,
) -> Result<()> {
    let config = client.config();
    let started = Instant::now();
    let strategy = match limit {
        None => BatchStrategy::Sequential,
        Some(k) => BatchStrategy::Concurrent {
            max_concurrency: k.unwrap_or(config.max_concurrent),
        },
    };
    let audio = client
        .batch_synthesize_chunked(texts, voice.as_deref(), use_ssml, strategy, None)
        .await?;

    let template = output_template.unwrap_or_else(|| {
        client
            .output_path("batch_{}")
            .to_string_lossy()
            .into_owned()
    });
    let paths = client.batch_save_audio(&audio, &template).await?;
    println!(
        "Saved {} file(s) in {:.2}s",
        paths.len(),
        started.elapsed().as_secs_f64()
    );
    for path in paths {
        println!("  {}", path.display());
    }
    Ok(())
}

fn cmd_validate(ssml: Option<String>, file: Option<PathBuf>) -> Result<ExitCode> {
    let markup = match (ssml, file) {
        (_, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (Some(markup), None) => markup,
        (None, None) => bail!("Nothing to validate: pass markup or --file"),
    };
    let diagnostics = SsmlValidator::validate(&markup);
    if diagnostics.is_empty() {
        println!("SSML is valid");
        return Ok(ExitCode::SUCCESS);
    }
    println!("SSML is invalid ({} problem(s)):", diagnostics.len());
    for diagnostic in diagnostics {
        println!("  - {}", diagnostic);
    }
    Ok(ExitCode::FAILURE)
}

fn cmd_templates() {
    println!("Available templates:");
    for template in SsmlTemplate::ALL {
        println!("  {}", template);
    }
}

fn cmd_config(action: ConfigAction, path: Option<&Path>, preset: Option<&str>) -> Result<()> {
    match action {
        ConfigAction::Init { path } => {
            let preset = preset.unwrap_or("default");
            ConfigManager::create_default_config(&path, preset)?;
            println!("Wrote '{}' configuration to {}", preset, path.display());
        }
        ConfigAction::Show => {
            let config = load_config(path, preset)?;
            print!("{}", serde_yaml::to_string(&config)?);
        }
    }
    Ok(())
}

async fn cmd_multilingual(
    client: &TtsClient,
    file: &Path,
    output_dir: Option<PathBuf>,
    play_audio: bool,
) -> Result<ExitCode> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let demo: MultilingualFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    if demo.languages.is_empty() {
        bail!("No languages found in {}", file.display());
    }

    let output_dir = output_dir.unwrap_or_else(|| client.config().output_directory.clone());
    let extension = client.config().output_format.extension();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let total = demo.languages.len();
    let mut failed = Vec::new();

    for (i, lang) in demo.languages.iter().enumerate() {
        println!("\n[{}/{}] {} {} ({})", i + 1, total, lang.flag, lang.name, lang.code);
        match synthesize_language(client, lang).await {
            Ok((audio, used_voice)) => {
                let prefix = lang.code.split('-').next().unwrap_or(&lang.code);
                let path = output_dir.join(format!(
                    "multilingual_{}_{}.{}",
                    prefix, timestamp, extension
                ));
                if let Err(e) = client.save_audio(&audio, &path).await {
                    eprintln!("Failed to save audio for {}: {}", lang.name, e);
                    failed.push(lang.name.clone());
                    continue;
                }
                println!("Saved {} (voice {})", path.display(), used_voice);
                if play_audio {
                    play(&path).await;
                }
            }
            Err(e) => {
                eprintln!("Failed to generate audio for {}: {}", lang.name, e);
                failed.push(lang.name.clone());
            }
        }
    }

    println!(
        "\n{} succeeded, {} failed",
        total - failed.len(),
        failed.len()
    );
    if failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Failed: {}", failed.join(", "));
        Ok(ExitCode::FAILURE)
    }
}

/// Primary voice first, then the alternate voice if one is configured.
async fn synthesize_language(
    client: &TtsClient,
    lang: &LanguageEntry,
) -> edge_tts_client::Result<(Vec<u8>, String)> {
    let mut voices = vec![lang.voice.as_str()];
    voices.extend(lang.alt_voice.as_deref());
    client.synthesize_with_fallback(&lang.text, &voices).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_conflicts_with_config_file() {
        let parsed = Cli::try_parse_from([
            "edge-tts-cli",
            "--config",
            "tts.json",
            "--preset",
            "fast",
            "templates",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_preset_or_config_alone() {
        let cli = Cli::try_parse_from(["edge-tts-cli", "--preset", "fast", "templates"]).unwrap();
        assert_eq!(cli.preset.as_deref(), Some("fast"));
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["edge-tts-cli", "templates", "-c", "tts.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tts.yaml")));
        assert!(cli.preset.is_none());
    }
}
