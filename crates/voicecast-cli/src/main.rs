use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use voicecast_speech::sink::suggested_name;
use voicecast_speech::{
    AudioSink, DirectorySink, InputSource, PipelineConfig, SynthesisCoordinator, SynthesisInput,
    SynthesisMode, SynthesisOutcome,
};

#[derive(Parser)]
#[command(name = "voicecast")]
#[command(about = "Voicecast CLI - Turn dialogue-rich text into multi-voice speech", long_about = None)]
struct Cli {
    /// Pipeline configuration TOML (defaults plus VOICECAST_* environment when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a narrative text file and write the markup document
    Markup {
        /// Narrative text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to the input with a .ssml extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Synthesize text or a file with the configured provider
    Speak {
        /// Text to speak (conflicts with --input)
        #[arg(short, long, conflicts_with = "input")]
        text: Option<String>,

        /// Text or .ssml file to speak (conflicts with --text)
        #[arg(short, long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Segment plain text into a multi-voice document first
        #[arg(long)]
        narrative: bool,

        /// Play through the audio output instead of saving
        #[arg(long)]
        play: bool,

        /// Directory for captured audio
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Print the active role catalog in lookup order
    Roles,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Markup { input, output } => {
            write_markup(&config, &input, output)?;
        }
        Commands::Speak {
            text,
            input,
            narrative,
            play,
            output_dir,
        } => {
            let input = speak_input(&config, text, input.as_deref(), narrative)?;
            speak(&config, input, play, output_dir).await?;
        }
        Commands::Roles => {
            print_roles(&config)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let mut config = PipelineConfig::default();
            config
                .apply_env()
                .context("Invalid VOICECAST_* environment")?;
            Ok(config)
        }
    }
}

fn speak_input(
    config: &PipelineConfig,
    text: Option<String>,
    path: Option<&Path>,
    narrative: bool,
) -> Result<SynthesisInput> {
    let input = match (text, path) {
        (Some(text), _) => SynthesisInput::plain(text, config.parameters()),
        (None, Some(path)) => read_input(path, config)?,
        (None, None) => anyhow::bail!("Either --text or --input must be specified"),
    };
    if !narrative {
        return Ok(input);
    }
    if input.source == InputSource::Markup {
        anyhow::bail!("--narrative cannot be used with a pre-authored .ssml input");
    }
    Ok(SynthesisInput::narrative(input.text, input.parameters))
}

/// `.ssml` files are pre-authored markup, anything else plain text
fn read_input(path: &Path, config: &PipelineConfig) -> Result<SynthesisInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(if is_markup_file(path) {
        SynthesisInput::markup(text, config.parameters())
    } else {
        SynthesisInput::plain(text, config.parameters())
    })
}

fn is_markup_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ssml"))
}

fn markup_output_path(input: &Path) -> PathBuf {
    input.with_extension("ssml")
}

fn write_markup(config: &PipelineConfig, input: &Path, output: Option<PathBuf>) -> Result<()> {
    let coordinator = config
        .build_coordinator()
        .context("Failed to build pipeline")?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let document = coordinator.build_markup(&text);
    let output = output.unwrap_or_else(|| markup_output_path(input));
    if output == input {
        anyhow::bail!(
            "Refusing to overwrite the input file {}; pass --output",
            input.display()
        );
    }
    std::fs::write(&output, document.as_str())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} voice blocks to {}",
        document.block_count(),
        output.display()
    );
    Ok(())
}

async fn speak(
    config: &PipelineConfig,
    input: SynthesisInput,
    play: bool,
    output_dir: PathBuf,
) -> Result<()> {
    let coordinator = config
        .build_coordinator()
        .context("Failed to build pipeline")?;
    let sink = DirectorySink::new(output_dir);

    if !play {
        let path = coordinator
            .synthesize_to_sink(input, &sink)
            .await
            .context("Synthesis failed")?;
        if let Some(path) = path {
            println!("Saved {}", path.display());
        }
        return Ok(());
    }

    let name = suggested_name(&input.parameters);
    let input = input.with_mode(SynthesisMode::Playback);
    match coordinator.synthesize(input).await {
        SynthesisOutcome::Handle(_) => wait_for_playback(&coordinator).await,
        SynthesisOutcome::Bytes(audio) => {
            log::warn!(
                "Provider {} cannot play audio; saving it instead",
                coordinator.provider().provider_name()
            );
            let path = sink
                .persist(&audio, &name)
                .context("Failed to save audio")?;
            println!("Saved {}", path.display());
            Ok(())
        }
        SynthesisOutcome::Failure(err) => Err(err).context("Synthesis failed"),
    }
}

async fn wait_for_playback(coordinator: &SynthesisCoordinator) -> Result<()> {
    log::info!("Playing; press Ctrl-C to stop");
    loop {
        let playing = coordinator
            .current_playback()
            .is_some_and(|handle| handle.is_playing());
        if !playing {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(200)) => {}
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                coordinator.stop();
                println!("Stopped");
                return Ok(());
            }
        }
    }
}

fn print_roles(config: &PipelineConfig) -> Result<()> {
    let registry = config.registry().context("Failed to load role catalog")?;

    println!("\n========== Role Catalog ==========");
    println!("Match policy: {:?}", registry.policy());
    println!(
        "Narrator: {} -> {} ({})",
        registry.narrator().name,
        registry.narrator().voice,
        registry.narrator().bookmark
    );
    for (idx, role) in registry.roles().iter().enumerate() {
        println!(
            "{:>3}. {} -> {} ({})",
            idx + 1,
            role.name,
            role.voice,
            role.bookmark
        );
    }
    println!("==================================\n");

    Ok(())
}
