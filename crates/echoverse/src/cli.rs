//! Terminal presentation
//!
//! Interactive REPL: every non-command line is converted into an audiobook.
//! Also renders outcomes and status for the one-shot mode.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use echoverse_core::{Backend, Config, Orchestrator, Outcome, Submission, Tone, UploadedFile};
use echoverse_voice::WATSON_VOICES;
use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, Reedline, ReedlineEvent, ReedlineMenu, Signal, Suggestion,
};
use tracing::{info, warn};

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show this help"),
    ("/tone", "Show or set the tone (neutral, suspenseful, inspiring)"),
    ("/voice", "Show or set the premium voice"),
    ("/voices", "List premium voices"),
    ("/file", "Convert a .txt file"),
    ("/output", "Show or set the MP3 output path"),
    ("/status", "Show which voice engine is active"),
    ("/exit", "Quit"),
    ("/quit", "Quit"),
];

/// Command completer for reedline
#[derive(Clone)]
pub struct CommandCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.to_vec(),
        }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if !line.starts_with('/') {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Prompt showing the current tone
struct TonePrompt {
    style: Style,
    tone: Tone,
}

impl Prompt for TonePrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.style.paint(format!("[{}] > ", self.tone)).to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

/// Per-session REPL settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplSettings {
    pub tone: Tone,
    pub voice: Option<String>,
    pub output: PathBuf,
}

/// What the REPL should do with a line
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Exit,
    Handled,
    Convert(Submission),
}

/// Run interactive mode
pub async fn run_interactive(
    orchestrator: &Orchestrator,
    config: &Config,
    mut settings: ReplSettings,
) -> anyhow::Result<()> {
    print_welcome(orchestrator);

    let mut keybindings = default_keybindings();

    // Trigger completion on '/' key
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Char('/'),
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_menu")
            .with_columns(1)
            .with_column_width(Some(60))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CommandCompleter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    loop {
        let prompt = TonePrompt {
            style: Color::Cyan.bold(),
            tone: settings.tone,
        };

        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                match handle_line(input, &mut settings, orchestrator, config) {
                    Action::Exit => break,
                    Action::Handled => continue,
                    Action::Convert(submission) => {
                        let outcome = orchestrator.submit(submission).await;
                        if let Err(e) = render_outcome(outcome, &settings.output) {
                            eprintln!("\n❌ Error: {}\n", e);
                        }
                    }
                }
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => break,
            Err(err) => {
                eprintln!("\n❌ Error: {}\n", err);
                break;
            }
        }
    }

    println!("\n👋 Goodbye!\n");
    Ok(())
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('c'), ReedlineEvent::CtrlC);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::CtrlD);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings
}

/// Parse a tone typed by the user. Unknown labels mean `Neutral`.
pub fn parse_tone(label: &str) -> Tone {
    label.parse().unwrap_or_else(|e| {
        warn!("{}, using {}", e, Tone::Neutral);
        Tone::Neutral
    })
}

/// Interpret one REPL line. Plain text becomes a submission.
fn handle_line(
    input: &str,
    settings: &mut ReplSettings,
    orchestrator: &Orchestrator,
    config: &Config,
) -> Action {
    if !input.starts_with('/') {
        let mut submission = Submission::from_text(input, settings.tone);
        submission.voice_id = settings.voice.clone();
        return Action::Convert(submission);
    }

    let (command, arg) = match input.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (input, ""),
    };

    match command.to_lowercase().as_str() {
        "/exit" | "/quit" | "/q" => Action::Exit,
        "/help" | "/?" => {
            print_help();
            Action::Handled
        }
        "/tone" => {
            if !arg.is_empty() {
                settings.tone = parse_tone(arg);
            }
            println!("\n🎭 Tone: {}\n", settings.tone);
            Action::Handled
        }
        "/voice" => {
            if !arg.is_empty() {
                settings.voice = Some(arg.to_string());
            }
            let voice = settings
                .voice
                .as_deref()
                .unwrap_or(config.synthesis.default_voice.as_str());
            println!("\n🗣️ Voice: {}\n", voice);
            if !orchestrator.is_premium_available() {
                println!("   (the free engine has a single voice; this setting is ignored)\n");
            }
            Action::Handled
        }
        "/voices" => {
            print_voices(orchestrator);
            Action::Handled
        }
        "/output" => {
            if !arg.is_empty() {
                settings.output = PathBuf::from(arg);
            }
            println!("\n💾 Output: {}\n", settings.output.display());
            Action::Handled
        }
        "/status" => {
            print_status(orchestrator, config);
            Action::Handled
        }
        "/file" => {
            if arg.is_empty() {
                eprintln!("\n❓ Usage: /file <path.txt>\n");
                return Action::Handled;
            }
            match UploadedFile::from_path(arg) {
                Ok(file) => {
                    let mut submission = Submission::from_file(file, settings.tone);
                    submission.voice_id = settings.voice.clone();
                    Action::Convert(submission)
                }
                Err(e) => {
                    eprintln!("\n❌ Could not read {}: {}\n", arg, e);
                    Action::Handled
                }
            }
        }
        _ => {
            eprintln!("\n❓ Unknown command: {}. Type /help for a list of commands.\n", input);
            Action::Handled
        }
    }
}

/// Print the outcome of a submission and save the audio.
///
/// Returns `false` when the submission failed.
pub fn render_outcome(outcome: Outcome, output: &Path) -> anyhow::Result<bool> {
    let result = match outcome.result {
        Ok(result) => result,
        Err(e) => {
            if e.is_validation() {
                eprintln!("\n⚠️ {}\n", e.user_message());
            } else {
                eprintln!("\n❌ {}\n", e.user_message());
            }
            return Ok(false);
        }
    };

    println!();
    println!("📄 Original Text");
    println!("{}", "─".repeat(50));
    println!("{}", result.original_text);
    println!();
    println!("✨ Rewritten Text");
    println!("{}", "─".repeat(50));
    println!("{}", result.transformed_text);
    println!();

    result
        .write_to(output)
        .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", output.display(), e))?;

    let engine = match result.backend_used {
        Backend::Premium => "IBM Watson",
        Backend::Fallback => "Google TTS",
    };
    println!(
        "🎧 Saved {} bytes of {} to {} ({})",
        result.audio_bytes.len(),
        result.mime_type(),
        output.display(),
        engine
    );
    println!();

    info!("Wrote {}", output.display());
    Ok(true)
}

/// Print which voice engine is active
pub fn print_status(orchestrator: &Orchestrator, config: &Config) {
    println!();
    println!("System Status");
    println!("{}", "─".repeat(50));
    if orchestrator.is_premium_available() {
        println!("✅ IBM Watson TTS Connected");
        println!("   Using premium IBM Watson voices");
    } else {
        println!("⚠️ Using Google TTS (Free)");
        println!("   Configure IBM Watson for premium voices");
        if let Err(e) = config.tts.validate() {
            println!("   Reason: {}", e);
        }
        println!();
        println!("Setup Instructions:");
        println!("  1. Create an IBM Cloud account");
        println!("  2. Enable the Text to Speech service");
        println!("  3. Get the API key and service URL");
        println!("  4. Set TTS_API_KEY and TTS_URL in the environment, .env,");
        println!("     echoverse.toml ([tts] api_key / url) or .streamlit/secrets.toml");
    }
    println!(
        "watsonx.ai credentials: {}",
        if config.watsonx.is_configured() {
            "present"
        } else {
            "not set"
        }
    );
    println!();
}

/// Print premium voices
pub fn print_voices(orchestrator: &Orchestrator) {
    println!();
    if orchestrator.is_premium_available() {
        println!("Premium voices:");
        for voice in WATSON_VOICES {
            println!("  {}", voice);
        }
    } else {
        println!("Voice engine: Google TTS (Default)");
    }
    println!();
}

fn print_welcome(orchestrator: &Orchestrator) {
    let engine = if orchestrator.is_premium_available() {
        "IBM Watson (premium)"
    } else {
        "Google TTS (free)"
    };

    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          🎧 EchoVerse - AI Powered Audiobook Creator       ║");
    println!("╠════════════════════════════════════════════════════════════╣");
    println!("║  Type or paste text and press Enter to create audio        ║");
    println!("║  Commands: /help, /tone, /voice, /file, /status, /exit     ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!("Voice engine: {}", engine);
    println!();
}

fn print_help() {
    println!();
    println!("📖 Available commands:");
    for (cmd, desc) in COMMANDS {
        println!("  {} - {}", cmd, desc);
    }
    println!();
    println!("💡 Any other line is converted with the current tone and voice.");
    println!();
}
