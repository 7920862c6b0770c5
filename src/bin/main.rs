use clap::{Parser, Subcommand, ValueEnum};
use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use miette::{IntoDiagnostic, Result};
use soup_core::appearance::{
    Appearance, FontId, Palette, PaletteCategory, TerminalAmbient, ThemeMode, ThemeResolver,
};
use soup_core::core::export::character_count;
use soup_core::core::overrides::normalize_letter;
use soup_core::persistence::FileStore;
use soup_core::preferences::{
    Accent, Colorblind, DismissedNotices, Font, NoticeId, Suppress, Theme, VerboseNumbers,
};
use soup_core::{SoupEngine, Token, TokenClass};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

type Engine = SoupEngine<FileStore>;

#[derive(Parser)]
#[command(name = "soup", version, about = "Spell text out with the NATO alphabet and your own words")]
struct Cli {
    /// Preferences file (defaults to the user data directory).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Seed for picking among several custom words, for reproducible output.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Spell TEXT one character per line.
    Spell { text: String },
    /// Print TEXT as a single "X as in Word | ..." line.
    Export {
        text: String,
        /// Read digits as words even if verbose numbers are off.
        #[arg(long)]
        verbose: bool,
    },
    /// Manage custom words.
    Words {
        #[command(subcommand)]
        action: WordsAction,
    },
    /// Turn custom words off without deleting them.
    Suppress { switch: Switch },
    /// Pick light, dark, or follow the terminal.
    Theme { mode: ThemeArg },
    /// Pick the display font; lists fonts when NAME is omitted.
    Font { name: Option<String> },
    /// Use the accessible palette instead of custom colors.
    Colorblind { switch: Switch },
    /// Change accent colors.
    Color {
        #[command(subcommand)]
        action: ColorAction,
    },
    /// Read digits as words in exports.
    Verbose { switch: Switch },
    /// Hide a notice for good.
    Dismiss { notice: NoticeArg },
    /// Show current preferences.
    Status,
    /// Type strings and see them spelled (the default).
    Interactive,
}

#[derive(Subcommand)]
enum WordsAction {
    /// List custom words by letter.
    List,
    /// Add WORD for LETTER.
    Add { letter: String, word: String },
    /// Remove WORD from LETTER.
    Remove { letter: String, word: String },
}

#[derive(Subcommand)]
enum ColorAction {
    /// Set CATEGORY (nato, number, symbol, custom) to a #rrggbb color.
    Set { category: String, hex: String },
    /// Put CATEGORY back to its default color.
    Reset { category: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
    Toggle,
}

impl Switch {
    fn apply(self, current: bool) -> bool {
        match self {
            Switch::On => true,
            Switch::Off => false,
            Switch::Toggle => !current,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    System,
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::System => ThemeMode::System,
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NoticeArg {
    Suppressed,
    AutoSave,
}

impl From<NoticeArg> for NoticeId {
    fn from(arg: NoticeArg) -> Self {
        match arg {
            NoticeArg::Suppressed => NoticeId::SuppressedOverrides,
            NoticeArg::AutoSave => NoticeId::AutoSave,
        }
    }
}

fn default_store_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut path) => {
            path.push("alphabet-soup");
            path.push("preferences.json");
            path
        }
        None => PathBuf::from("alphabet-soup-preferences.json"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let path = cli.store.unwrap_or_else(default_store_path);
    let mut engine = SoupEngine::from_file(&path);
    if let Some(seed) = cli.seed {
        engine = engine.with_seed(seed);
    }
    let mut resolver = ThemeResolver::new(TerminalAmbient::new());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Spell { text } => {
            engine.set_input(text);
            let tokens = engine.tokens();
            print_tokens(&tokens, &engine, &mut resolver)?;
        }
        Commands::Export { text, verbose } => {
            engine.set_input(text);
            if verbose {
                let tokens = engine.tokens();
                println!("{}", soup_core::core::export::readback(&tokens, true));
            } else {
                println!("{}", engine.readback());
            }
        }
        Commands::Words { action } => {
            match action {
                WordsAction::List => {}
                WordsAction::Add { letter, word } => add_word(&mut engine, &letter, &word),
                WordsAction::Remove { letter, word } => remove_word(&mut engine, &letter, &word),
            }
            print_words(&engine);
        }
        Commands::Suppress { switch } => {
            engine.preferences_mut().update::<Suppress>(|on| switch.apply(on));
            print_status(&engine, &mut resolver);
        }
        Commands::Theme { mode } => {
            engine.preferences_mut().set::<Theme>(mode.into());
            println!("{}", resolver.subtitle(engine.state().theme_mode));
        }
        Commands::Font { name: None } => print_fonts(&engine),
        Commands::Font { name: Some(name) } => set_font(&mut engine, &name),
        Commands::Colorblind { switch } => {
            engine.preferences_mut().update::<Colorblind>(|on| switch.apply(on));
            print_palette(&engine);
        }
        Commands::Color { action } => {
            match action {
                ColorAction::Set { category, hex } => set_color(&mut engine, &category, &hex),
                ColorAction::Reset { category } => reset_color(&mut engine, &category),
            }
            print_palette(&engine);
        }
        Commands::Verbose { switch } => {
            engine.preferences_mut().update::<VerboseNumbers>(|on| switch.apply(on));
            print_status(&engine, &mut resolver);
        }
        Commands::Dismiss { notice } => dismiss(&mut engine, notice.into()),
        Commands::Status => print_status(&engine, &mut resolver),
        Commands::Interactive => run_interactive(&mut engine, &mut resolver)?,
    }
    Ok(())
}

fn add_word(engine: &mut Engine, letter: &str, word: &str) {
    match normalize_letter(letter) {
        Some(letter) => engine.add_override(letter, word),
        None => eprintln!("'{}' is not a letter A-Z", letter.trim()),
    }
}

fn remove_word(engine: &mut Engine, letter: &str, word: &str) {
    if let Some(letter) = normalize_letter(letter) {
        engine.remove_override(letter, word);
    }
}

fn set_font(engine: &mut Engine, name: &str) {
    match FontId::parse(name) {
        Some(font) => {
            engine.preferences_mut().set::<Font>(font);
            println!("Display font: {}", font.label());
        }
        None => {
            eprintln!("Unknown font '{}'", name);
            print_fonts(engine);
        }
    }
}

fn set_color(engine: &mut Engine, category: &str, hex: &str) {
    if !engine.state().color_editing_enabled() {
        eprintln!("Colors are fixed while colorblind mode is on.");
        return;
    }
    match PaletteCategory::parse(category) {
        Some(category) => engine
            .preferences_mut()
            .update::<Accent>(|p| p.with_color(category, hex)),
        None => eprintln!("Unknown category '{}'", category),
    }
}

fn reset_color(engine: &mut Engine, category: &str) {
    if !engine.state().color_editing_enabled() {
        eprintln!("Colors are fixed while colorblind mode is on.");
        return;
    }
    match PaletteCategory::parse(category) {
        Some(category) => engine
            .preferences_mut()
            .update::<Accent>(|p| p.reset(category)),
        None => eprintln!("Unknown category '{}'", category),
    }
}

fn dismiss(engine: &mut Engine, notice: NoticeId) {
    engine.preferences_mut().update::<DismissedNotices>(|mut set| {
        set.insert(notice);
        set
    });
}

fn term_color(hex: &str) -> Color {
    match Palette::rgb(hex) {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => Color::Reset,
    }
}

fn muted(appearance: Appearance) -> Color {
    match appearance {
        Appearance::Dark => Color::Grey,
        Appearance::Light => Color::DarkGrey,
    }
}

fn print_tokens(
    tokens: &[Token],
    engine: &Engine,
    resolver: &mut ThemeResolver<TerminalAmbient>,
) -> Result<()> {
    let state = engine.state();
    let palette = state.effective_palette();
    let muted = muted(resolver.effective(state.theme_mode));
    let mut out = stdout();

    if state.should_show_notice(NoticeId::SuppressedOverrides) {
        queue!(
            out,
            SetForegroundColor(muted),
            Print("Custom words suppressed, showing NATO standard only.\n"),
            ResetColor
        )
        .into_diagnostic()?;
    }

    for token in tokens {
        let color = palette
            .color_for(token.class)
            .map(term_color)
            .unwrap_or(muted);
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(format!("{:>2}  ", token.display_char())),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(color),
            Print(&token.rendered_word),
            ResetColor
        )
        .into_diagnostic()?;
        if let (TokenClass::Custom, Some(fallback)) = (token.class, token.fallback_word) {
            queue!(out, SetForegroundColor(muted), Print(format!("  ({})", fallback)), ResetColor)
                .into_diagnostic()?;
        }
        queue!(out, Print("\n")).into_diagnostic()?;
    }
    queue!(
        out,
        SetForegroundColor(muted),
        Print(format!("{}\n", character_count(tokens))),
        ResetColor
    )
    .into_diagnostic()?;
    out.flush().into_diagnostic()
}

fn print_words(engine: &Engine) {
    let dict = &engine.state().override_dictionary;
    if dict.is_empty() {
        println!("No custom words yet.");
        return;
    }
    for (letter, words) in dict.iter() {
        println!("{}  {}", letter, words.join(", "));
    }
}

fn print_fonts(engine: &Engine) {
    for font in FontId::ALL {
        let marker = if font == engine.state().font { '*' } else { ' ' };
        println!("{} {:<16} {}", marker, font.label(), font.css_stack());
    }
}

fn print_palette(engine: &Engine) {
    let palette = engine.state().effective_palette();
    for category in PaletteCategory::ALL {
        println!("{:<24} {}", category.label(), palette.color(category));
    }
    if !engine.state().color_editing_enabled() {
        println!("(colorblind mode: custom colors disabled)");
    }
}

fn print_status(engine: &Engine, resolver: &mut ThemeResolver<TerminalAmbient>) {
    let state = engine.state();
    println!("Theme:          {}", resolver.subtitle(state.theme_mode));
    println!("Font:           {}", state.font.label());
    println!("Colorblind:     {}", on_off(state.colorblind_mode));
    println!("Verbose digits: {}", on_off(state.verbose_numbers));
    if state.has_overrides() {
        let label = if state.suppress_overrides { "NATO only" } else { "active" };
        println!("Custom words:   {} ({} letters)", label, state.override_dictionary.len());
    } else {
        println!("Custom words:   none");
    }
    if state.should_show_notice(NoticeId::AutoSave) {
        println!("Preferences are saved automatically.");
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn run_interactive(engine: &mut Engine, resolver: &mut ThemeResolver<TerminalAmbient>) -> Result<()> {
    let mut message = String::new();

    loop {
        if let Some(appearance) = resolver.poll(engine.state().theme_mode) {
            message = format!("Terminal switched to {:?}.", appearance);
        }
        let tokens = engine.tokens();
        print_ui(engine, &tokens, &message, resolver)?;
        message.clear();

        let mut line = String::new();
        if stdin().read_line(&mut line).into_diagnostic()? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(command) = line.strip_prefix(':') else {
            engine.set_input(line);
            continue;
        };
        let mut parts = command.splitn(3, ' ');
        let name = parts.next().unwrap_or("");
        let first = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("");

        match name {
            "q" | "quit" | "exit" => break,
            "add" => add_word(engine, first, rest),
            "rm" => remove_word(engine, first, rest),
            "suppress" => {
                let on = engine.toggle_suppression();
                message = format!("Custom words {}.", if on { "suppressed" } else { "active" });
            }
            "verbose" => engine.preferences_mut().update::<VerboseNumbers>(|on| !on),
            "colorblind" => engine.preferences_mut().update::<Colorblind>(|on| !on),
            "theme" => match first {
                "system" => engine.preferences_mut().set::<Theme>(ThemeMode::System),
                "light" => engine.preferences_mut().set::<Theme>(ThemeMode::Light),
                "dark" => engine.preferences_mut().set::<Theme>(ThemeMode::Dark),
                _ => message = "Themes: system, light, dark".to_string(),
            },
            "font" => match FontId::parse(&format!("{} {}", first, rest)) {
                Some(font) => engine.preferences_mut().set::<Font>(font),
                None => message = "Fonts: jetbrains-mono, courier-new, fira-code, ibm-plex-mono".to_string(),
            },
            "color" => set_color(engine, first, rest),
            "reset" => reset_color(engine, first),
            "dismiss" => dismiss(engine, NoticeId::SuppressedOverrides),
            "export" => message = engine.readback(),
            _ => message = format!("Unknown command ':{}'", name),
        }
    }
    Ok(())
}

fn print_ui(
    engine: &Engine,
    tokens: &[Token],
    message: &str,
    resolver: &mut ThemeResolver<TerminalAmbient>,
) -> Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0)).into_diagnostic()?;
    println!("AlphabetSoup");
    println!("---------------------------------------------------------------");
    println!("Type a string and press [Enter] to spell it.");
    println!(":add L word  :rm L word  :suppress  :verbose  :export  :quit");
    println!(":theme M  :font NAME  :colorblind  :color CAT #hex  :reset CAT\n");
    println!("{}", resolver.subtitle(engine.state().theme_mode));

    if tokens.is_empty() {
        println!("\nPASTE A STRING ABOVE TO BEGIN");
    } else {
        println!();
        print_tokens(tokens, engine, resolver)?;
    }
    if engine.state().has_overrides() {
        println!();
        print_words(engine);
    }
    if !message.is_empty() {
        println!("\n{}", message);
    }
    print!("\n> ");
    stdout().flush().into_diagnostic()
}
