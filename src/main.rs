//! mdedit - Main Entry Point
//!
//! Applies, toggles, detects and clears markdown formatting in files from
//! the command line.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};

use mdedit::config::{get_config_file_path, load_config_from, save_config_silent, Settings};
use mdedit::editor::Document;
use mdedit::error::{Result, ResultExt};
use mdedit::markdown::{FormattingState, MarkdownConstruct, Selection};
use mdedit::string_utils::char_len;

/// Application name constant.
const APP_NAME: &str = "mdedit";

#[derive(Parser, Debug)]
#[command(name = "mdedit", version, about = "Apply and clear markdown formatting in files", long_about = None)]
struct Cli {
    /// Print the resulting document instead of saving it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Settings file to use instead of the platform config file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wrap the selection in a construct's markup
    Apply {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        construct: ConstructArgs,
    },
    /// Remove the construct if it is active at the selection, otherwise apply it
    Toggle {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        construct: ConstructArgs,
    },
    /// Strip all markup from the selection (the whole file at a caret)
    Clear {
        #[command(flatten)]
        target: Target,
    },
    /// Print whether a construct is active at the selection
    Detect {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        construct: ConstructArgs,
    },
    /// Print the formatting state at the selection
    State {
        #[command(flatten)]
        target: Target,
    },
    /// List the toolbar constructs and their shortcuts
    Constructs,
}

/// The file and selection a command works on.
#[derive(Args, Debug)]
struct Target {
    /// Markdown file to edit
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Selection start in characters (defaults to the end of the file)
    #[arg(long)]
    start: Option<usize>,

    /// Selection end in characters (defaults to the start)
    #[arg(long)]
    end: Option<usize>,
}

#[derive(Args, Debug)]
struct ConstructArgs {
    /// Construct to work with
    #[arg(value_enum, value_name = "CONSTRUCT")]
    construct: ConstructName,

    /// Header level (1-6)
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// Link or image text (defaults to the selected link's text, or the selection)
    #[arg(long)]
    name: Option<String>,

    /// Link or image URL (defaults to the selected link's URL, or the configured URL)
    #[arg(long)]
    url: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ConstructName {
    Bold,
    Italic,
    Strikethrough,
    Header,
    ListItem,
    NumberedItem,
    Checklist,
    Blockquote,
    CodeBlock,
    Table,
    Link,
    Image,
}

impl ConstructArgs {
    fn to_construct(&self, settings: &Settings, selected: &str) -> MarkdownConstruct {
        match self.construct {
            ConstructName::Bold => MarkdownConstruct::Bold,
            ConstructName::Italic => MarkdownConstruct::Italic,
            ConstructName::Strikethrough => MarkdownConstruct::Strikethrough,
            ConstructName::Header => MarkdownConstruct::header(self.level),
            ConstructName::ListItem => MarkdownConstruct::ListItem,
            ConstructName::NumberedItem => MarkdownConstruct::NumberedItem,
            ConstructName::Checklist => MarkdownConstruct::Checklist,
            ConstructName::Blockquote => MarkdownConstruct::Blockquote,
            ConstructName::CodeBlock => MarkdownConstruct::CodeBlock,
            ConstructName::Table => settings.table_template.to_construct(),
            ConstructName::Link => {
                settings.link_for_selection(selected, self.name.clone(), self.url.clone())
            }
            ConstructName::Image => {
                settings.image_for_selection(selected, self.name.clone(), self.url.clone())
            }
        }
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("Starting {} with {:?}", APP_NAME, cli.command);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => Some(path),
        None => get_config_file_path()
            .map_err(|e| warn!("Settings will not be persisted: {}", e))
            .ok(),
    };
    let mut settings = match &config_path {
        Some(path) => load_config_from(path)
            .unwrap_or_warn_default(Settings::default(), "Failed to load configuration"),
        None => Settings::default(),
    };

    let target = match &cli.command {
        Command::Constructs => {
            print_constructs();
            return Ok(());
        }
        Command::Apply { target, .. }
        | Command::Toggle { target, .. }
        | Command::Clear { target }
        | Command::Detect { target, .. }
        | Command::State { target } => target,
    };

    let mut document = open_document(target, &settings)?;
    settings.add_recent_file(target.file.clone());
    if let Some(path) = &config_path {
        save_config_silent(path, &settings);
    }

    let selected = document.selected_text().to_string();
    let changed = match &cli.command {
        Command::Apply { construct, .. } => {
            document.apply(&construct.to_construct(&settings, &selected))?;
            true
        }
        Command::Toggle { construct, .. } => {
            let added = document.toggle(&construct.to_construct(&settings, &selected))?;
            info!("{} markup", if added { "Added" } else { "Removed" });
            true
        }
        Command::Clear { .. } => document.clear_selection(),
        Command::Detect { construct, .. } => {
            let construct = construct.to_construct(&settings, &selected);
            println!("{}", document.is_active(&construct));
            return Ok(());
        }
        Command::State { .. } => {
            print_state(&document.formatting_state());
            return Ok(());
        }
        Command::Constructs => false,
    };

    if !changed {
        info!("No markup changed in {}", target.file.display());
        if cli.dry_run {
            print!("{}", document.text());
        }
        return Ok(());
    }

    if settings.trailing_newline_on_save {
        document.ensure_trailing_newline();
    }

    if cli.dry_run {
        print!("{}", document.text());
    } else {
        document.save()?;
        let selection = document.selection();
        println!(
            "Updated {} (selection {}..{})",
            target.file.display(),
            selection.start,
            selection.end
        );
    }
    Ok(())
}

/// Open the target file and place the requested selection.
fn open_document(target: &Target, settings: &Settings) -> Result<Document> {
    let mut document =
        Document::open(&target.file)?.with_history_limit(settings.max_undo_history);
    let start = target.start.unwrap_or_else(|| char_len(document.text()));
    let end = target.end.unwrap_or(start);
    let selection = Selection::checked(document.text(), start, end)?;
    document.set_selection(selection);
    Ok(document)
}

fn print_constructs() {
    for construct in MarkdownConstruct::toolbar() {
        println!(
            "{:<16} {:<14} {}",
            construct.name(),
            construct.shortcut_label(),
            construct.tooltip()
        );
    }
}

fn print_state(state: &FormattingState) {
    let header = state
        .header_level
        .map(|level| level.to_string())
        .unwrap_or_else(|| "none".to_string());
    println!("bold: {}", state.is_bold);
    println!("italic: {}", state.is_italic);
    println!("strikethrough: {}", state.is_strikethrough);
    println!("code block: {}", state.is_code_block);
    println!("header: {}", header);
    println!("list item: {}", state.is_list_item);
    println!("numbered item: {}", state.is_numbered_item);
    println!("checklist: {}", state.is_checklist);
    println!("blockquote: {}", state.is_blockquote);
}
