//! Command-line front end.
//!
//! Stands in for the input form: the clinician passes the three English
//! fields, reviews the German drafts in an editor, and gets a PDF path back.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use discharge_letter_lib::config::{self, Settings};
use discharge_letter_lib::correction::{correct, RuleSet};
use discharge_letter_lib::export::{export, export_to_file, DEFAULT_FILE_NAME};
use discharge_letter_lib::letter::compose_markdown;
use discharge_letter_lib::pipeline::{
    AcceptAll, ClinicalNotes, EditorReviewer, LetterPipeline, Reviewer,
};
use discharge_letter_lib::services::{GoogleTranslator, OllamaSummarizer};

#[derive(Parser, Debug)]
#[command(
    name = "discharge-letter",
    version,
    about = "Draft German discharge letters from English clinical notes."
)]
pub struct Cli {
    /// Settings file (defaults to ~/DischargeLetter/settings.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize, translate, review and export a letter
    Generate(GenerateArgs),

    /// Export an already written letter text as PDF
    Render(RenderArgs),

    /// Apply the medical term table to a piece of German text
    Correct {
        /// Text to correct
        text: String,
    },

    /// Check that the summarization model is reachable
    Check,

    /// Print the effective settings as JSON
    Settings {
        /// Also write them to the settings file
        #[arg(long)]
        write: bool,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Diagnosis (English)
    #[arg(long, default_value = "")]
    pub diagnosis: String,

    /// Treatment & medications (English)
    #[arg(long, default_value = "")]
    pub treatment: String,

    /// Follow-up recommendations (English)
    #[arg(long, default_value = "")]
    pub recommendations: String,

    /// Ollama model used for the summary
    #[arg(long)]
    pub model: Option<String>,

    /// Skip the editor review of the German drafts
    #[arg(long)]
    pub no_review: bool,

    /// Editor command for review (defaults to $VISUAL / $EDITOR)
    #[arg(long)]
    pub editor: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Letter text file; reads stdin when omitted or `-`
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output directory (defaults to ~/DischargeLetter/exports)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// PDF file name
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    pub file_name: String,
}

impl OutputArgs {
    fn dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(config::exports_dir)
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let path = self.settings.unwrap_or_else(config::settings_path);
        let settings = Settings::load_with_env(&path)?;

        match self.command {
            Commands::Generate(args) => run_generate(args, settings),
            Commands::Render(args) => run_render(args, &settings),
            Commands::Correct { text } => {
                println!("{}", correct(&text, RuleSet::default_medical()));
                Ok(())
            }
            Commands::Check => run_check(&settings),
            Commands::Settings { write } => run_settings(&settings, &path, write),
        }
    }
}

fn run_generate(args: GenerateArgs, mut settings: Settings) -> Result<()> {
    if let Some(model) = args.model {
        settings.summary_model = model;
    }

    let summarizer = OllamaSummarizer::new(
        &settings.ollama_url,
        &settings.summary_model,
        settings.request_timeout_secs,
    )?;
    let translator = GoogleTranslator::new(settings.request_timeout_secs)?;
    let pipeline = LetterPipeline::new(&summarizer, &translator, RuleSet::default_medical(), &settings);

    let reviewer: Box<dyn Reviewer> = match (args.no_review, args.editor) {
        (true, _) => Box::new(AcceptAll),
        (false, Some(editor)) => Box::new(EditorReviewer::new(editor)),
        (false, None) => match EditorReviewer::from_env() {
            Some(editor) => Box::new(editor),
            None => {
                tracing::warn!("No $VISUAL or $EDITOR set, keeping drafts unedited");
                Box::new(AcceptAll)
            }
        },
    };

    let notes = ClinicalNotes {
        diagnosis: args.diagnosis,
        treatment: args.treatment,
        recommendations: args.recommendations,
    };
    let letter = pipeline.generate(&notes, reviewer.as_ref())?;

    println!("{}\n", compose_markdown(&letter.fields));
    let path = export_to_file(&letter.pdf, &args.output.dir(), &args.output.file_name)?;
    println!("PDF written to {}", path.display());
    Ok(())
}

fn run_render(args: RenderArgs, settings: &Settings) -> Result<()> {
    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let pdf = export(&text, &settings.layout)?;
    let path = export_to_file(&pdf, &args.output.dir(), &args.output.file_name)?;
    println!("PDF written to {}", path.display());
    Ok(())
}

fn run_check(settings: &Settings) -> Result<()> {
    let summarizer = OllamaSummarizer::new(&settings.ollama_url, &settings.summary_model, 10)?;
    let available = summarizer
        .is_model_available()
        .with_context(|| format!("Ollama not reachable at {}", summarizer.base_url()))?;
    if available {
        println!("Ollama OK at {}, model `{}` installed", summarizer.base_url(), summarizer.model());
    } else {
        println!(
            "Ollama reachable at {}, but model `{}` is missing (run `ollama pull {}`)",
            summarizer.base_url(),
            summarizer.model(),
            summarizer.model()
        );
    }
    Ok(())
}

fn run_settings(settings: &Settings, path: &Path, write: bool) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    if write {
        settings.save(path)?;
        println!("Settings written to {}", path.display());
    }
    Ok(())
}
