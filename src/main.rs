//! # File Compressor - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento, override e salvataggio delle impostazioni
//! - Avvio del worker di batch e rendering degli eventi (console o JSON)
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (paths, quality, preset PDF, output, lingua, ...)
//! 2. Configura il logging su stderr e sui file di log (INFO o DEBUG, `RUST_LOG` ha priorità)
//! 3. Carica le impostazioni e applica gli override della CLI
//! 4. Espande le cartelle nei file supportati
//! 5. Sottomette il batch al worker e mostra gli eventi finché il batch termina
//! 6. Ctrl+C cancella il batch dopo il file corrente
//!
//! ## Esempio di utilizzo:
//! ```bash
//! file-compressor report.docx photos/ --quality 70 --pdf-quality ebook --no-overwrite
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use file_compressor::{
    logging, notify, BatchWorker, ConsoleReporter, FileManager, JsonMessage, Localizer, PdfPreset, SettingsPatch,
    SettingsStore, ToolPathResolver, Toolbox,
};

#[derive(Parser)]
#[command(name = "file-compressor")]
#[command(about = "Compress documents and images (DOCX, PDF, PNG, JPG, HEIC, XLSX, XLS, PPTX, PPT)")]
struct Args {
    /// Files or folders to compress
    paths: Vec<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// PDF quality preset: screen, ebook, printer, prepress
    #[arg(short, long)]
    pdf_quality: Option<PdfPreset>,

    /// Output directory (default: alongside the original files)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace original files when the format does not change
    #[arg(long, conflicts_with = "no_overwrite")]
    overwrite: bool,

    /// Always write <name>_compressed.<ext>
    #[arg(long)]
    no_overwrite: bool,

    /// UI language (en, de, fr, zh, ja, vi, th)
    #[arg(short, long)]
    language: Option<String>,

    /// Per-file time limit in seconds (0 disables it)
    #[arg(long)]
    timeout: Option<u64>,

    /// Emit one JSON object per line instead of human readable output
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Do not play a sound when the batch finishes
    #[arg(long)]
    no_sound: bool,

    /// Persist the given overrides as the new defaults
    #[arg(long)]
    save: bool,

    /// Reset stored settings to defaults before anything else
    #[arg(long)]
    reset_settings: bool,

    /// Print the availability of external tools
    #[arg(long)]
    tools: bool,

    /// Settings file to use instead of the platform default
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn settings_patch(&self) -> SettingsPatch {
        SettingsPatch {
            jpeg_quality: self.quality,
            pdf_quality: self.pdf_quality,
            auto_overwrite: if self.overwrite {
                Some(true)
            } else if self.no_overwrite {
                Some(false)
            } else {
                None
            },
            show_progress: self.no_progress.then_some(false),
            play_sound: self.no_sound.then_some(false),
            output_directory: self.output.clone().map(Some),
            language: self.language.clone(),
            tool_timeout_secs: self.timeout.map(|secs| (secs > 0).then_some(secs)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let (subscriber, _log_guards) = logging::subscriber(args.verbose, logging::default_log_dir().as_deref());
    tracing::subscriber::set_global_default(subscriber)?;

    let store = match args.settings {
        Some(ref path) => SettingsStore::new(path),
        None => SettingsStore::default_location()?,
    };

    if args.reset_settings {
        store.reset().await?;
    }

    let patch = args.settings_patch();
    let mut settings = store.load().await;
    settings.apply(patch.clone());
    settings.validate()?;

    let localizer = Localizer::new(&settings.language);

    if args.reset_settings {
        println!("{}", localizer.text("settings_reset"));
    }

    if args.save && !patch.is_empty() {
        store.save(&settings).await?;
        println!(
            "{}",
            localizer.format("settings_saved", &[("path", store.path().display().to_string())])
        );
    }

    let resolver = Arc::new(ToolPathResolver::new());

    if args.tools {
        println!("{}\n{}", localizer.text("tools_header"), resolver.tools_report());
    }

    if args.paths.is_empty() {
        if !args.tools && !args.save && !args.reset_settings {
            println!("{}\n", localizer.text("app_title"));
            println!(
                "{}\n{}\n",
                localizer.format("current_settings", &[("path", store.path().display().to_string())]),
                serde_json::to_string_pretty(&settings)?
            );
            println!("{}\n{}", localizer.text("tools_header"), resolver.tools_report());
            let languages: Vec<String> = Localizer::available_languages()
                .iter()
                .map(|(code, name)| format!("{} ({})", code, name))
                .collect();
            println!("{}: {}\n", localizer.text("languages_label"), languages.join(", "));
            println!("{}", localizer.text("progress_idle"));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let files = FileManager::expand_inputs(&args.paths);
    if files.is_empty() {
        if args.json {
            JsonMessage::error(localizer.text("invalid_file_message"), None).emit();
        } else {
            eprintln!("{}: {}", localizer.text("invalid_file_title"), localizer.text("invalid_file_message"));
        }
        return Ok(ExitCode::FAILURE);
    }

    if let Some(ref output_dir) = settings.output_directory {
        tokio::fs::create_dir_all(output_dir).await?;
        info!("{}", localizer.format("output_dir_selected", &[("directory", output_dir.display().to_string())]));
    } else {
        info!("{}", localizer.text("output_dir_label"));
    }

    let worker = BatchWorker::start(Toolbox::system(resolver.clone()));
    let mut handle = match worker.submit(files, &settings) {
        Ok(handle) => handle,
        Err(e) => {
            if args.json {
                JsonMessage::error("Failed to start batch", Some(e.to_string())).emit();
            }
            return Err(e);
        }
    };

    let cancel = handle.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current file");
            cancel.cancel();
        }
    });

    let mut reporter = ConsoleReporter::new(localizer.clone(), settings.show_progress);
    while let Some(event) = handle.next_event().await {
        if args.json {
            for message in JsonMessage::from_event(&event, &settings) {
                message.emit();
            }
        } else {
            reporter.handle(&event);
        }
    }

    let outcomes = handle.outcomes().await?;
    worker.shutdown().await?;

    if settings.play_sound && !outcomes.is_empty() {
        notify::play_completion_sound(&resolver).await;
    }

    if outcomes.iter().any(|o| o.is_failure()) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
