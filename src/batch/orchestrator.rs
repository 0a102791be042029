//! # Batch Orchestrator
//!
//! Esegue un batch di file in sequenza, un file (e un processo esterno) alla volta.
//!
//! ## Flusso per ogni path:
//! 1. Controlla la cancellazione (solo tra un file e l'altro)
//! 2. Classifica; se non supportato → outcome `Skipped`, nessuna strategia invocata
//! 3. Valida l'input e calcola il path di output, mai condiviso con un altro file del batch
//! 4. Esegue la strategia su un file di staging, con timeout per file
//! 5. Verifica lo staging e lo sostituisce atomicamente alla destinazione
//! 6. Emette `Progress { completed, total, outcome }`
//!
//! Un fallimento non interrompe mai il batch: diventa un outcome `Failure`.

use super::events::{BatchEvent, BatchSummary, CancelSignal, EventSender};
use super::job::{CompressionJob, CompressionOutcome};
use super::path_resolver::PathResolver;
use crate::classifier;
use crate::config::Settings;
use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::toolbox::Toolbox;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct BatchOrchestrator {
    toolbox: Toolbox,
}

impl BatchOrchestrator {
    pub fn new(toolbox: Toolbox) -> Self {
        Self { toolbox }
    }

    /// Process `paths` in order, returning one outcome per processed path
    pub async fn run_batch(
        &self,
        paths: Vec<PathBuf>,
        settings: Arc<Settings>,
        events: &EventSender,
        cancel: &mut CancelSignal,
    ) -> Vec<CompressionOutcome> {
        let start_time = Instant::now();
        let total = paths.len();
        let mut summary = BatchSummary::new(total);
        let mut outcomes = Vec::with_capacity(total);
        // Inputs and committed outputs; no later file may write over them
        let mut claimed: HashSet<PathBuf> = paths.iter().cloned().collect();

        info!("Starting batch of {} files", total);
        events.emit(BatchEvent::Started { total });

        for (index, path) in paths.into_iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Batch cancelled after {} of {} files", index, total);
                summary.cancelled = true;
                break;
            }

            events.emit(BatchEvent::FileStarted { index, total, path: path.clone() });

            let outcome = match classifier::classify(&path) {
                None => {
                    debug!("Skipping unsupported file: {}", path.display());
                    let reason = CompressError::UnsupportedFormat(path.display().to_string()).to_string();
                    CompressionOutcome::skipped(index, path, reason)
                }
                Some(kind) => {
                    let job = CompressionJob::new(index, path, kind, settings.clone());
                    self.process_job(&job, &claimed).await
                }
            };

            if let Some(output) = outcome.output() {
                claimed.insert(output.clone());
            }

            summary.record(&outcome);
            events.emit(BatchEvent::Progress {
                completed: index + 1,
                total,
                outcome: outcome.clone(),
            });
            outcomes.push(outcome);
        }

        summary.elapsed = start_time.elapsed();
        info!(
            "Batch finished: {} succeeded, {} failed, {} skipped in {:.1}s",
            summary.succeeded,
            summary.failed,
            summary.skipped,
            summary.elapsed.as_secs_f64()
        );
        events.emit(BatchEvent::Finished { summary });

        outcomes
    }

    /// Run one job, converting every error into a failure outcome
    async fn process_job(&self, job: &CompressionJob, claimed: &HashSet<PathBuf>) -> CompressionOutcome {
        let start = Instant::now();

        let original_size = match FileManager::validate_input(&job.input).await {
            Ok(size) => size,
            Err(e) => {
                error!("{}", e);
                return CompressionOutcome::failure(job, 0, &e, start.elapsed());
            }
        };

        match self.compress_and_commit(job, claimed).await {
            Ok((output, compressed_size)) => {
                info!(
                    "✅ {}: {} -> {} ({:.1}% saved)",
                    job.input.display(),
                    FileManager::format_size(original_size),
                    FileManager::format_size(compressed_size),
                    FileManager::calculate_reduction(original_size, compressed_size)
                );
                CompressionOutcome::success(job, original_size, output, compressed_size, start.elapsed())
            }
            Err(e) => {
                error!("❌ {}: {}", job.input.display(), e);
                CompressionOutcome::failure(job, original_size, &e, start.elapsed())
            }
        }
    }

    async fn compress_and_commit(
        &self,
        job: &CompressionJob,
        claimed: &HashSet<PathBuf>,
    ) -> Result<(PathBuf, u64), CompressError> {
        let candidate = PathResolver::output_path(&job.input, job.kind, &job.settings)?;
        let destination = PathResolver::unclaimed(&job.input, candidate, claimed);
        PathResolver::ensure_parent_dirs(&destination).await?;

        // Dropping the staging path removes it, so failures leave nothing behind
        let staging = FileManager::staging_path(&destination)?;

        let compression = job.strategy.compress(job, &self.toolbox, &staging);
        match job.settings.tool_timeout() {
            Some(limit) => tokio::time::timeout(limit, compression).await.map_err(|_| {
                CompressError::tool_failed(
                    job.strategy.name(),
                    format!("timed out after {}s", limit.as_secs()),
                )
            })??,
            None => compression.await?,
        }

        let compressed_size = FileManager::verify_output(&staging).await?;

        // A replaced file keeps its mode, a new one takes the input's
        let reference = if destination.exists() { &destination } else { &job.input };
        FileManager::copy_permissions(reference, &staging).await?;
        FileManager::commit(staging, &destination)?;

        Ok((destination, compressed_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::events::{event_channel, CancelHandle};
    use crate::batch::OutcomeStatus;
    use crate::error::ErrorKind;
    use crate::toolbox::testing::{sample_jpeg, Behavior, FakeToolbox, FAKE_PDF};
    use tempfile::TempDir;

    fn no_overwrite() -> Arc<Settings> {
        Arc::new(Settings { auto_overwrite: false, ..Default::default() })
    }

    async fn run(toolbox: Toolbox, paths: Vec<PathBuf>, settings: Arc<Settings>) -> Vec<CompressionOutcome> {
        let (_handle, mut cancel) = CancelHandle::new();
        BatchOrchestrator::new(toolbox)
            .run_batch(paths, settings, &EventSender::disabled(), &mut cancel)
            .await
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (toolbox, calls) = FakeToolbox::default().build();
        let (events, mut rx) = event_channel();
        let (_handle, mut cancel) = CancelHandle::new();

        let outcomes = BatchOrchestrator::new(toolbox)
            .run_batch(Vec::new(), no_overwrite(), &events, &mut cancel)
            .await;

        assert!(outcomes.is_empty());
        assert_eq!(calls.total(), 0);
        assert!(matches!(rx.recv().await, Some(BatchEvent::Started { total: 0 })));
        match rx.recv().await {
            Some(BatchEvent::Finished { summary }) => assert_eq!(summary.completed(), 0),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("scan.pdf");
        std::fs::write(&input, b"%PDF-1.4 original content").unwrap();

        let (toolbox, _) = FakeToolbox::default().build();
        let outcomes = run(toolbox, vec![input.clone()], no_overwrite()).await;

        assert_eq!(outcomes.len(), 1);
        let output = temp_dir.path().join("scan_compressed.pdf");
        assert_eq!(
            outcomes[0].status,
            OutcomeStatus::Success { output: output.clone(), compressed_size: FAKE_PDF.len() as u64 }
        );
        assert_eq!(std::fs::read(&output).unwrap(), FAKE_PDF);
        assert_eq!(std::fs::read(&input).unwrap(), b"%PDF-1.4 original content");
    }

    #[tokio::test]
    async fn test_mixed_batch_example() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.jpg");
        let b = temp_dir.path().join("b.unsupported");
        let c = temp_dir.path().join("c.pdf");
        std::fs::write(&a, sample_jpeg(120, 90, 100)).unwrap();
        std::fs::write(&b, b"whatever").unwrap();
        std::fs::write(&c, b"%PDF-1.4").unwrap();

        let (toolbox, calls) = FakeToolbox { pdf: Behavior::Missing, ..Default::default() }.build();
        let outcomes = run(toolbox, vec![a.clone(), b.clone(), c.clone()], no_overwrite()).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().map(|o| o.index).collect::<Vec<_>>(), vec![0, 1, 2]);

        let compressed = temp_dir.path().join("a_compressed.jpg");
        assert_eq!(outcomes[0].output(), Some(&compressed));
        assert!(outcomes[0].compressed_size().unwrap() <= outcomes[0].original_size);
        assert!(image::load_from_memory(&std::fs::read(&compressed).unwrap()).is_ok());

        assert!(outcomes[1].is_skipped());
        assert_eq!(outcomes[1].input, b);

        match &outcomes[2].status {
            OutcomeStatus::Failure { error, .. } => assert_eq!(*error, ErrorKind::ExternalToolMissing),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!temp_dir.path().join("c_compressed.pdf").exists());
        // the unsupported file never reached a tool
        assert_eq!(calls.pdf(), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for name in ["one.pdf", "missing.pdf", "broken.png", "four.pdf"] {
            paths.push(temp_dir.path().join(name));
        }
        std::fs::write(&paths[0], b"%PDF").unwrap();
        std::fs::write(&paths[2], b"not a png").unwrap();
        std::fs::write(&paths[3], b"%PDF").unwrap();

        let (toolbox, _) = FakeToolbox::default().build();
        let outcomes = run(toolbox, paths.clone(), no_overwrite()).await;

        let inputs: Vec<_> = outcomes.iter().map(|o| o.input.clone()).collect();
        assert_eq!(inputs, paths);
        assert!(outcomes[0].is_success());
        assert!(matches!(outcomes[1].status, OutcomeStatus::Failure { error: ErrorKind::InputUnreadable, .. }));
        assert!(matches!(outcomes[2].status, OutcomeStatus::Failure { error: ErrorKind::InvalidContent, .. }));
        assert!(outcomes[3].is_success());

        // failed files leave no staging or output behind
        let mut names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["broken.png", "four.pdf", "four_compressed.pdf", "one.pdf", "one_compressed.pdf"]);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ordered() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<_> = ["one.pdf", "missing.pdf", "photo.jpg", "notes.txt", "two.pdf"]
            .iter()
            .map(|name| temp_dir.path().join(name))
            .collect();
        std::fs::write(&paths[0], b"%PDF").unwrap();
        std::fs::write(&paths[2], sample_jpeg(64, 48, 95)).unwrap();
        std::fs::write(&paths[3], b"plain text").unwrap();
        std::fs::write(&paths[4], b"%PDF").unwrap();

        let (toolbox, calls) = FakeToolbox::default().build();
        let (events, mut rx) = event_channel();
        let (_handle, mut cancel) = CancelHandle::new();
        let outcomes = BatchOrchestrator::new(toolbox)
            .run_batch(paths.clone(), no_overwrite(), &events, &mut cancel)
            .await;
        drop(events);

        let mut completed = Vec::new();
        let mut reported = Vec::new();
        while let Some(event) = rx.recv().await {
            if let BatchEvent::Progress { completed: n, total, outcome } = event {
                assert_eq!(total, 5);
                assert_eq!(outcome.index + 1, n);
                completed.push(n);
                reported.push(outcome.input);
            }
        }
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);
        assert_eq!(reported, paths);

        let indices: Vec<_> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(outcomes[0].is_success());
        assert!(outcomes[1].is_failure());
        assert!(outcomes[2].is_success());
        assert!(outcomes[3].is_skipped());
        assert!(outcomes[4].is_success());
        assert_eq!(calls.pdf(), 2);
    }

    #[tokio::test]
    async fn test_clashing_destinations_get_distinct_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let pdf = temp_dir.path().join("report.pdf");
        let docx = temp_dir.path().join("report.docx");
        let heic = temp_dir.path().join("IMG.heic");
        let jpg = temp_dir.path().join("IMG.jpg");
        std::fs::write(&pdf, b"%PDF-1.4 report").unwrap();
        std::fs::write(&docx, b"PK docx").unwrap();
        std::fs::write(&heic, b"heic").unwrap();
        std::fs::write(&jpg, sample_jpeg(64, 48, 95)).unwrap();

        let (toolbox, _) = FakeToolbox::default().build();
        let outcomes = run(toolbox, vec![pdf, docx, heic, jpg], no_overwrite()).await;

        assert!(outcomes.iter().all(|o| o.is_success()));
        let outputs: Vec<_> = outcomes.iter().map(|o| o.output().unwrap().clone()).collect();
        assert_eq!(
            outputs,
            vec![
                temp_dir.path().join("report_compressed.pdf"),
                temp_dir.path().join("report_compressed_1.pdf"),
                temp_dir.path().join("IMG_compressed.jpg"),
                temp_dir.path().join("IMG_compressed_1.jpg"),
            ]
        );
        for output in &outputs {
            assert!(output.exists());
        }
    }

    #[tokio::test]
    async fn test_output_directory_keeps_same_named_files_apart() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let first = temp_dir.path().join("2023").join("scan.pdf");
        let second = temp_dir.path().join("2024").join("scan.pdf");
        for path in [&first, &second] {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"%PDF").unwrap();
        }

        let settings = Arc::new(Settings { output_directory: Some(out_dir.clone()), ..Default::default() });
        let (toolbox, _) = FakeToolbox::default().build();
        let outcomes = run(toolbox, vec![first, second], settings).await;

        assert_eq!(outcomes[0].output(), Some(&out_dir.join("scan_compressed.pdf")));
        assert_eq!(outcomes[1].output(), Some(&out_dir.join("scan_compressed_1.pdf")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_commit_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let replaced = temp_dir.path().join("shared.pdf");
        let copied = temp_dir.path().join("private.pdf");
        std::fs::write(&replaced, b"%PDF-1.4 a much longer original file body").unwrap();
        std::fs::write(&copied, b"%PDF-1.4 another original").unwrap();
        std::fs::set_permissions(&replaced, std::fs::Permissions::from_mode(0o644)).unwrap();
        std::fs::set_permissions(&copied, std::fs::Permissions::from_mode(0o640)).unwrap();

        fn mode(path: &std::path::Path) -> u32 {
            std::fs::metadata(path).unwrap().permissions().mode() & 0o777
        }

        let (toolbox, _) = FakeToolbox::default().build();
        let outcomes = run(toolbox, vec![replaced.clone()], Arc::new(Settings::default())).await;
        assert_eq!(outcomes[0].output(), Some(&replaced));
        assert_eq!(mode(&replaced), 0o644);

        let (toolbox, _) = FakeToolbox::default().build();
        let outcomes = run(toolbox, vec![copied.clone()], no_overwrite()).await;
        let output = outcomes[0].output().unwrap();
        assert_eq!(output, &temp_dir.path().join("private_compressed.pdf"));
        assert_eq!(mode(output), 0o640);
    }

    #[tokio::test]
    async fn test_cancellation_between_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<_> = (0..3).map(|i| temp_dir.path().join(format!("f{i}.pdf"))).collect();
        for path in &paths {
            std::fs::write(path, b"%PDF").unwrap();
        }

        let (toolbox, calls) = FakeToolbox::default().build();
        let (events, mut rx) = event_channel();
        let (handle, mut cancel) = CancelHandle::new();
        handle.cancel();

        let outcomes = BatchOrchestrator::new(toolbox)
            .run_batch(paths, no_overwrite(), &events, &mut cancel)
            .await;
        drop(events);

        assert!(outcomes.is_empty());
        assert_eq!(calls.total(), 0);
        let mut cancelled = false;
        while let Some(event) = rx.recv().await {
            if let BatchEvent::Finished { summary } = event {
                cancelled = summary.cancelled;
            }
        }
        assert!(cancelled);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_input_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("scan.pdf");
        std::fs::write(&input, b"%PDF-1.4 a much longer original file body").unwrap();

        let (toolbox, _) = FakeToolbox::default().build();
        let outcomes = run(toolbox, vec![input.clone()], Arc::new(Settings::default())).await;

        assert_eq!(outcomes[0].output(), Some(&input));
        assert_eq!(std::fs::read(&input).unwrap(), FAKE_PDF);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_overwrite_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("scan.pdf");
        std::fs::write(&input, b"%PDF original").unwrap();

        let (toolbox, _) = FakeToolbox { pdf: Behavior::Fail, ..Default::default() }.build();
        let outcomes = run(toolbox, vec![input.clone()], Arc::new(Settings::default())).await;

        assert!(outcomes[0].is_failure());
        assert_eq!(std::fs::read(&input).unwrap(), b"%PDF original");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_hanging_tool_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let slow = temp_dir.path().join("slow.pdf");
        let next = temp_dir.path().join("next.pdf");
        std::fs::write(&slow, b"%PDF").unwrap();
        std::fs::write(&next, b"%PDF").unwrap();

        let settings = Arc::new(Settings {
            auto_overwrite: false,
            tool_timeout_secs: Some(1),
            ..Default::default()
        });
        let (toolbox, _) = FakeToolbox { pdf: Behavior::Hang, ..Default::default() }.build();
        let outcomes = run(toolbox, vec![slow, next], settings).await;

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            match &outcome.status {
                OutcomeStatus::Failure { error, reason } => {
                    assert_eq!(*error, ErrorKind::ExternalToolFailed);
                    assert!(reason.contains("timed out"));
                }
                other => panic!("expected timeout, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_output_directory_and_document_pipeline() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let input = temp_dir.path().join("report.docx");
        std::fs::write(&input, b"PK docx").unwrap();

        let settings = Arc::new(Settings { output_directory: Some(out_dir.clone()), ..Default::default() });
        let (toolbox, calls) = FakeToolbox::default().build();
        let outcomes = run(toolbox, vec![input.clone()], settings).await;

        assert_eq!(outcomes[0].output(), Some(&out_dir.join("report_compressed.pdf")));
        assert_eq!((calls.convert(), calls.pdf()), (1, 1));
        assert!(input.exists());
    }
}
