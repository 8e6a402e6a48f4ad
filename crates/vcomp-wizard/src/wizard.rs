//! Composer wizard controller.
//!
//! Owns the wizard state and orchestrates the four steps:
//! upload -> configure -> processing -> done.
//!
//! State lives behind a mutex that is never held across an `.await`.
//! Background work (the auto-advance timer, the synthetic progress ticker)
//! runs in spawned tasks owned by abortable handles. Operations that
//! complete after a [`Wizard::reset`] are discarded via a generation counter.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use futures_util::{stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};
use url::Url;

use vcomp_client::{ClientError, ComposerClient, DownloadedFile, LocalVideoFile};
use vcomp_models::{output_filename, ComposeRequest, ComposeResult, TransitionKind, UploadedVideo};

use crate::config::WizardConfig;
use crate::error::{WizardError, WizardResult};
use crate::logging::SessionLogger;
use crate::notify::Notification;
use crate::progress::ProgressTicker;
use crate::state::{ProjectStats, WizardState};
use crate::step::{WizardStep, MIN_VIDEOS};
use crate::upload::{validate_file, RejectReason};

/// Shown when the backend fails without saying why.
const COMPOSE_FALLBACK_MESSAGE: &str = "composition failed";
const UPLOAD_FALLBACK_MESSAGE: &str = "unknown error";

/// Outcome of one upload batch.
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Descriptors appended to the video list, in completion order
    pub uploaded: Vec<UploadedVideo>,
    /// Files refused before any network transfer
    pub rejected: Vec<(String, RejectReason)>,
    /// Files the backend or the network failed on
    pub failed: Vec<(String, ClientError)>,
}

impl UploadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: WizardState,
    notifications: Vec<Notification>,
    /// Bumped by every reset
    generation: u64,
}

impl Shared {
    fn notify(&mut self, notification: Notification, session_id: &str) {
        notification.emit(session_id);
        self.notifications.push(notification);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Client-side controller of the composition wizard.
pub struct Wizard {
    client: ComposerClient,
    config: WizardConfig,
    shared: Arc<Mutex<Shared>>,
    progress: Arc<watch::Sender<f64>>,
    auto_advance: Mutex<Option<JoinHandle<()>>>,
    /// Ticker of the running composition. Locked after `shared` when both are held.
    ticker: Mutex<Option<ProgressTicker>>,
    logger: SessionLogger,
}

impl Wizard {
    pub fn new(client: ComposerClient, config: WizardConfig) -> Self {
        let (progress, _) = watch::channel(0.0);
        let logger = SessionLogger::new("wizard");
        debug!(session_id = %logger.session_id(), "Wizard session created");

        Self {
            client,
            config,
            shared: Arc::new(Mutex::new(Shared::default())),
            progress: Arc::new(progress),
            auto_advance: Mutex::new(None),
            ticker: Mutex::new(None),
            logger,
        }
    }

    /// Backend client used by every step.
    pub fn client(&self) -> &ComposerClient {
        &self.client
    }

    /// Timings and limits this wizard runs with.
    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Id tagging every log line of this wizard.
    pub fn session_id(&self) -> &str {
        self.logger.session_id()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    fn notify(&self, notification: Notification) {
        self.lock().notify(notification, self.logger.session_id());
    }

    // ----- Read side -----

    /// Copy of the current state.
    pub fn snapshot(&self) -> WizardState {
        self.lock().state.clone()
    }

    /// Step the wizard is on.
    pub fn step(&self) -> WizardStep {
        self.lock().state.step
    }

    /// Uploaded videos in composition order.
    pub fn videos(&self) -> Vec<UploadedVideo> {
        self.lock().state.videos.clone()
    }

    /// Result of the last successful composition, if any.
    pub fn result(&self) -> Option<ComposeResult> {
        self.lock().state.result.clone()
    }

    /// Counts, total size and total duration of the uploaded videos.
    pub fn stats(&self) -> ProjectStats {
        self.lock().state.stats()
    }

    /// Take all notifications raised since the last call.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock().notifications)
    }

    /// Current synthetic progress (0-100). Not a backend signal.
    pub fn progress(&self) -> f64 {
        *self.progress.borrow()
    }

    /// Watch synthetic progress updates.
    pub fn subscribe_progress(&self) -> watch::Receiver<f64> {
        self.progress.subscribe()
    }

    /// Estimated time left for the running composition.
    pub fn eta(&self) -> Duration {
        self.config.progress_settings().eta(self.progress())
    }

    // ----- Upload step -----

    /// Validate a batch and upload accepted files concurrently.
    ///
    /// Rejected files are never transmitted. Each successful completion
    /// appends its own descriptors; failures leave the list untouched.
    pub async fn upload_files(&self, files: Vec<LocalVideoFile>) -> UploadReport {
        let logger = self.logger.for_operation("upload");
        let mut report = UploadReport::default();
        let mut accepted = Vec::with_capacity(files.len());

        for file in files {
            match validate_file(&file, self.config.max_upload_bytes) {
                Ok(()) => accepted.push(file),
                Err(reason) => {
                    let err = WizardError::rejected(file.name.clone(), reason.clone());
                    self.notify(Notification::error(err.to_string()));
                    report.rejected.push((file.name, reason));
                }
            }
        }

        if accepted.is_empty() {
            return report;
        }

        let generation = {
            let mut shared = self.lock();
            shared.state.uploads_in_flight += accepted.len();
            shared.generation
        };
        logger.log_start(&format!("{} file(s)", accepted.len()));

        let total = accepted.len();
        let mut finished = 0;
        let client = &self.client;
        let mut completions = stream::iter(accepted)
            .map(|file| async move {
                let outcome = client.upload(&file).await;
                (file, outcome)
            })
            .buffer_unordered(self.config.upload_parallelism.max(1));

        while let Some((file, outcome)) = completions.next().await {
            let mut shared = self.lock();
            if shared.generation != generation {
                debug!(file = %file.name, "Discarding upload completed after reset");
                continue;
            }
            shared.state.uploads_in_flight = shared.state.uploads_in_flight.saturating_sub(1);
            finished += 1;
            logger.log_progress(&format!("{}/{} upload(s) finished", finished, total));

            match outcome {
                Ok(videos) => {
                    shared.state.videos.extend(videos.iter().cloned());
                    let ready = shared.state.videos.len() >= MIN_VIDEOS;
                    shared.notify(
                        Notification::success(format!("{} uploaded", file.name)),
                        self.logger.session_id(),
                    );
                    drop(shared);

                    report.uploaded.extend(videos);
                    if ready {
                        self.schedule_auto_advance();
                    }
                }
                Err(err) => {
                    let reason = match &err {
                        ClientError::Backend { message, .. } => message
                            .clone()
                            .unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string()),
                        other => other.to_string(),
                    };
                    shared.notify(
                        Notification::error(format!("{} upload failed: {}", file.name, reason)),
                        self.logger.session_id(),
                    );
                    report.failed.push((file.name, err));
                }
            }
        }

        logger.log_completion(&format!(
            "{} uploaded, {} rejected, {} failed",
            report.uploaded.len(),
            report.rejected.len(),
            report.failed.len()
        ));
        report
    }

    /// Move to the configure step after the configured delay, if the
    /// wizard is still on the upload step with enough videos by then.
    fn schedule_auto_advance(&self) {
        let shared = Arc::clone(&self.shared);
        let delay = self.config.auto_advance_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut shared = lock(&shared);
            if shared.state.step == WizardStep::Upload && shared.state.videos.len() >= MIN_VIDEOS {
                shared.state.step = WizardStep::Configure;
                debug!("Auto-advanced to configure step");
            }
        });

        let previous = lock(&self.auto_advance).replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel_auto_advance(&self) {
        let pending = lock(&self.auto_advance).take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }

    /// Remove the video at `index`, keeping the order of the rest.
    ///
    /// Dropping below two videos sends the wizard back to the upload step.
    pub fn remove_video(&self, index: usize) -> WizardResult<UploadedVideo> {
        let mut shared = self.lock();

        if shared.state.composing {
            return Err(WizardError::Busy);
        }
        if index >= shared.state.videos.len() {
            return Err(WizardError::InvalidIndex(index));
        }

        let removed = shared.state.videos.remove(index);
        if shared.state.videos.len() < MIN_VIDEOS {
            shared.state.step = WizardStep::Upload;
        }
        shared.notify(
            Notification::success(format!("Removed {}", removed.original_name)),
            self.logger.session_id(),
        );

        Ok(removed)
    }

    // ----- Configure step -----

    /// Select the transition applied to every gap.
    pub fn set_transition(&self, kind: TransitionKind) {
        self.lock().state.settings.set_kind(kind);
    }

    /// Select the transition duration, in seconds.
    ///
    /// Only the offered options are accepted; anything else leaves the
    /// setting unchanged.
    pub fn set_duration(&self, duration: f64) -> WizardResult<()> {
        self.lock().state.settings.set_duration(duration)?;
        Ok(())
    }

    // ----- Navigation -----

    /// Jump directly to a step if the navigation guard allows it.
    pub fn go_to_step(&self, target: WizardStep) -> WizardResult<()> {
        let mut shared = self.lock();
        let current = shared.state.step;

        if !shared.state.can_jump(target) {
            shared.notify(
                Notification::warning("Finish the current step first"),
                self.logger.session_id(),
            );
            return Err(WizardError::StepLocked {
                requested: target,
                current,
            });
        }

        shared.state.step = target;
        shared.notify(
            Notification::info(format!("Switched to: {}", target.title())),
            self.logger.session_id(),
        );
        Ok(())
    }

    // ----- Processing step -----

    /// Submit the composition and wait for the backend.
    ///
    /// Every gap gets the currently selected transition. On failure the
    /// wizard returns to the configure step so the user can retry without
    /// uploading again. Dropping the returned future before it resolves
    /// has the same effect. A [`Wizard::reset`] while waiting discards the
    /// outcome and yields [`WizardError::Discarded`].
    pub async fn compose(&self) -> WizardResult<ComposeResult> {
        let logger = self.logger.for_operation("compose");

        let (request, generation) = {
            let mut shared = self.lock();

            if shared.state.composing {
                return Err(WizardError::Busy);
            }

            let count = shared.state.videos.len();
            if count < MIN_VIDEOS {
                shared.notify(
                    Notification::error("At least 2 videos are required to compose"),
                    self.logger.session_id(),
                );
                return Err(WizardError::NotEnoughVideos(count));
            }

            let request = ComposeRequest::uniform(
                &shared.state.videos,
                shared.state.settings.spec(),
                output_filename(&self.config.output_prefix, Utc::now()),
            );

            shared.state.composing = true;
            shared.state.result = None;
            shared.state.step = WizardStep::Processing;

            // Started under the state lock so a concurrent reset always sees it.
            let ticker = ProgressTicker::start(Arc::clone(&self.progress), self.config.progress_settings());
            if let Some(stale) = lock(&self.ticker).replace(ticker) {
                stale.cancel();
            }
            (request, shared.generation)
        };

        logger.log_start(&format!(
            "{} videos, {} transitions -> {}",
            request.video_files.len(),
            request.transitions.len(),
            request.output_filename
        ));

        let guard = ComposeGuard {
            wizard: self,
            generation,
            armed: true,
        };
        let outcome = self
            .client
            .compose(&request)
            .instrument(logger.create_span())
            .await;
        guard.disarm();

        let mut shared = self.lock();
        if shared.generation != generation {
            // Reset already stopped the ticker and zeroed progress.
            logger.log_warning("wizard was reset while composing, outcome discarded");
            return Err(WizardError::Discarded);
        }
        shared.state.composing = false;

        match outcome {
            Ok(result) => {
                self.finish_ticker(true);
                logger.log_progress("synthetic progress snapped to 100%");
                shared.state.result = Some(result.clone());
                shared.state.step = WizardStep::Done;
                shared.notify(
                    Notification::success("Composition finished"),
                    self.logger.session_id(),
                );
                logger.log_completion(&result.output_filename);
                Ok(result)
            }
            Err(err) => {
                // A response landed even if it was a rejection or unreadable.
                let answered = matches!(
                    err,
                    ClientError::Backend { .. } | ClientError::MalformedResponse(_) | ClientError::Json(_)
                );
                self.finish_ticker(answered);

                let message = compose_failure_message(&err);
                shared.state.step = WizardStep::Configure;
                shared.notify(
                    Notification::error(format!("Composition failed: {}", message)),
                    self.logger.session_id(),
                );
                logger.log_error(&message);
                Err(WizardError::ComposeFailed {
                    message,
                    source: err,
                })
            }
        }
    }

    /// Stop the running ticker, snapping to 100% if `complete`.
    fn finish_ticker(&self, complete: bool) {
        if let Some(ticker) = lock(&self.ticker).take() {
            if complete {
                ticker.complete();
            } else {
                ticker.cancel();
            }
        }
    }

    // ----- Done step -----

    fn require_result(&self, missing: &str) -> WizardResult<ComposeResult> {
        let mut shared = self.lock();
        match shared.state.result.clone() {
            Some(result) => Ok(result),
            None => {
                shared.notify(Notification::error(missing), self.logger.session_id());
                Err(WizardError::NoResult)
            }
        }
    }

    /// Link that serves the composed file as an attachment.
    pub fn download_link(&self) -> WizardResult<Url> {
        let result = self.require_result("No file available for download")?;
        Ok(self.client.download_url(&result.output_filename)?)
    }

    /// Link that renders the composed file in a browser.
    pub fn preview_link(&self) -> WizardResult<Url> {
        let result = self.require_result("No file available for preview")?;
        Ok(self.client.preview_url(&result.output_filename)?)
    }

    /// Preview link for one of the uploaded videos.
    pub fn preview_video_link(&self, index: usize) -> WizardResult<Url> {
        let video = self
            .lock()
            .state
            .videos
            .get(index)
            .cloned()
            .ok_or(WizardError::InvalidIndex(index))?;

        let url = self.client.preview_url(&video.filename)?;
        self.notify(Notification::info(format!("Previewing {}", video.original_name)));
        Ok(url)
    }

    /// Save the composed file into `dest_dir`.
    pub async fn download(&self, dest_dir: impl AsRef<Path>) -> WizardResult<DownloadedFile> {
        let result = self.require_result("No file available for download")?;
        self.notify(Notification::success("Download started"));

        match self.client.download(&result.output_filename, dest_dir).await {
            Ok(file) => {
                self.notify(Notification::success(format!(
                    "Saved {}",
                    file.path.display()
                )));
                Ok(file)
            }
            Err(err) => {
                self.notify(Notification::error(format!("Download failed: {}", err)));
                Err(err.into())
            }
        }
    }

    /// Start over: no videos, no result, default settings, upload step.
    ///
    /// Stops the progress ticker and any pending auto-advance.
    pub fn reset(&self) {
        self.cancel_auto_advance();

        let mut shared = self.lock();
        shared.generation += 1;
        shared.state = WizardState::default();
        self.finish_ticker(false);
        self.progress.send_replace(0.0);
        debug!(session_id = %self.logger.session_id(), "Wizard reset");
    }
}

impl Drop for Wizard {
    fn drop(&mut self) {
        self.cancel_auto_advance();
    }
}

/// Puts the wizard back on the configure step when a compose future is
/// dropped before the backend answered.
struct ComposeGuard<'a> {
    wizard: &'a Wizard,
    generation: u64,
    armed: bool,
}

impl ComposeGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ComposeGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut shared = self.wizard.lock();
        if shared.generation != self.generation {
            return;
        }
        shared.state.composing = false;
        shared.state.step = WizardStep::Configure;
        self.wizard.finish_ticker(false);
        shared.notify(
            Notification::warning("Composition abandoned before the backend answered"),
            self.wizard.logger.session_id(),
        );
    }
}

fn compose_failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Backend { message, .. } => message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| COMPOSE_FALLBACK_MESSAGE.to_string()),
        other => other.to_string(),
    }
}
