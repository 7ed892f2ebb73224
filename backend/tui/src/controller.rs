//! Interaction controller
//!
//! Gates analysis on both inputs being present, runs at most one analysis at
//! a time, and maps the outcome onto a [`UiHost`].
//!
//! `Idle -> Running -> {ShowResult, ShowError}`; the two display states accept
//! new input exactly like `Idle`.

use std::time::Instant;

use logging::{AnalysisEvent, EventLogger};
use mathtutor_core::{Analyzer, Credential, ImageBlob, ResultText, TutorError};
use mathtutor_understanding::is_unrecognized_reply;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::host::UiHost;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    ShowResult,
    ShowError,
}

/// What one finished analysis produced.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub attempt: u64,
    pub latency_ms: u64,
    pub result: Result<ResultText, TutorError>,
}

/// Handle to the analysis in flight.
pub struct PendingAnalysis {
    attempt: u64,
    handle: JoinHandle<AnalysisOutcome>,
}

impl PendingAnalysis {
    fn spawn<A: Analyzer>(attempt: u64, analyzer: A, image: ImageBlob) -> Self {
        let handle = tokio::spawn(async move {
            let start = Instant::now();
            let result = analyzer.analyze(&image).await;
            AnalysisOutcome {
                attempt,
                latency_ms: start.elapsed().as_millis() as u64,
                result,
            }
        });
        Self { attempt, handle }
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the outcome. `None` if the task was aborted or panicked.
    ///
    /// Cancel-safe; do not call again once it has returned.
    pub async fn outcome(&mut self) -> Option<AnalysisOutcome> {
        match (&mut self.handle).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(attempt = self.attempt, error = %e, "Analysis task did not complete");
                None
            }
        }
    }

    fn abort(self) {
        self.handle.abort();
    }
}

pub struct InteractionController<F> {
    session: Session,
    phase: Phase,
    factory: F,
    attempts: u64,
}

impl<F, A> InteractionController<F>
where
    F: Fn(Credential) -> A,
    A: Analyzer,
{
    /// `factory` builds a fresh client from the credential for every attempt.
    pub fn new(factory: F) -> Self {
        Self {
            session: Session::new(),
            phase: Phase::Idle,
            factory,
            attempts: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Analyses started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Starts an analysis if both inputs are present and changed since the
    /// last one. Never starts a second one while one is running.
    pub fn poll_start(&mut self, host: &mut dyn UiHost) -> Option<PendingAnalysis> {
        if self.phase == Phase::Running {
            return None;
        }
        let (credential, image) = self.session.take_ready()?;

        let analyzer = (self.factory)(credential);
        self.attempts += 1;
        EventLogger::log_event(
            self.attempts,
            AnalysisEvent::Started {
                model: analyzer.model().to_string(),
                image_name: image.name().to_string(),
                image_bytes: image.len(),
            },
        );

        host.clear_output();
        host.show_image(&image);
        host.set_busy(true);
        self.phase = Phase::Running;

        Some(PendingAnalysis::spawn(self.attempts, analyzer, image))
    }

    /// Shows a finished analysis and returns to accepting input.
    pub fn finish(&mut self, outcome: AnalysisOutcome, host: &mut dyn UiHost) {
        host.set_busy(false);
        match outcome.result {
            Ok(text) => {
                let unrecognized = is_unrecognized_reply(text.as_str());
                debug!(attempt = outcome.attempt, unrecognized, "Showing result");
                EventLogger::log_event(
                    outcome.attempt,
                    AnalysisEvent::Succeeded {
                        latency_ms: outcome.latency_ms,
                        unrecognized,
                    },
                );
                host.show_result(text.as_str());
                self.phase = Phase::ShowResult;
            }
            Err(err) => {
                EventLogger::log_event(
                    outcome.attempt,
                    AnalysisEvent::Failed {
                        kind: err.kind(),
                        error_msg: err.to_string(),
                    },
                );
                host.show_error(&err.user_message());
                self.phase = Phase::ShowError;
            }
        }
    }

    /// The task went away without an outcome (aborted or panicked).
    pub fn abandon(&mut self, attempt: u64, host: &mut dyn UiHost) {
        host.set_busy(false);
        EventLogger::log_event(attempt, AnalysisEvent::Cancelled);
        self.phase = Phase::Idle;
    }

    /// Aborts the analysis in flight. Nothing is shown for it.
    pub fn cancel(&mut self, pending: PendingAnalysis, host: &mut dyn UiHost) {
        let attempt = pending.attempt();
        pending.abort();
        self.abandon(attempt, host);
    }

    /// Starts an analysis if one is ready and waits for it to finish.
    ///
    /// Returns `None` when nothing was started.
    pub async fn run_ready(&mut self, host: &mut dyn UiHost) -> Option<Phase> {
        let mut pending = self.poll_start(host)?;
        match pending.outcome().await {
            Some(outcome) => self.finish(outcome, host),
            None => self.abandon(pending.attempt(), host),
        }
        Some(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mathtutor_understanding::stub::StubServer;
    use mathtutor_understanding::{InferenceClient, UNRECOGNIZED_IMAGE_REPLY};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum HostCall {
        Image(String),
        Busy(bool),
        Result(String),
        Error(String),
        Clear,
    }

    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<HostCall>,
    }

    impl RecordingHost {
        fn results(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    HostCall::Result(r) => Some(r.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn errors(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    HostCall::Error(e) => Some(e.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl UiHost for RecordingHost {
        fn show_image(&mut self, image: &ImageBlob) {
            self.calls.push(HostCall::Image(image.name().to_string()));
        }
        fn set_busy(&mut self, busy: bool) {
            self.calls.push(HostCall::Busy(busy));
        }
        fn show_result(&mut self, markdown: &str) {
            self.calls.push(HostCall::Result(markdown.to_string()));
        }
        fn show_error(&mut self, message: &str) {
            self.calls.push(HostCall::Error(message.to_string()));
        }
        fn clear_output(&mut self) {
            self.calls.push(HostCall::Clear);
        }
    }

    #[derive(Clone)]
    struct CountingAnalyzer {
        calls: Arc<AtomicUsize>,
        reply: Result<&'static str, u16>,
        delay: Duration,
    }

    impl CountingAnalyzer {
        fn replying(reply: &'static str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply: Ok(reply),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl Analyzer for CountingAnalyzer {
        fn model(&self) -> &str {
            "counting"
        }

        async fn analyze(&self, _image: &ImageBlob) -> Result<ResultText, TutorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            match self.reply {
                Ok(text) => Ok(ResultText::new(text)),
                Err(status) => Err(TutorError::Remote {
                    status,
                    body: "denied".into(),
                }),
            }
        }
    }

    fn image() -> ImageBlob {
        ImageBlob::new("problem.jpg", vec![0xff, 0xd8, 0xff])
    }

    #[tokio::test]
    async fn test_no_calls_while_an_input_is_missing() {
        let analyzer = CountingAnalyzer::replying("x");
        let calls = Arc::clone(&analyzer.calls);
        let mut controller = InteractionController::new(move |_: Credential| analyzer.clone());
        let mut host = RecordingHost::default();

        assert!(controller.run_ready(&mut host).await.is_none());
        controller.session_mut().set_credential("sk-1");
        assert!(controller.run_ready(&mut host).await.is_none());

        controller.session_mut().set_credential("");
        controller.session_mut().set_image(image());
        assert!(controller.run_ready(&mut host).await.is_none());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(host.calls.is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_one_call_per_pair() {
        let analyzer = CountingAnalyzer::replying("**[정답]**: 7");
        let calls = Arc::clone(&analyzer.calls);
        let mut controller = InteractionController::new(move |_: Credential| analyzer.clone());
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("sk-1");
        controller.session_mut().set_image(image());
        assert_eq!(controller.run_ready(&mut host).await, Some(Phase::ShowResult));
        assert!(controller.run_ready(&mut host).await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(
            host.calls,
            vec![
                HostCall::Clear,
                HostCall::Image("problem.jpg".into()),
                HostCall::Busy(true),
                HostCall::Busy(false),
                HostCall::Result("**[정답]**: 7".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_rerun_makes_independent_call() {
        let analyzer = CountingAnalyzer::replying("ok");
        let calls = Arc::clone(&analyzer.calls);
        let mut controller = InteractionController::new(move |_: Credential| analyzer.clone());
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("sk-1");
        controller.session_mut().set_image(image());
        controller.run_ready(&mut host).await;
        controller.session_mut().rearm();
        controller.run_ready(&mut host).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(controller.attempts(), 2);
        assert_eq!(host.results(), vec!["ok", "ok"]);
    }

    #[tokio::test]
    async fn test_never_two_in_flight() {
        let mut analyzer = CountingAnalyzer::replying("ok");
        analyzer.delay = Duration::from_millis(50);
        let calls = Arc::clone(&analyzer.calls);
        let mut controller = InteractionController::new(move |_: Credential| analyzer.clone());
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("sk-1");
        controller.session_mut().set_image(image());
        let mut pending = controller.poll_start(&mut host).unwrap();
        assert_eq!(controller.phase(), Phase::Running);

        controller.session_mut().set_image(ImageBlob::new("second.png", vec![1u8]));
        assert!(controller.poll_start(&mut host).is_none());

        let outcome = pending.outcome().await.unwrap();
        controller.finish(outcome, &mut host);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The change made while running is picked up afterwards.
        assert_eq!(controller.run_ready(&mut host).await, Some(Phase::ShowResult));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_shows_error_not_result() {
        let analyzer = CountingAnalyzer {
            calls: Arc::new(AtomicUsize::new(0)),
            reply: Err(401),
            delay: Duration::ZERO,
        };
        let mut controller = InteractionController::new(move |_: Credential| analyzer.clone());
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("bad");
        controller.session_mut().set_image(image());
        assert_eq!(controller.run_ready(&mut host).await, Some(Phase::ShowError));
        assert!(host.results().is_empty());
        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("401"));
        assert_eq!(host.calls.last(), Some(&HostCall::Error(errors[0].to_string())));

        // Still usable after a failure.
        controller.session_mut().set_credential("good");
        assert!(controller.poll_start(&mut host).is_some());
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle_without_output() {
        let mut analyzer = CountingAnalyzer::replying("late");
        analyzer.delay = Duration::from_secs(30);
        let mut controller = InteractionController::new(move |_: Credential| analyzer.clone());
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("k");
        controller.session_mut().set_image(image());
        let pending = controller.poll_start(&mut host).unwrap();
        controller.cancel(pending, &mut host);

        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(host.calls.last(), Some(&HostCall::Busy(false)));
        assert!(host.results().is_empty());
        assert!(host.errors().is_empty());
    }

    #[tokio::test]
    async fn test_factory_receives_credential() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_in = Arc::clone(&seen);
        let analyzer = CountingAnalyzer::replying("ok");
        let mut controller = InteractionController::new(move |cred: Credential| {
            seen_in.lock().unwrap().push(cred.as_str().to_string());
            analyzer.clone()
        });
        let mut host = RecordingHost::default();

        controller.session_mut().set_image(image());
        controller.session_mut().set_credential("sk-abc");
        controller.run_ready(&mut host).await;
        assert_eq!(*seen.lock().unwrap(), vec!["sk-abc".to_string()]);
    }

    #[tokio::test]
    async fn test_stubbed_service_success_end_to_end() {
        let stub = StubServer::start(
            200,
            r#"{"choices":[{"message":{"content":"**[정답]**: 7"}}]}"#,
        )
        .await
        .unwrap();
        let base = stub.base_url();
        let mut controller =
            InteractionController::new(move |cred| InferenceClient::new(cred).with_base_url(base.clone()));
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("sk-test");
        controller.session_mut().set_image(image());
        controller.run_ready(&mut host).await;

        assert_eq!(host.results(), vec!["**[정답]**: 7"]);
        assert_eq!(stub.hits(), 1);
    }

    #[tokio::test]
    async fn test_stubbed_service_401_end_to_end() {
        let stub = StubServer::start(401, r#"{"error":"unauthorized"}"#).await.unwrap();
        let base = stub.base_url();
        let mut controller =
            InteractionController::new(move |cred| InferenceClient::new(cred).with_base_url(base.clone()));
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("sk-wrong");
        controller.session_mut().set_image(image());
        assert_eq!(controller.run_ready(&mut host).await, Some(Phase::ShowError));

        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("401"));
        assert!(host.results().is_empty());
        assert_eq!(stub.hits(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_reply_renders_as_result() {
        let stub = StubServer::answering(UNRECOGNIZED_IMAGE_REPLY).await.unwrap();
        let base = stub.base_url();
        let mut controller =
            InteractionController::new(move |cred| InferenceClient::new(cred).with_base_url(base.clone()));
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("sk-test");
        controller.session_mut().set_image(ImageBlob::new("cat.png", vec![7u8; 16]));
        assert_eq!(controller.run_ready(&mut host).await, Some(Phase::ShowResult));
        assert_eq!(host.results(), vec![UNRECOGNIZED_IMAGE_REPLY]);
        assert!(host.errors().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let mut controller = InteractionController::new(|cred| {
            InferenceClient::new(cred).with_base_url("http://127.0.0.1:1")
        });
        let mut host = RecordingHost::default();

        controller.session_mut().set_credential("k");
        controller.session_mut().set_image(image());
        controller.run_ready(&mut host).await;
        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("API 요청 오류: transport error"));
    }
}
