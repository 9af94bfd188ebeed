//! Predict → retrieve → synthesize orchestration.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::classifier::{classify, CategoryTag};
use super::knowledge::KnowledgeStore;
use super::prompt::PromptBuilder;
use crate::config::Config;
use crate::error::AppResult;
use crate::generator::{GenerationResult, Generator, HttpGenerator};

/// Position in the pipeline's linear state sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has run yet.
    Start,
    /// The incident has a category tag.
    Classified,
    /// Knowledge for the tag was looked up.
    Retrieved,
    /// The generation request is rendered.
    PromptBuilt,
    /// The backend call returned, successfully or not.
    Generated,
    /// Terminal state; the report is final.
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Start => "start",
            PipelineState::Classified => "classified",
            PipelineState::Retrieved => "retrieved",
            PipelineState::PromptBuilt => "prompt_built",
            PipelineState::Generated => "generated",
            PipelineState::Done => "done",
        };
        f.pad(name)
    }
}

/// Whether a stage completed or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage produced its output.
    Completed,
    /// The stage failed; the run short-circuits to `Done`.
    Failed,
}

/// Notification emitted when the pipeline reaches a state
#[derive(Debug, Clone, Serialize)]
pub struct StageEvent {
    /// State reached.
    pub stage: PipelineState,
    /// Outcome of the stage.
    pub status: StageStatus,
    /// When the stage finished.
    pub timestamp: DateTime<Utc>,
    /// Short payload description, e.g. "category: high latency".
    pub summary: String,
}

/// Receives stage events as they happen
pub trait ProgressObserver: Send + Sync {
    /// Called once per reached state, in order.
    fn on_stage(&self, event: &StageEvent);
}

/// Final outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    id: Uuid,
    category: CategoryTag,
    events: Vec<StageEvent>,
    result: GenerationResult,
    elapsed_ms: u64,
}

impl PipelineReport {
    /// Unique id of this run
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Terminal state; a returned report has always finished
    pub fn state(&self) -> PipelineState {
        PipelineState::Done
    }

    /// Category assigned by the classifier
    pub fn category(&self) -> CategoryTag {
        self.category
    }

    /// Stage events in emission order
    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    /// Event recorded for `stage`, if that state was reached
    pub fn event(&self, stage: PipelineState) -> Option<&StageEvent> {
        self.events.iter().find(|e| e.stage == stage)
    }

    /// Outcome of the generation stage
    pub fn result(&self) -> &GenerationResult {
        &self.result
    }

    /// Wall-clock duration of the run
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Text suitable for showing to a user.
    ///
    /// Failures are prefixed so they can never be confused with a report.
    pub fn render(&self) -> String {
        match &self.result {
            GenerationResult::Success { text } => text.clone(),
            GenerationResult::Failure { kind, detail } => {
                format!("Analysis failed [{}]: {}", kind, detail)
            }
        }
    }
}

/// Collects events for one run and forwards them to the observer
struct EventRecorder<'a> {
    events: Vec<StageEvent>,
    observer: Option<&'a dyn ProgressObserver>,
}

impl<'a> EventRecorder<'a> {
    fn new(observer: Option<&'a dyn ProgressObserver>) -> Self {
        Self {
            events: Vec::with_capacity(5),
            observer,
        }
    }

    fn emit(&mut self, stage: PipelineState, status: StageStatus, summary: impl Into<String>) {
        let event = StageEvent {
            stage,
            status,
            timestamp: Utc::now(),
            summary: summary.into(),
        };

        match status {
            StageStatus::Completed => info!(stage = %stage, summary = %event.summary, "Stage completed"),
            StageStatus::Failed => warn!(stage = %stage, summary = %event.summary, "Stage failed"),
        }

        if let Some(observer) = self.observer {
            observer.on_stage(&event);
        }
        self.events.push(event);
    }
}

/// The triage pipeline.
///
/// Holds no per-request state, so one instance can serve concurrent runs.
#[derive(Clone)]
pub struct Pipeline {
    knowledge: KnowledgeStore,
    prompts: PromptBuilder,
    generator: Arc<dyn Generator>,
}

impl Pipeline {
    /// Create a pipeline from its components
    pub fn new(
        knowledge: KnowledgeStore,
        prompts: PromptBuilder,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            knowledge,
            prompts,
            generator,
        }
    }

    /// Create a pipeline with built-in knowledge and an HTTP generator
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let generator = HttpGenerator::new(&config.generator, config.request.clone())?;
        Ok(Self::new(
            KnowledgeStore::builtin(),
            PromptBuilder::new(config.generation.clone()),
            Arc::new(generator),
        ))
    }

    /// Analyze an incident description
    pub async fn analyze_incident(&self, text: &str) -> PipelineReport {
        self.run(text).await
    }

    /// Run every stage without progress notifications
    pub async fn run(&self, incident: &str) -> PipelineReport {
        self.execute(incident, None).await
    }

    /// Run every stage, notifying `observer` as each completes
    pub async fn run_with_observer(
        &self,
        incident: &str,
        observer: &dyn ProgressObserver,
    ) -> PipelineReport {
        self.execute(incident, Some(observer)).await
    }

    async fn execute(
        &self,
        incident: &str,
        observer: Option<&dyn ProgressObserver>,
    ) -> PipelineReport {
        let id = Uuid::new_v4();
        let span = info_span!("triage", run_id = %id);
        self.execute_stages(id, incident, observer)
            .instrument(span)
            .await
    }

    async fn execute_stages(
        &self,
        id: Uuid,
        incident: &str,
        observer: Option<&dyn ProgressObserver>,
    ) -> PipelineReport {
        let start = Instant::now();
        let mut recorder = EventRecorder::new(observer);

        info!(incident_chars = incident.len(), "Triage started");

        let category = classify(incident);
        recorder.emit(
            PipelineState::Classified,
            StageStatus::Completed,
            format!("category: {}", category),
        );

        let record = self.knowledge.lookup(category);
        recorder.emit(
            PipelineState::Retrieved,
            StageStatus::Completed,
            format!("knowledge: {}", record.title),
        );

        let request = self.prompts.build(incident, category, record);
        recorder.emit(
            PipelineState::PromptBuilt,
            StageStatus::Completed,
            format!("prompt: {} chars", request.prompt_text().len()),
        );

        let result = self.generator.generate(&request).await;
        match &result {
            GenerationResult::Success { text } => recorder.emit(
                PipelineState::Generated,
                StageStatus::Completed,
                format!("generated: {} chars", text.len()),
            ),
            GenerationResult::Failure { kind, .. } => recorder.emit(
                PipelineState::Generated,
                StageStatus::Failed,
                format!("generation failed: {}", kind),
            ),
        }

        let (status, summary) = match result.error_kind() {
            None => (StageStatus::Completed, "analysis complete".to_string()),
            Some(kind) => (StageStatus::Failed, format!("analysis failed: {}", kind)),
        };
        recorder.emit(PipelineState::Done, status, summary);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            category = %category,
            success = result.is_success(),
            latency_ms = elapsed_ms,
            "Triage finished"
        );

        PipelineReport {
            id,
            category,
            events: recorder.events,
            result,
            elapsed_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::generator::GenerationRequest;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedGenerator {
        result: GenerationResult,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl FixedGenerator {
        fn new(result: GenerationResult) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Generator for FixedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(request.prompt_text().to_string());
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct CollectingObserver {
        seen: Mutex<Vec<PipelineState>>,
    }

    impl ProgressObserver for CollectingObserver {
        fn on_stage(&self, event: &StageEvent) {
            self.seen.lock().unwrap().push(event.stage);
        }
    }

    fn pipeline(generator: Arc<FixedGenerator>) -> Pipeline {
        Pipeline::new(KnowledgeStore::builtin(), PromptBuilder::default(), generator)
    }

    #[tokio::test]
    async fn test_successful_run() {
        let generator = FixedGenerator::new(GenerationResult::success("Root cause: X"));
        let report = pipeline(generator.clone())
            .run("users report slow page loads")
            .await;

        assert_eq!(report.state(), PipelineState::Done);
        assert_eq!(report.category(), CategoryTag::HighLatency);
        assert_eq!(report.result(), &GenerationResult::success("Root cause: X"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.render(), "Root cause: X");
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let observer = CollectingObserver::default();
        let report = pipeline(FixedGenerator::new(GenerationResult::success("ok")))
            .run_with_observer("packet drops", &observer)
            .await;

        let expected = vec![
            PipelineState::Classified,
            PipelineState::Retrieved,
            PipelineState::PromptBuilt,
            PipelineState::Generated,
            PipelineState::Done,
        ];
        assert_eq!(*observer.seen.lock().unwrap(), expected);
        let recorded: Vec<_> = report.events().iter().map(|e| e.stage).collect();
        assert_eq!(recorded, expected);
        assert!(report
            .events()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(
            report.event(PipelineState::Classified).unwrap().summary,
            "category: packet loss"
        );
    }

    #[tokio::test]
    async fn test_failure_short_circuits_to_done() {
        let generator = FixedGenerator::new(GenerationResult::failure(
            ErrorKind::MalformedResponse,
            "Invalid response: response contains no candidates",
        ));
        let report = pipeline(generator).run("service is down").await;

        assert_eq!(report.state(), PipelineState::Done);
        assert_eq!(report.result().error_kind(), Some(ErrorKind::MalformedResponse));
        assert_eq!(
            report.event(PipelineState::Generated).unwrap().status,
            StageStatus::Failed
        );
        assert_eq!(
            report.event(PipelineState::Done).unwrap().status,
            StageStatus::Failed
        );
        assert!(report.render().starts_with("Analysis failed [MalformedResponse]"));
    }

    #[tokio::test]
    async fn test_prompt_carries_incident() {
        let generator = FixedGenerator::new(GenerationResult::success("ok"));
        let incident = "Core switch unreachable since 09:14 UTC";
        pipeline(generator.clone()).analyze_incident(incident).await;

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(incident));
        assert!(prompt.contains("Service Unreachable Troubleshooting"));
    }

    #[tokio::test]
    async fn test_concurrent_runs_share_pipeline() {
        let generator = FixedGenerator::new(GenerationResult::success("ok"));
        let pipeline = Arc::new(pipeline(generator.clone()));

        let a = pipeline.clone();
        let b = pipeline.clone();
        let (ra, rb) = tokio::join!(a.run("slow"), b.run("printer jammed"));

        assert_eq!(ra.category(), CategoryTag::HighLatency);
        assert_eq!(rb.category(), CategoryTag::Unknown);
        assert_ne!(ra.id(), rb.id());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }
}
