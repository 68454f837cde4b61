// End-to-end tests for the per-session pipeline: ordering, failure
// isolation, history clearing, backlog overflow, and teardown — all with
// in-process collaborator mocks behind the two trait seams.

use async_trait::async_trait;
use interview_coach::audio::AudioChunk;
use interview_coach::coach::{fallback_result, QuestionLabel};
use interview_coach::error::{GenerationError, TranscriptionError, ValidationError};
use interview_coach::llm::SuggestionBackend;
use interview_coach::protocol::{ClientMessage, ServerEvent};
use interview_coach::session::{SessionConfig, SessionManager, SessionContext, SessionState};
use interview_coach::stt::SpeechToText;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

// 1 second of 16kHz mono 16-bit PCM; test sessions use a 1-second threshold
const CHUNK_BYTES: usize = 16000 * 2;

/// Scripted speech-to-text mock. Transcribes chunk N as "Question number N";
/// sequences can be scripted to fail or come back empty, and an optional
/// gate holds every call until the test releases it.
struct MockStt {
    started: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    fail_sequences: HashSet<u64>,
    empty_sequences: HashSet<u64>,
}

impl MockStt {
    fn plain() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            gate: None,
            fail_sequences: HashSet::new(),
            empty_sequences: HashSet::new(),
        })
    }

    fn failing_on(sequences: &[u64]) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            gate: None,
            fail_sequences: sequences.iter().copied().collect(),
            empty_sequences: HashSet::new(),
        })
    }

    fn empty_on(sequences: &[u64]) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            gate: None,
            fail_sequences: HashSet::new(),
            empty_sequences: sequences.iter().copied().collect(),
        })
    }

    fn gated(gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            gate: Some(gate),
            fail_sequences: HashSet::new(),
            empty_sequences: HashSet::new(),
        })
    }

    async fn wait_for_started(&self, target: usize) {
        for _ in 0..500 {
            if self.started.load(Ordering::SeqCst) >= target {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {} transcription call(s)", target);
    }
}

#[async_trait]
impl SpeechToText for MockStt {
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        self.started.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self.fail_sequences.contains(&chunk.sequence) {
            return Err(TranscriptionError::Backend {
                status: 500,
                body: "decoder exploded".to_string(),
            });
        }
        if self.empty_sequences.contains(&chunk.sequence) {
            return Ok(String::new());
        }

        Ok(format!("Question number {}", chunk.sequence))
    }

    fn name(&self) -> &str {
        "mock-stt"
    }
}

/// Suggestion mock: fixed valid completion (or scripted failure), recording
/// every prompt for window assertions.
struct MockLlm {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl MockLlm {
    fn replying() -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl SuggestionBackend for MockLlm {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.fail {
            return Err(GenerationError::Request {
                message: "connection refused".to_string(),
            });
        }

        Ok(r#"{"bullets": ["mock tip one", "mock tip two"], "follow_up": "mock follow-up"}"#
            .to_string())
    }

    fn name(&self) -> &str {
        "mock-llm"
    }
}

fn test_session_config(queue_depth: usize) -> SessionConfig {
    SessionConfig {
        chunk_duration: Duration::from_secs(1),
        queue_depth,
        ..SessionConfig::default()
    }
}

fn manager_with(
    stt: Arc<MockStt>,
    llm: Arc<MockLlm>,
    queue_depth: usize,
) -> SessionManager {
    SessionManager::new(stt, llm, test_session_config(queue_depth))
}

async fn recv_event(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Skip forward to the next transcription event, returning its text.
async fn next_transcription(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> String {
    loop {
        if let ServerEvent::Transcription { text, .. } = recv_event(rx).await {
            return text;
        }
    }
}

/// Skip forward to the next ai_response event.
async fn next_ai_response(
    rx: &mut mpsc::UnboundedReceiver<ServerEvent>,
) -> (Vec<String>, String, String) {
    loop {
        if let ServerEvent::AiResponse {
            bullets,
            follow_up,
            original_text,
            ..
        } = recv_event(rx).await
        {
            return (bullets, follow_up, original_text);
        }
    }
}

/// Skip forward to the next status event with the given status tag.
async fn next_status(rx: &mut mpsc::UnboundedReceiver<ServerEvent>, wanted: &str) -> String {
    loop {
        if let ServerEvent::Status { status, message } = recv_event(rx).await {
            if status == wanted {
                return message;
            }
        }
    }
}

#[tokio::test]
async fn single_chunk_emits_transcription_then_ai_response() {
    let manager = manager_with(MockStt::plain(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    assert_eq!(session.state(), SessionState::Idle);
    next_status(&mut rx, "connected").await;

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    assert_eq!(session.state(), SessionState::Listening);

    let text = next_transcription(&mut rx).await;
    assert_eq!(text, "Question number 0");

    let (bullets, follow_up, original) = next_ai_response(&mut rx).await;
    assert_eq!(bullets, vec!["mock tip one", "mock tip two"]);
    assert_eq!(follow_up, "mock follow-up");
    assert_eq!(original, "Question number 0");
}

#[tokio::test]
async fn fragments_totaling_threshold_produce_exactly_one_run() {
    let manager = manager_with(MockStt::plain(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    // Three fragments crossing the 1-second threshold on the third push
    for _ in 0..3 {
        manager
            .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES * 3 / 8])
            .await;
    }

    let text = next_transcription(&mut rx).await;
    assert_eq!(text, "Question number 0");
    next_ai_response(&mut rx).await;

    // Exactly one run: the chunk carried all three fragments
    tokio::time::sleep(Duration::from_millis(200)).await;
    while let Ok(event) = rx.try_recv() {
        assert!(
            !matches!(
                event,
                ServerEvent::Transcription { .. } | ServerEvent::AiResponse { .. }
            ),
            "unexpected extra pipeline event: {:?}",
            event
        );
    }
}

#[tokio::test]
async fn events_keep_chunk_completion_order() {
    let manager = manager_with(MockStt::plain(), MockLlm::replying(), 4);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;

    // Pairs arrive strictly in chunk order: both events for chunk 0 before
    // either event for chunk 1.
    assert_eq!(next_transcription(&mut rx).await, "Question number 0");
    let (_, _, original) = next_ai_response(&mut rx).await;
    assert_eq!(original, "Question number 0");

    assert_eq!(next_transcription(&mut rx).await, "Question number 1");
    let (_, _, original) = next_ai_response(&mut rx).await;
    assert_eq!(original, "Question number 1");
}

#[tokio::test]
async fn transcription_failure_abandons_only_that_chunk() {
    let manager = manager_with(MockStt::failing_on(&[0]), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;

    let message = next_status(&mut rx, "transcription_failed").await;
    assert!(message.contains("Transcription failed"));

    // The next chunk is unaffected
    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;

    let text = next_transcription(&mut rx).await;
    assert_eq!(text, "Question number 1", "no transcription for the failed chunk");
    let (_, _, original) = next_ai_response(&mut rx).await;
    assert_eq!(original, "Question number 1");
}

#[tokio::test]
async fn empty_transcript_reports_no_speech() {
    let manager = manager_with(MockStt::empty_on(&[0]), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;

    next_status(&mut rx, "no_speech").await;

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    assert_eq!(next_transcription(&mut rx).await, "Question number 1");
}

#[tokio::test]
async fn clear_history_resets_the_prompt_window() {
    let llm = MockLlm::replying();
    let manager = manager_with(MockStt::plain(), llm.clone(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    next_ai_response(&mut rx).await;

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    next_ai_response(&mut rx).await;

    manager.on_control(&mut session, ClientMessage::ClearHistory).await;
    next_status(&mut rx, "history_cleared").await;

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    next_ai_response(&mut rx).await;

    assert!(
        !llm.prompt(0).contains("Earlier in this interview"),
        "first prompt has no history"
    );
    assert!(
        llm.prompt(1).contains("Earlier in this interview"),
        "second prompt sees the first exchange"
    );
    assert!(
        !llm.prompt(2).contains("Earlier in this interview"),
        "prompt after clear_history is computed with an empty window"
    );
}

#[tokio::test]
async fn clear_history_is_idempotent() {
    let llm = MockLlm::replying();
    let manager = manager_with(MockStt::plain(), llm.clone(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    next_ai_response(&mut rx).await;

    manager.on_control(&mut session, ClientMessage::ClearHistory).await;
    next_status(&mut rx, "history_cleared").await;
    manager.on_control(&mut session, ClientMessage::ClearHistory).await;
    next_status(&mut rx, "history_cleared").await;

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    next_ai_response(&mut rx).await;

    assert!(!llm.prompt(1).contains("Earlier in this interview"));
}

#[tokio::test]
async fn backlog_overflow_drops_oldest_waiting_chunk() {
    let gate = Arc::new(Semaphore::new(0));
    let stt = MockStt::gated(gate.clone());
    let manager = manager_with(stt.clone(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    // Chunk 0 goes in flight and blocks on the gate
    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    stt.wait_for_started(1).await;

    // Chunks 1 and 2 fill the waiting queue; chunk 3 overflows it
    for _ in 0..3 {
        manager
            .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
            .await;
    }

    let message = next_status(&mut rx, "queue_overflow").await;
    assert!(message.contains("chunk 1"), "oldest waiting chunk is the one dropped");

    // Release everything and watch what survives
    gate.add_permits(10);

    assert_eq!(next_transcription(&mut rx).await, "Question number 0");
    assert_eq!(
        next_transcription(&mut rx).await,
        "Question number 2",
        "chunk 1 was dropped before it ever started"
    );
    assert_eq!(next_transcription(&mut rx).await, "Question number 3");
}

#[tokio::test]
async fn stop_flushes_a_partial_chunk() {
    let manager = manager_with(MockStt::plain(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    // Half a second: below the threshold, so nothing runs yet
    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES / 2])
        .await;

    manager.on_control(&mut session, ClientMessage::Stop).await;

    assert_eq!(next_transcription(&mut rx).await, "Question number 0");
    next_ai_response(&mut rx).await;
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let manager = manager_with(MockStt::plain(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    next_status(&mut rx, "connected").await;
    manager.on_control(&mut session, ClientMessage::Ping).await;

    assert!(matches!(recv_event(&mut rx).await, ServerEvent::Pong { .. }));
}

#[tokio::test]
async fn invalid_message_reports_error_and_session_keeps_working() {
    let manager = manager_with(MockStt::plain(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    next_status(&mut rx, "connected").await;
    manager.on_invalid_message(&session, ValidationError::UnknownType("bogus".to_string()));

    match recv_event(&mut rx).await {
        ServerEvent::Error { message } => assert_eq!(message, "unknown type: bogus"),
        other => panic!("expected error event, got {:?}", other),
    }

    // The channel stays usable
    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    assert_eq!(next_transcription(&mut rx).await, "Question number 0");
}

#[tokio::test]
async fn generation_failure_still_yields_a_suggestion() {
    let manager = manager_with(MockStt::plain(), MockLlm::failing(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;

    let (bullets, follow_up, original) = next_ai_response(&mut rx).await;
    let expected = fallback_result(QuestionLabel::General, "Question number 0");
    assert_eq!(bullets, expected.bullets);
    assert_eq!(follow_up, "", "fallback has an empty follow-up");
    assert_eq!(original, "Question number 0");
}

#[tokio::test]
async fn close_is_terminal() {
    let manager = manager_with(MockStt::plain(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    next_status(&mut rx, "connected").await;

    manager.close(&mut session).await;
    assert_eq!(session.state(), SessionState::Closed);

    // Closing again is a no-op
    manager.close(&mut session).await;
    assert_eq!(session.state(), SessionState::Closed);

    // Audio and controls after close produce nothing
    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    manager.on_control(&mut session, ClientMessage::Ping).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rx.try_recv().is_err(), "no events after close");
}

#[tokio::test]
async fn close_discards_queued_chunks() {
    let gate = Arc::new(Semaphore::new(0));
    let stt = MockStt::gated(gate.clone());
    let manager = manager_with(stt.clone(), MockLlm::replying(), 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = manager.open(SessionContext::default(), tx);

    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;
    stt.wait_for_started(1).await;
    manager
        .on_audio_fragment(&mut session, &vec![0u8; CHUNK_BYTES])
        .await;

    manager.close(&mut session).await;
    gate.add_permits(10);

    tokio::time::sleep(Duration::from_millis(200)).await;
    while let Ok(event) = rx.try_recv() {
        assert!(
            !matches!(
                event,
                ServerEvent::Transcription { .. } | ServerEvent::AiResponse { .. }
            ),
            "no pipeline events may surface after close, got {:?}",
            event
        );
    }
}
