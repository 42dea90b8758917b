//! Folder monitor integration tests.
//!
//! Drive the monitor through poll cycles against a temp directory with
//! mock collaborators, and assert on outcome folders and dispatch calls.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use bumblebee::adapters::{Dispatcher, TranscriptFetcher, Transcriber};
use bumblebee::config::{EmailConfig, Settings};
use bumblebee::monitor::NoopNudge;
use bumblebee::FolderMonitor;

struct MockTranscriber {
    reply: Result<String, String>,
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(anyhow::anyhow!("{msg}")),
        }
    }
}

struct MockFetcher {
    reply: Result<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TranscriptFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(anyhow::anyhow!("{msg}")),
        }
    }
}

struct MockDispatcher {
    fail: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn dispatch(
        &self,
        query: &str,
        _api_key: &str,
        _sender_email: &str,
        _sender_password: &str,
        _recipient_email: &str,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.fail {
            anyhow::bail!("dispatch refused");
        }
        Ok(())
    }
}

/// Temp-dir harness with recording mocks.
struct Harness {
    _temp: TempDir,
    inbox: PathBuf,
    processed: PathBuf,
    monitor: FolderMonitor,
    dispatch_calls: Arc<Mutex<Vec<String>>>,
    fetch_calls: Arc<Mutex<Vec<String>>>,
}

struct HarnessConfig {
    transcriber_reply: Result<String, String>,
    fetcher_reply: Result<String, String>,
    dispatcher_fails: bool,
    email: EmailConfig,
    ai_key: Option<String>,
    /// Files to place in the inbox before the monitor's baseline scan.
    preexisting: Vec<(&'static str, &'static [u8])>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            transcriber_reply: Ok("spoken words".to_string()),
            fetcher_reply: Ok("video transcript".to_string()),
            dispatcher_fails: false,
            email: full_email(),
            ai_key: Some("xai-test-key".to_string()),
            preexisting: Vec::new(),
        }
    }
}

fn full_email() -> EmailConfig {
    EmailConfig {
        sender_email: Some("me@gmail.com".to_string()),
        sender_password: Some("app-password".to_string()),
        recipient_email: Some("you@example.com".to_string()),
    }
}

async fn harness(config: HarnessConfig) -> Harness {
    let temp = TempDir::new().unwrap();
    let inbox = temp.path().join("inbox");
    let processed = temp.path().join("processed");
    tokio::fs::create_dir_all(&inbox).await.unwrap();

    for (name, content) in &config.preexisting {
        tokio::fs::write(inbox.join(name), content).await.unwrap();
    }

    let settings = Settings {
        monitor_path: inbox.clone(),
        processed_path: processed.clone(),
        check_interval_secs: 1,
        email: config.email,
        ai_key: config.ai_key,
        whisper_model: "small".to_string(),
    };

    let dispatch_calls = Arc::new(Mutex::new(Vec::new()));
    let fetch_calls = Arc::new(Mutex::new(Vec::new()));

    let monitor = FolderMonitor::with_collaborators(
        &settings,
        Box::new(MockTranscriber {
            reply: config.transcriber_reply,
        }),
        Box::new(MockFetcher {
            reply: config.fetcher_reply,
            calls: fetch_calls.clone(),
        }),
        Box::new(MockDispatcher {
            fail: config.dispatcher_fails,
            calls: dispatch_calls.clone(),
        }),
        Box::new(NoopNudge),
    )
    .await
    .unwrap();

    Harness {
        _temp: temp,
        inbox,
        processed,
        monitor,
        dispatch_calls,
        fetch_calls,
    }
}

impl Harness {
    async fn drop_file(&self, name: &str, content: &[u8]) {
        tokio::fs::write(self.inbox.join(name), content)
            .await
            .unwrap();
    }

    fn outcome_path(&self, tag: &str, name: &str) -> PathBuf {
        self.processed.join(tag).join(name)
    }

    fn dispatch_count(&self) -> usize {
        self.dispatch_calls.lock().unwrap().len()
    }
}

#[tokio::test]
async fn baseline_files_are_never_processed() {
    let mut h = harness(HarnessConfig {
        preexisting: vec![("old_note.txt", b"already here")],
        ..Default::default()
    })
    .await;

    let processed = h.monitor.poll_once().await.unwrap();

    assert!(processed.is_empty());
    assert!(h.inbox.join("old_note.txt").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn new_txt_file_is_processed_exactly_once() {
    let mut h = harness(HarnessConfig::default()).await;

    h.drop_file("note.txt", b"plain prose about nothing").await;

    let first = h.monitor.poll_once().await.unwrap();
    assert_eq!(first, vec![h.inbox.join("note.txt")]);

    // Relocated with the success tag, gone from the inbox.
    assert!(h.outcome_path("processed", "note.txt").exists());
    assert!(!h.inbox.join("note.txt").exists());

    // Exactly one dispatch, carrying the original text as the query.
    let calls = h.dispatch_calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["plain prose about nothing".to_string()]);

    // Further cycles see nothing new.
    for _ in 0..3 {
        assert!(h.monitor.poll_once().await.unwrap().is_empty());
    }
    assert_eq!(h.dispatch_count(), 1);
}

#[tokio::test]
async fn whitespace_only_content_files_as_empty() {
    let mut h = harness(HarnessConfig::default()).await;

    h.drop_file("blank.txt", b"   \n\t  \n").await;
    let processed = h.monitor.poll_once().await.unwrap();

    assert!(processed.is_empty());
    assert!(h.outcome_path("empty_content", "blank.txt").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn legacy_doc_is_rejected_as_unsupported() {
    let mut h = harness(HarnessConfig::default()).await;

    h.drop_file("ancient.doc", b"binary word soup").await;
    h.monitor.poll_once().await.unwrap();

    assert!(h.outcome_path("unsupported", "ancient.doc").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn unknown_extensions_are_left_in_place() {
    let mut h = harness(HarnessConfig::default()).await;

    h.drop_file("photo.png", b"not text").await;
    let processed = h.monitor.poll_once().await.unwrap();

    assert!(processed.is_empty());
    assert!(h.inbox.join("photo.png").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn audio_transcription_is_wrapped_in_summary_prompt() {
    let mut h = harness(HarnessConfig {
        transcriber_reply: Ok("meeting notes spoken aloud".to_string()),
        ..Default::default()
    })
    .await;

    h.drop_file("memo.mp3", b"fake mp3 bytes").await;
    let processed = h.monitor.poll_once().await.unwrap();

    assert_eq!(processed.len(), 1);
    assert!(h.outcome_path("processed", "memo.mp3").exists());

    let calls = h.dispatch_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("Summarize the following audio transcription:"));
    assert!(calls[0].contains("meeting notes spoken aloud"));
}

#[tokio::test]
async fn failed_transcription_files_as_transcription_error() {
    let mut h = harness(HarnessConfig {
        transcriber_reply: Err("model exploded".to_string()),
        ..Default::default()
    })
    .await;

    h.drop_file("memo.mp3", b"fake mp3 bytes").await;
    h.monitor.poll_once().await.unwrap();

    assert!(h.outcome_path("error_transcription", "memo.mp3").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn empty_transcription_files_as_empty_content() {
    let mut h = harness(HarnessConfig {
        transcriber_reply: Ok("  ".to_string()),
        ..Default::default()
    })
    .await;

    h.drop_file("memo.mp3", b"fake mp3 bytes").await;
    h.monitor.poll_once().await.unwrap();

    assert!(h.outcome_path("empty_content", "memo.mp3").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn youtube_link_triggers_transcript_augmentation() {
    let mut h = harness(HarnessConfig {
        fetcher_reply: Ok("people talking about rust".to_string()),
        ..Default::default()
    })
    .await;

    h.drop_file(
        "video.txt",
        b"worth a watch: https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
    )
    .await;
    let processed = h.monitor.poll_once().await.unwrap();

    assert_eq!(processed.len(), 1);

    // The fetcher saw the full URL, trailing parameters included.
    let fetched = h.fetch_calls.lock().unwrap().clone();
    assert_eq!(
        fetched,
        vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s".to_string()]
    );

    // The dispatched query is the augmentation prompt, not the raw file.
    let calls = h.dispatch_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("youtube video location: https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"));
    assert!(calls[0].contains("The transcript: people talking about rust"));
    assert!(!calls[0].contains("worth a watch"));
}

#[tokio::test]
async fn transcript_fetch_failure_files_as_youtube_error() {
    let mut h = harness(HarnessConfig {
        fetcher_reply: Err("Transcripts are disabled for video abc".to_string()),
        ..Default::default()
    })
    .await;

    h.drop_file("video.txt", b"see https://youtu.be/abc123").await;
    h.monitor.poll_once().await.unwrap();

    assert!(h
        .outcome_path("error_youtube_transcript", "video.txt")
        .exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn youtube_link_without_ai_key_files_as_config_error() {
    let mut h = harness(HarnessConfig {
        ai_key: None,
        ..Default::default()
    })
    .await;

    h.drop_file("video.txt", b"see https://youtu.be/abc123").await;
    h.monitor.poll_once().await.unwrap();

    assert!(h.outcome_path("error_config", "video.txt").exists());
    // The fetcher is never consulted without a key.
    assert!(h.fetch_calls.lock().unwrap().is_empty());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn missing_email_credentials_file_as_config_error() {
    let mut h = harness(HarnessConfig {
        email: EmailConfig {
            sender_email: Some("me@gmail.com".to_string()),
            sender_password: None,
            recipient_email: Some("you@example.com".to_string()),
        },
        ..Default::default()
    })
    .await;

    h.drop_file("note.txt", b"some prose").await;
    h.monitor.poll_once().await.unwrap();

    assert!(h.outcome_path("error_config", "note.txt").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn dispatch_failure_files_as_ai_email_error() {
    let mut h = harness(HarnessConfig {
        dispatcher_fails: true,
        ..Default::default()
    })
    .await;

    h.drop_file("note.txt", b"some prose").await;
    let processed = h.monitor.poll_once().await.unwrap();

    assert!(processed.is_empty());
    assert!(h.outcome_path("error_ai_email", "note.txt").exists());
    assert_eq!(h.dispatch_count(), 1);
}

#[tokio::test]
async fn corrupt_docx_files_as_critical_error() {
    let mut h = harness(HarnessConfig::default()).await;

    h.drop_file("report.docx", b"definitely not a zip archive")
        .await;
    h.monitor.poll_once().await.unwrap();

    assert!(h.outcome_path("critical_error", "report.docx").exists());
    assert_eq!(h.dispatch_count(), 0);
}

#[tokio::test]
async fn name_collisions_get_numeric_suffixes() {
    let mut h = harness(HarnessConfig {
        dispatcher_fails: true,
        ..Default::default()
    })
    .await;

    // Three cycles, each dropping a file with the same name that fails
    // with the same outcome.
    h.drop_file("dup.txt", b"first").await;
    h.monitor.poll_once().await.unwrap();

    h.drop_file("dup.txt", b"second").await;
    h.monitor.poll_once().await.unwrap();

    h.drop_file("dup.txt", b"third").await;
    h.monitor.poll_once().await.unwrap();

    let dir = h.processed.join("error_ai_email");
    assert!(dir.join("dup.txt").exists());
    assert!(dir.join("dup_1.txt").exists());
    assert!(dir.join("dup_2.txt").exists());
}

#[tokio::test]
async fn multiple_new_files_are_all_processed_in_one_cycle() {
    let mut h = harness(HarnessConfig::default()).await;

    h.drop_file("a.txt", b"alpha").await;
    h.drop_file("b.txt", b"bravo").await;

    let processed = h.monitor.poll_once().await.unwrap();

    assert_eq!(processed.len(), 2);
    assert!(h.outcome_path("processed", "a.txt").exists());
    assert!(h.outcome_path("processed", "b.txt").exists());
    assert_eq!(h.dispatch_count(), 2);
}

#[tokio::test]
async fn missing_monitor_directory_is_created_at_startup() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.path().join("does_not_exist_yet");

    let settings = Settings {
        monitor_path: inbox.clone(),
        processed_path: temp.path().join("processed"),
        check_interval_secs: 1,
        email: full_email(),
        ai_key: Some("key".to_string()),
        whisper_model: "small".to_string(),
    };

    let mut monitor = FolderMonitor::with_collaborators(
        &settings,
        Box::new(MockTranscriber {
            reply: Ok(String::new()),
        }),
        Box::new(MockFetcher {
            reply: Ok(String::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }),
        Box::new(MockDispatcher {
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }),
        Box::new(NoopNudge),
    )
    .await
    .unwrap();

    assert!(inbox.exists());
    assert!(monitor.poll_once().await.unwrap().is_empty());
}
