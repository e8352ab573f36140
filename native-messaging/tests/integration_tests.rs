//! End-to-end session tests: a full host (codec, router, routes) over
//! in-memory pipes, with `sh`-scripted fake pickers and temp-file
//! backed utilities standing in for rofi, xclip, and xdg-open.

use rofi_native_messaging::{
    HostConfig, MemorySink, NativeMessagingHost, NativeMessagingProtocol, Request, Response,
    RouteContext, MessageRouter, WindowActivator,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{duplex, split, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;

const CAP: usize = 1_048_576;

struct CountingActivator {
    calls: AtomicUsize,
}

impl CountingActivator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WindowActivator for CountingActivator {
    async fn activate(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Config whose picker is `sh -c <script>`; scripts read the option
/// list from stdin and print the "selection".
fn scripted_config(picker_script: &str) -> HostConfig {
    let mut config = HostConfig::default();
    config.picker.program = "sh".to_string();
    config.picker.base_args = vec!["-c".to_string(), picker_script.to_string()];
    config
}

struct Session {
    client: NativeMessagingProtocol<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>,
    host: JoinHandle<rofi_native_messaging::HostResult<()>>,
    sink: Arc<MemorySink>,
    activator: Arc<CountingActivator>,
}

/// Spawn a host session over a duplex pair and hand back the client
/// side plus the fakes for assertions.
fn start_session(config: HostConfig) -> Session {
    let (client_end, host_end) = duplex(CAP + 16);
    let (cr, cw) = split(client_end);
    let (hr, hw) = split(host_end);

    let sink = Arc::new(MemorySink::new());
    let activator = Arc::new(CountingActivator::new());

    let max = config.max_message_size;
    let ctx = RouteContext::new(Arc::new(config), activator.clone(), sink.clone());
    let mut router = MessageRouter::new(ctx);
    router.register_all_routes();

    let protocol = NativeMessagingProtocol::new(hr, hw, max);
    let mut host = NativeMessagingHost::new(protocol, router);
    let handle = tokio::spawn(async move { host.run().await });

    Session {
        client: NativeMessagingProtocol::new(cr, cw, max),
        host: handle,
        sink,
        activator,
    }
}

impl Session {
    async fn send(&mut self, body: Value) {
        let request: Request = serde_json::from_value(body).unwrap();
        let payload = serde_json::to_vec(&request).unwrap();
        self.client.write_frame(&payload).await.unwrap();
    }

    async fn receive(&mut self) -> Response {
        let payload = self.client.read_frame().await.unwrap().unwrap();
        serde_json::from_slice(&payload).unwrap()
    }

    /// Close the client's write side and wait for the host loop.
    async fn finish(self) -> rofi_native_messaging::HostResult<()> {
        drop(self.client);
        self.host.await.unwrap()
    }
}

#[tokio::test]
async fn dmenu_request_answers_matched_tab_id() {
    let mut session = start_session(scripted_config("cat > /dev/null; printf 'Tab B'"));

    session
        .send(json!({
            "cmd": "dmenu",
            "param": {"opts": ["Tab A", "Tab B"], "tabIds": ["1", "2"]},
            "info": {"seq": 4}
        }))
        .await;

    let response = session.receive().await;
    assert_eq!(response.result, "2");
    assert_eq!(response.cmd.as_deref(), Some("dmenu"));
    assert_eq!(response.info, Some(json!({"seq": 4})));
    assert_eq!(session.activator.calls(), 1);

    assert!(session.finish().await.is_ok());
}

#[tokio::test]
async fn switch_tab_typed_text_comes_back_with_search_prefix() {
    let mut session = start_session(scripted_config("cat > /dev/null; printf 'weather tomorrow'"));

    session
        .send(json!({
            "info": "switchTab",
            "param": {"opts": ["Inbox"], "tabIds": [7]}
        }))
        .await;

    let response = session.receive().await;
    assert_eq!(response.result, "g weather tomorrow");
    assert_eq!(response.cmd, None);
    assert_eq!(response.info, Some(json!("switchTab")));
}

#[tokio::test]
async fn cancellation_answers_empty_without_activation() {
    let mut session = start_session(scripted_config("cat > /dev/null"));

    session
        .send(json!({
            "info": "switchTab",
            "param": {"opts": ["Inbox"], "tabIds": [7]}
        }))
        .await;

    let response = session.receive().await;
    assert_eq!(response.result, "");
    assert_eq!(session.activator.calls(), 0);
}

#[tokio::test]
async fn unknown_command_answers_bare_literal() {
    let mut session = start_session(scripted_config("true"));

    session
        .send(json!({"cmd": "mystery", "param": {}, "info": 3}))
        .await;

    let response = session.receive().await;
    assert_eq!(response.result, "unknown command: mystery");
    assert_eq!(response.cmd, None);
    assert_eq!(response.info, None);
}

#[tokio::test]
async fn list_downloads_custom_key_opens_selection() {
    let dir = tempfile::tempdir().unwrap();
    let opened = dir.path().join("opened");
    let mut config = scripted_config("cat > /dev/null; printf 'https://example.net/a.iso\\n'; exit 10");
    config.utilities.open = vec![
        "sh".to_string(),
        "-c".to_string(),
        format!(r#"printf '%s' "$1" > {}"#, opened.display()),
        "open".to_string(),
    ];

    let mut session = start_session(config);
    session
        .send(json!({"info": "listDownloads", "param": {"opts": ["https://example.net/a.iso"]}}))
        .await;

    let response = session.receive().await;
    assert_eq!(response.result, "");

    // The opener runs fire-and-forget but is reaped before the
    // handler answers.
    assert_eq!(
        std::fs::read_to_string(&opened).unwrap(),
        "https://example.net/a.iso"
    );
}

#[tokio::test]
async fn copy_download_feeds_clipboard_utility() {
    let dir = tempfile::tempdir().unwrap();
    let copied = dir.path().join("copied");
    let mut config = scripted_config("true");
    config.utilities.copy = vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("cat > {}", copied.display()),
    ];

    let mut session = start_session(config);
    session
        .send(json!({"info": "copyDownload", "param": "/home/u/dl/report.pdf"}))
        .await;

    let response = session.receive().await;
    assert_eq!(response.result, "");
    assert_eq!(
        std::fs::read_to_string(&copied).unwrap(),
        "/home/u/dl/report.pdf"
    );
}

#[tokio::test]
async fn handler_failure_is_contained_and_session_continues() {
    let mut session = start_session(scripted_config("cat > /dev/null; printf 'Tab A'"));

    // Malformed param: dmenu expects an object.
    session
        .send(json!({"cmd": "dmenu", "param": 12, "info": 1}))
        .await;
    let response = session.receive().await;
    assert_eq!(response.result, "");
    assert_eq!(response.cmd.as_deref(), Some("dmenu"));
    assert_eq!(session.sink.entries().len(), 1);

    // The session still serves the next request.
    session
        .send(json!({
            "cmd": "dmenu",
            "param": {"opts": ["Tab A"], "tabIds": ["9"]},
            "info": 2
        }))
        .await;
    let response = session.receive().await;
    assert_eq!(response.result, "9");

    assert!(session.finish().await.is_ok());
}

#[tokio::test]
async fn clean_eof_ends_session_without_error() {
    let session = start_session(scripted_config("true"));
    assert!(session.finish().await.is_ok());
}

#[tokio::test]
async fn truncated_frame_is_fatal_and_unanswered() {
    let (client_end, host_end) = duplex(256);
    let (_cr, mut cw) = split(client_end);
    let (hr, hw) = split(host_end);

    let config = scripted_config("true");
    let sink = Arc::new(MemorySink::new());
    let activator = Arc::new(CountingActivator::new());
    let max = config.max_message_size;
    let ctx = RouteContext::new(Arc::new(config), activator, sink.clone());
    let mut router = MessageRouter::new(ctx);
    router.register_all_routes();

    let protocol = NativeMessagingProtocol::new(hr, hw, max);
    let mut host = NativeMessagingHost::new(protocol, router);
    let handle = tokio::spawn(async move { host.run().await });

    // Prefix promises 5 bytes; only 2 arrive before the close.
    cw.write_all(&5u32.to_le_bytes()).await.unwrap();
    cw.write_all(b"ab").await.unwrap();
    cw.shutdown().await.unwrap();
    drop(cw);

    let outcome = handle.await.unwrap();
    assert!(outcome.is_err());
}

#[tokio::test]
async fn requests_are_answered_in_order() {
    let mut session = start_session(scripted_config("cat > /dev/null; printf 'only'"));

    for seq in 0..3 {
        session
            .send(json!({
                "cmd": "dmenu",
                "param": {"opts": ["only"], "tabIds": [seq.to_string()]},
                "info": seq
            }))
            .await;
    }

    for seq in 0..3 {
        let response = session.receive().await;
        assert_eq!(response.result, seq.to_string());
        assert_eq!(response.info, Some(json!(seq)));
    }
}
