//! WebSocket push server for integration tests.
//!
//! Each accepted connection plays the next scripted session: send its text
//! frames, then either close or stay open until the client goes away.
//! Connections past the end of the script are held open silently.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub enum Session {
    SendAndClose(Vec<String>),
    SendAndHold(Vec<String>),
}

pub struct PushServer {
    /// e.g. "ws://127.0.0.1:12345/ws".
    pub url: String,
    /// Same host as `url`, http scheme, for building `Endpoints`.
    pub base: String,
    accepted: Arc<AtomicUsize>,
}

impl PushServer {
    pub async fn start(script: Vec<Session>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().unwrap().port();
        let script = Arc::new(Mutex::new(VecDeque::from(script)));
        let accepted = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&accepted);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let session = script
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or(Session::SendAndHold(Vec::new()));
                tokio::spawn(async move {
                    let Ok(mut ws) = accept_async(stream).await else {
                        return;
                    };
                    let (frames, close) = match session {
                        Session::SendAndClose(f) => (f, true),
                        Session::SendAndHold(f) => (f, false),
                    };
                    for text in frames {
                        if ws.send(Message::Text(text.into())).await.is_err() {
                            return;
                        }
                    }
                    if close {
                        let _ = ws.close(None).await;
                    }
                    while let Some(Ok(_)) = ws.next().await {}
                });
            }
        });

        Self {
            url: format!("ws://127.0.0.1:{port}/ws"),
            base: format!("http://127.0.0.1:{port}"),
            accepted,
        }
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}
