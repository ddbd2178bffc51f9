#![allow(dead_code)]

use std::{
    net::SocketAddr,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::Router;
use cloudcast::{
    mixcloud::auth::{OAuthError, TokenSource},
    reporter::{Level, Reporter},
};
use tokio::net::TcpListener;

/// Collects reported messages so tests can assert on diagnostics.
#[derive(Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, level: Level, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Hands out fixed tokens in order and counts how often it was asked.
pub struct StubTokenSource {
    tokens: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl StubTokenSource {
    pub fn new(tokens: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

impl TokenSource for StubTokenSource {
    async fn acquire(&self) -> Result<String, OAuthError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(call)
            .cloned()
            .ok_or(OAuthError::MissingAccessToken)
    }
}

/// Serves `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub const CATALOG_CSV: &str = "\
show,bio,host,tags
Late Night Sessions,Deep cuts.,DJ X,house;deep
Morning Coffee,Gentle tunes.,Ana,ambient; folk ;;jazz;soul;funk;disco
";

pub fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
