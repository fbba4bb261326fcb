//! Minimal http node recording the headers of the requests it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Headers of a single http request, names lowercased.
pub type Headers = Vec<(String, String)>;

pub struct RawNode {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Headers>>>,
    handle: JoinHandle<()>,
}

impl RawNode {
    /// Spawn the node responding to every call with the given `result`.
    pub async fn spawn(result: Value) -> RawNode {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = tokio::spawn({
            let requests = requests.clone();

            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let requests = requests.clone();
                    let result = result.clone();

                    tokio::spawn(async move {
                        respond(stream, result, &requests).await;
                    });
                }
            }
        });

        RawNode {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Headers of all the requests received so far.
    pub fn requests(&self) -> Vec<Headers> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for RawNode {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

async fn respond(
    mut stream: TcpStream,
    result: Value,
    requests: &Mutex<Vec<Headers>>,
) -> Option<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_len = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
    let headers: Headers = head
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_owned()))
        .collect();

    let content_len: usize = header(&headers, "content-length")?.parse().ok()?;

    while buf.len() < head_len + content_len {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request: Value = serde_json::from_slice(&buf[head_len..head_len + content_len]).ok()?;
    // recorded before responding, so the client sees it once the call returns
    requests.lock().unwrap().push(headers);

    let body = json!({
        "jsonrpc": "2.0",
        "id": request["id"],
        "result": result,
    })
    .to_string();

    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok()
}
