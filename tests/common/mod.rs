//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use security_shield::config::AppConfig;
use security_shield::security::MemorySink;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock origin on an ephemeral port.
///
/// Every response body echoes the request line followed by the
/// X-Forwarded-For value the origin saw, one per line.
pub async fn start_mock_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            buf.extend_from_slice(&chunk[..n]);
                            if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() > 16 * 1024 {
                                break;
                            }
                        }
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let forwarded = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("x-forwarded-for")
                            .then(|| value.trim().to_string())
                    })
                    .unwrap_or_default();

                let body = format!("{request_line}\n{forwarded}");
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Configuration with a short honeypot delay, pointed at `origin`.
#[allow(dead_code)]
pub fn test_config(origin: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.url = format!("http://{origin}");
    config.shield.honeypot_delay_ms = 200;
    config
}

#[allow(dead_code)]
pub fn memory_sink() -> Arc<MemorySink> {
    Arc::new(MemorySink::new())
}
