//! Line-oriented TCP echo server driven by the chained buffer.
//!
//! Each connection gets its own arena + buffer on a single-threaded
//! runtime. The buffer is deliberately not `Send`, so the task model has
//! to respect the single-owner discipline. Try it with:
//!
//! ```text
//! cargo run --example line_echo
//! printf 'hello\nworld\n' | nc 127.0.0.1 8007
//! ```

use sockx_core::BufferConfig;
use sockx_dsa::RawBlock;
use sockx_transport::SocketBuffer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn serve_connection(mut stream: TcpStream) {
    let config = BufferConfig::default();
    let mut arena = config.build_arena();
    let mut buffer = SocketBuffer::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("read failed: {}", e);
                break;
            }
        };
        let total = buffer.push(&mut arena, RawBlock::copy_of(&chunk[..n]));
        tracing::debug!(pushed = n, total, "chunk buffered");

        while let Some(line) = buffer.read_line(&mut arena, b"\n") {
            if stream.write_all(&line).await.is_err() || stream.write_all(b"\n").await.is_err() {
                return;
            }
        }
    }

    let tail = buffer.read_all(&mut arena);
    if !tail.is_empty() {
        tracing::info!(bytes = tail.len(), "connection closed with an unterminated tail");
    }
    let reclaimed = arena.teardown();
    tracing::debug!(reclaimed, "arena torn down");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let listener = TcpListener::bind("127.0.0.1:8007").await?;
            tracing::info!("line_echo listening on 127.0.0.1:8007");
            loop {
                let (stream, peer) = listener.accept().await?;
                tracing::info!("accepted {}", peer);
                tokio::task::spawn_local(serve_connection(stream));
            }
        })
        .await
}
