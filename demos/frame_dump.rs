//! Feeds a length-prefixed stream through the driver in hostile fragments
//! and prints each frame as it completes.

use sockx_codec::encode_header;
use sockx_core::BufferConfig;
use sockx_dsa::RawBlock;
use sockx_transport::{BufferDriver, SocketMessage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut driver = BufferDriver::new(&BufferConfig::default());
    driver.open(1);

    // Three framed messages, 2-byte big-endian prefixes.
    let bodies: [&[u8]; 3] = [b"ping", b"a somewhat longer payload", b""];
    let mut wire = Vec::new();
    for body in bodies {
        wire.extend_from_slice(&encode_header(body.len(), 2)?);
        wire.extend_from_slice(body);
    }

    // Deliver in 3-byte chunks so every frame straddles block boundaries.
    for chunk in wire.chunks(3) {
        let _ = driver.deliver(SocketMessage::data(1, RawBlock::copy_of(chunk)))?;
        while let Some(frame) = driver.read_frame(1, 2)? {
            println!("frame ({} bytes): {:?}", frame.len(), frame);
        }
        println!("  .. {} bytes still buffered", driver.size(1)?);
    }

    let reclaimed = driver.shutdown();
    println!("shutdown reclaimed {} in-flight blocks", reclaimed);
    Ok(())
}
