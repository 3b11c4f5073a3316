use flume::Sender;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Number of outgoing lines that may be queued for a client before the server drops it.
pub const OUTGOING_QUEUE_LEN: usize = 256;

/// Time after which a blocked write to a client fails.
const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum length of a received line in bytes (including the newline).
pub const MAX_LINE_LEN: u64 = 16 * 1024;

/// Events forwarded from the connection threads to the server loop.
#[derive(Debug)]
pub enum ServerEvent {
    /// A client connected, tx is the channel for lines to be written to it.
    Connected { client_id: u32, tx: Sender<String> },
    Message { client_id: u32, line: String },
    Disconnected { client_id: u32 },
}

/// spawn_listener accepts connections on a separate thread. Every connection gets a reader thread
/// forwarding received lines and a writer thread draining its outgoing channel.
pub fn spawn_listener(listener: TcpListener, tx: Sender<ServerEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut next_id: u32 = 1;

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let client_id = next_id;
                    next_id += 1;

                    if let Err(e) = handle_connection(stream, client_id, &tx) {
                        log::warn!("Failed to set up connection of client {}: {}", client_id, e);
                    }
                }
                Err(e) => log::warn!("Accept error: {}", e),
            }

            if tx.is_disconnected() {
                break;
            }
        }
    })
}

fn handle_connection(
    stream: TcpStream,
    client_id: u32,
    tx: &Sender<ServerEvent>,
) -> std::io::Result<()> {
    let write_stream = stream.try_clone()?;
    write_stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
    let (out_tx, out_rx) = flume::bounded::<String>(OUTGOING_QUEUE_LEN);

    log::debug!(
        "Accepted connection of client {} from {:?}",
        client_id,
        stream.peer_addr().ok()
    );

    if tx
        .send(ServerEvent::Connected {
            client_id,
            tx: out_tx,
        })
        .is_err()
    {
        return Ok(());
    }

    // writer: ends when the server loop drops the outgoing channel or the socket fails, the
    // shutdown also ends the reader
    thread::spawn(move || {
        let mut write_stream = write_stream;
        for line in out_rx.iter() {
            if writeln!(write_stream, "{}", line)
                .and_then(|_| write_stream.flush())
                .is_err()
            {
                break;
            }
        }
        let _ = write_stream.shutdown(Shutdown::Both);
    });

    // reader
    let tx = tx.to_owned();
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut line = String::new();

        loop {
            line.clear();

            match read_line_capped(&mut reader, &mut line) {
                Ok(0) => break,
                Ok(_) if line.trim().is_empty() => {}
                Ok(_) => {
                    let line = line.trim_end().to_owned();
                    if tx.send(ServerEvent::Message { client_id, line }).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::debug!("Error reading from client {}: {}", client_id, e);
                    break;
                }
            }
        }

        let _ = tx.send(ServerEvent::Disconnected { client_id });
    });

    Ok(())
}

/// read_line_capped reads a single line into buf and returns the number of bytes read (zero at
/// the end of the stream). A line exceeding MAX_LINE_LEN is reported as InvalidData.
pub fn read_line_capped<R: BufRead>(reader: &mut R, buf: &mut String) -> std::io::Result<usize> {
    let no_bytes = reader.take(MAX_LINE_LEN).read_line(buf)?;

    if no_bytes as u64 == MAX_LINE_LEN && !buf.ends_with('\n') {
        return Err(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("line exceeds {} bytes", MAX_LINE_LEN),
        ));
    }

    Ok(no_bytes)
}
