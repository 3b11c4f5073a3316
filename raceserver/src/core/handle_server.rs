use crate::core::clock::{Clock, SystemClock, Ticker};
use crate::core::race_server::{Outbox, RaceServer, Recipient};
use crate::interfaces::messages::{decode_client_message, encode_server_message};
use crate::net::transport::{spawn_listener, ServerEvent};
use crate::pre::serve_opts::ServeOpts;
use anyhow::Context;
use flume::{Receiver, RecvTimeoutError, Sender, TrySendError};
use helpers::buffer::RingBuffer;
use rand::Rng;
use std::collections::HashMap;
use std::net::TcpListener;
use std::time::{Duration, Instant};

// number of sweeps after which the sweep duration statistics are logged
const SWEEP_STATS_INTERVAL: u64 = 1200;

/// ServerLoop owns the race server and the outgoing channels of all connected clients. All state
/// changes happen on the thread running the loop.
pub struct ServerLoop<C: Clock> {
    clock: C,
    race_server: RaceServer,
    clients: HashMap<u32, Sender<String>>,
    ticker: Ticker,
    sweep_durations: RingBuffer<f64>,
    no_sweeps: u64,
}

impl<C: Clock> ServerLoop<C> {
    pub fn new(clock: C, sweep_interval: Duration, stale_after: Duration) -> ServerLoop<C> {
        let ticker = Ticker::new(sweep_interval, clock.now());

        ServerLoop {
            clock,
            race_server: RaceServer::new(stale_after),
            clients: HashMap::new(),
            ticker,
            sweep_durations: RingBuffer::new(100),
            no_sweeps: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn race_server(&self) -> &RaceServer {
        &self.race_server
    }

    /// handle_event applies a single transport event.
    pub fn handle_event(&mut self, event: ServerEvent) {
        let outbox = match event {
            ServerEvent::Connected { client_id, tx } => {
                self.clients.insert(client_id, tx);
                let session_id = format!("{:016x}", rand::thread_rng().gen::<u64>());
                self.race_server.connect(client_id, session_id)
            }
            ServerEvent::Message { client_id, line } => match decode_client_message(&line) {
                Ok(message) => self
                    .race_server
                    .handle(client_id, message, self.clock.now()),
                Err(e) => {
                    log::warn!("Dropping message of client {}: {}", client_id, e);
                    Vec::new()
                }
            },
            ServerEvent::Disconnected { client_id } => {
                self.clients.remove(&client_id);
                self.race_server.disconnect(client_id)
            }
        };

        self.deliver(outbox);
    }

    /// poll_ticker runs the action sweep and broadcast if it is due. The return value indicates
    /// whether a sweep was executed.
    pub fn poll_ticker(&mut self) -> bool {
        let now = self.clock.now();

        if !self.ticker.poll(now) {
            return false;
        }

        let t_start = Instant::now();
        let outbox = self.race_server.sweep(now);
        self.deliver(outbox);
        self.sweep_durations
            .push(t_start.elapsed().as_secs_f64() * 1000.0);

        self.no_sweeps += 1;
        if self.no_sweeps % SWEEP_STATS_INTERVAL == 0 {
            if let (Some(avg), Some(max)) = (
                self.sweep_durations.get_avg(),
                self.sweep_durations.get_max(),
            ) {
                log::debug!(
                    "Sweep duration over the last {} sweeps: avg {:.3}ms, max {:.3}ms",
                    self.sweep_durations.len(),
                    avg,
                    max
                );
            }
        }

        true
    }

    /// run processes transport events until all event senders are dropped. Waiting for the next
    /// event is limited to the time until the next sweep.
    pub fn run(&mut self, rx: &Receiver<ServerEvent>) {
        loop {
            let timeout = self.ticker.time_until_next(self.clock.now());

            match rx.recv_timeout(timeout) {
                Ok(event) => self.handle_event(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.poll_ticker();
        }
    }

    /// deliver queues the encoded messages on the outgoing channels of their recipients. A client
    /// whose queue is full does not read anymore and is dropped.
    fn deliver(&mut self, outbox: Outbox) {
        let mut lagging: Vec<u32> = Vec::new();

        for (recipient, message) in outbox {
            let line = match encode_server_message(&message) {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Dropping outgoing message: {}", e);
                    continue;
                }
            };

            let client_ids: Vec<u32> = match recipient {
                Recipient::Client(id) => vec![id],
                Recipient::AllClients => self.clients.keys().copied().collect(),
                Recipient::RoomMembers => self.race_server.room().members().to_vec(),
            };

            for id in client_ids {
                if lagging.contains(&id) {
                    continue;
                }

                if let Some(tx) = self.clients.get(&id) {
                    match tx.try_send(line.to_owned()) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => lagging.push(id),
                        Err(TrySendError::Disconnected(_)) => {
                            log::debug!("Outgoing channel of client {} is closed", id)
                        }
                    }
                }
            }
        }

        for id in lagging {
            self.drop_client(id);
        }
    }

    fn drop_client(&mut self, id: u32) {
        log::warn!("Outgoing queue of client {} is full, dropping the client!", id);

        // dropping the sender ends the writer thread, which closes the connection
        self.clients.remove(&id);
        let outbox = self.race_server.disconnect(id);
        self.deliver(outbox);
    }
}

/// handle_server binds the listener and runs the server loop on the calling thread.
pub fn handle_server(serve_opts: &ServeOpts) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&serve_opts.bind_address).context(format!(
        "Failed to bind to {}!",
        serve_opts.bind_address
    ))?;

    log::info!(
        "Listening on {} (sweep interval {}ms, actions expire after {}ms)",
        serve_opts.bind_address,
        serve_opts.sweep_interval_ms,
        serve_opts.stale_after_ms
    );

    let (tx, rx) = flume::unbounded();
    let _ = spawn_listener(listener, tx);

    let mut server_loop = ServerLoop::new(
        SystemClock::new(),
        Duration::from_millis(serve_opts.sweep_interval_ms),
        Duration::from_millis(serve_opts.stale_after_ms),
    );
    server_loop.run(&rx);

    Ok(())
}
