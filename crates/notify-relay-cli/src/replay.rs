//! Drives a bridge from a host event script.

use std::io::{BufRead, Write};

use anyhow::Context;
use notify_relay_channel::RecordStream;
use notify_relay_listener::{Bridge, ListenerStats};
use tracing::{debug, info};

use crate::script::{parse_line, HostEvent};

/// Feeds script events to the service and writes every record the consumer
/// receives to `out` as one JSON line.
pub struct Replay<W> {
    bridge: Bridge,
    stream: Option<RecordStream>,
    out: W,
}

impl<W: Write> Replay<W> {
    pub fn new(bridge: Bridge, out: W) -> Self {
        Self {
            bridge,
            stream: None,
            out,
        }
    }

    pub fn run(&mut self, input: impl BufRead) -> anyhow::Result<ListenerStats> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("failed to read script")?;
            let Some(event) = parse_line(&line).with_context(|| format!("line {}", index + 1))?
            else {
                continue;
            };
            self.apply(event)?;
        }
        self.drain()?;
        self.out.flush()?;

        let stats = self.bridge.service.stats();
        info!(
            posted = stats.posted,
            delivered = stats.delivered,
            dropped = stats.dropped,
            failed = stats.failed,
            removed = stats.removed,
            ignored = stats.ignored,
            "replay finished"
        );
        Ok(stats)
    }

    fn apply(&mut self, event: HostEvent) -> anyhow::Result<()> {
        match event {
            HostEvent::StartListening => {
                self.drain()?;
                let stream = self.bridge.channel.start_listening();
                debug!(subscription = %stream.subscription_id(), "consumer listening");
                self.stream = Some(stream);
            }
            HostEvent::StopListening => {
                self.bridge.channel.stop_listening();
                self.drain()?;
                self.stream = None;
            }
            other => {
                if let Some(lifecycle) = other.into_lifecycle() {
                    self.bridge.service.handle(lifecycle);
                }
                self.drain()?;
            }
        }
        Ok(())
    }

    /// Write out everything buffered on the current stream.
    fn drain(&mut self) -> anyhow::Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(());
        };
        while let Some(record) = stream.try_recv() {
            serde_json::to_writer(&mut self.out, &record)?;
            writeln!(self.out)?;
        }
        Ok(())
    }
}
