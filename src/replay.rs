//! Scripted replay of client traffic against one attached widget.
//!
//! A script is JSON lines, one client notification per line, stamped with a
//! virtual arrival time:
//!
//! ```text
//! {"atMs": 0,   "kind": "event", "name": "zoomist-ready"}
//! {"atMs": 10,  "kind": "event", "name": "zoomist-wheel"}
//! {"atMs": 40,  "kind": "fetch"}
//! {"atMs": 60,  "kind": "readResult", "request": 1, "value": {"width": 640, "height": 480, "aspectRatio": 1.33}}
//! ```
//!
//! `widget` may be omitted and defaults to the attached widget. The extra kind
//! `fetch` issues a container-data read; request ids start at 1. Blank lines
//! and lines starting with `#` are skipped.
//!
//! Every outbound [`ClientMessage`] is written to the output as one JSON line.

use anyhow::{Context, Result, bail};
use crossbeam_channel::Receiver;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::session::Session;
use crate::transport::{ChannelTransport, ClientMessage, ClientNotification};
use crate::widget::{EventKind, InteractionEvent, WidgetId, Zoomist};

/// Outcome of a replay run
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Script lines processed (blank and comment lines excluded)
    pub steps: usize,
    /// Lines the session refused (unknown event, malformed payload, ...)
    pub rejected: usize,
    /// ClientMessages written to the output
    pub outbound: usize,
    /// Events seen by listeners, in delivery order
    pub delivered: Vec<InteractionEvent>,
}

pub struct Replay {
    session: Session,
    widget: WidgetId,
    outbound: Receiver<ClientMessage>,
    delivered: Arc<Mutex<Vec<InteractionEvent>>>,
}

impl Replay {
    /// Attach a widget for `src` and listen to every event kind on it.
    pub fn new(config: &Config, src: &str) -> Result<Self> {
        let (transport, outbound) = ChannelTransport::new();
        let mut session = Session::with_config(Arc::new(transport), config);
        let widget = session.attach(src)?;

        let delivered = Arc::new(Mutex::new(Vec::new()));
        if let Some(handle) = session.widget(widget) {
            for kind in EventKind::ALL {
                let sink = Arc::clone(&delivered);
                handle.add_listener(kind, move |event: &InteractionEvent| {
                    log::info!("{} delivered: {:?}", kind, event.detail);
                    sink.lock().unwrap_or_else(|e| e.into_inner()).push(*event);
                });
            }
        }

        Ok(Self {
            session,
            widget,
            outbound,
            delivered,
        })
    }

    pub fn widget_id(&self) -> WidgetId {
        self.widget
    }

    /// The attached handle, for initial settings before the run.
    pub fn widget_mut(&mut self) -> Result<&mut Zoomist> {
        let id = self.widget;
        self.session
            .widget_mut(id)
            .with_context(|| format!("widget {id} is no longer attached"))
    }

    /// Feed `input` through the session and write outbound traffic to `out`.
    pub fn run<R: BufRead, W: Write>(mut self, input: R, out: &mut W) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();
        let start = Instant::now();
        let mut last_ms = 0u64;

        // Settings applied before the run
        report.outbound += self.flush(out)?;

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = line.with_context(|| format!("Failed to read script line {line_no}"))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut value: Value = serde_json::from_str(trimmed)
                .with_context(|| format!("Script line {line_no} is not JSON"))?;
            let Some(fields) = value.as_object_mut() else {
                bail!("Script line {line_no} is not a JSON object");
            };

            let at_ms = match fields.remove("atMs") {
                Some(v) => v
                    .as_u64()
                    .with_context(|| format!("Script line {line_no}: atMs must be a whole number"))?,
                None => last_ms,
            };
            if at_ms < last_ms {
                bail!("Script line {line_no}: atMs goes backwards ({at_ms} < {last_ms})");
            }
            last_ms = at_ms;
            let now = start + Duration::from_millis(at_ms);

            self.session.tick_at(now);
            report.steps += 1;

            if fields.get("kind").and_then(Value::as_str) == Some("fetch") {
                let handle = self
                    .session
                    .widget(self.widget)
                    .context("attached widget disappeared")?;
                let request = handle.fetch_container_data(|snapshot| {
                    log::info!("container data: {:?}", snapshot);
                })?;
                log::debug!("line {}: fetch issued as {}", line_no, request);
            } else {
                if !fields.contains_key("widget") {
                    fields.insert("widget".to_string(), serde_json::to_value(self.widget)?);
                }
                let notification: ClientNotification = serde_json::from_value(value)
                    .with_context(|| format!("Script line {line_no} is not a client notification"))?;
                if let Err(e) = self.session.receive_at(notification, now) {
                    log::warn!("line {}: rejected: {}", line_no, e);
                    report.rejected += 1;
                }
            }

            report.outbound += self.flush(out)?;
        }

        // Let the last burst settle
        while let Some(due) = self.session.next_due() {
            self.session.tick_at(due);
        }
        report.outbound += self.flush(out)?;

        report.delivered = std::mem::take(&mut *self.delivered.lock().unwrap_or_else(|e| e.into_inner()));
        log::info!(
            "Replay done: {} step(s), {} rejected, {} outbound, {} delivered",
            report.steps,
            report.rejected,
            report.outbound,
            report.delivered.len()
        );
        Ok(report)
    }

    fn flush<W: Write>(&self, out: &mut W) -> Result<usize> {
        let mut written = 0;
        for message in self.outbound.try_iter() {
            serde_json::to_writer(&mut *out, &message)?;
            writeln!(out)?;
            written += 1;
        }
        Ok(written)
    }
}
