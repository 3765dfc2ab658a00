//! Shared mock adapters for integration tests.
//!
//! Everything here records what the domain core did so tests can assert on
//! the full history without touching real GPIO/PWM registers.

#![allow(dead_code)] // not every test file uses every helper

use std::collections::VecDeque;

use dewguard::app::events::AppEvent;
use dewguard::app::ports::{EventSink, HeaterPort, Level, PulseLine};

// ── Scripted sensor line ──────────────────────────────────────

/// One decode cycle's worth of behaviour on the sensor line.
#[derive(Debug, Clone)]
pub enum LineScript {
    /// Answer the start condition and clock out this frame.
    Frame { h: u16, t: u16, checksum: u8 },
    /// Stay silent — no acknowledgement pulse.
    NoAck,
}

/// Checksum byte as the sensor computes it.
pub fn checksum_for(h: u16, t: u16) -> u8 {
    (h as u8)
        .wrapping_add((h >> 8) as u8)
        .wrapping_add(t as u8)
        .wrapping_add((t >> 8) as u8)
}

/// A well-formed frame for the given raw fields.
pub fn good_frame(h: u16, t: u16) -> LineScript {
    LineScript::Frame {
        h,
        t,
        checksum: checksum_for(h, t),
    }
}

/// A frame whose checksum byte has one bit flipped.
pub fn corrupt_frame(h: u16, t: u16, bit: u8) -> LineScript {
    LineScript::Frame {
        h,
        t,
        checksum: checksum_for(h, t) ^ (1 << (bit % 8)),
    }
}

/// Raw temperature field for a physical value, sign-flag convention.
pub fn encode_temperature(celsius: f32) -> u16 {
    let tenths = (celsius.abs() * 10.0).round() as u16;
    if celsius < 0.0 { 0x8000 | tenths } else { tenths }
}

/// Synthetic pulse source replaying a queue of scripted decode cycles.
pub struct ScriptedLine {
    queue: VecDeque<LineScript>,
    /// When the queue runs dry, keep replaying the last script.
    pub repeat_last: bool,
    current: Option<LineScript>,
    pulses: Vec<u32>,
    cursor: usize,
}

impl ScriptedLine {
    pub fn new(scripts: impl IntoIterator<Item = LineScript>) -> Self {
        Self {
            queue: scripts.into_iter().collect(),
            repeat_last: false,
            current: None,
            pulses: Vec::new(),
            cursor: 0,
        }
    }

    pub fn push(&mut self, script: LineScript) {
        self.queue.push_back(script);
    }

    fn load_next(&mut self) {
        let next = match self.queue.pop_front() {
            Some(s) => Some(s),
            None if self.repeat_last => self.current.clone(),
            None => None,
        };

        self.pulses.clear();
        self.cursor = 0;
        if let Some(LineScript::Frame { h, t, checksum }) = &next {
            for word in [*h, *t] {
                for bit in (0..16).rev() {
                    self.pulses.push(if word >> bit & 1 == 1 { 70 } else { 26 });
                }
            }
            for bit in (0..8).rev() {
                self.pulses
                    .push(if checksum >> bit & 1 == 1 { 70 } else { 26 });
            }
        }
        self.current = next;
    }
}

impl PulseLine for ScriptedLine {
    fn start_signal(&mut self) {
        self.load_next();
    }

    fn pulse_in(&mut self, level: Level, _timeout_us: u32) -> Option<u32> {
        match level {
            Level::Low => match self.current {
                Some(LineScript::Frame { .. }) => Some(80),
                _ => None,
            },
            Level::High => {
                let width = self.pulses.get(self.cursor).copied();
                self.cursor += 1;
                width
            }
        }
    }
}

// ── Mock heater ───────────────────────────────────────────────

/// Records every duty command.
#[derive(Default)]
pub struct MockHeater {
    pub history: Vec<f32>,
}

impl MockHeater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_duty(&self) -> f32 {
        self.history.last().copied().unwrap_or(0.0)
    }
}

impl HeaterPort for MockHeater {
    fn set_duty(&mut self, percent: f32) {
        self.history.push(percent.clamp(0.0, 100.0));
    }

    fn off(&mut self) {
        self.history.push(0.0);
    }
}

// ── Recording event sink ──────────────────────────────────────

/// Captures every emitted event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, pred: impl Fn(&AppEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
