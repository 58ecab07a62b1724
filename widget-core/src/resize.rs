//! Resize Channel: wire format, the reporting state machine that runs inside the
//! embedded document, and the acceptance rules of the two listeners.

use serde::{Deserialize, Serialize};

/// Value of the `type` field on resize messages.
pub const RESIZE_MESSAGE_TYPE: &str = "resize";

/// Height notification sent from embedded content to its parent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeMessage {
    /// Scroll height of the content root in CSS pixels.
    pub height: u32,
}

#[derive(Serialize)]
struct OutgoingWire<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    height: u32,
}

#[derive(Deserialize)]
struct IncomingWire {
    #[serde(rename = "type")]
    kind: String,
    height: f64,
}

impl ResizeMessage {
    pub fn new(height: u32) -> Self {
        Self { height }
    }

    /// `{"type":"resize","height":<n>}` as a JSON string.
    pub fn to_json(&self) -> String {
        let wire = OutgoingWire {
            kind: RESIZE_MESSAGE_TYPE,
            height: self.height,
        };
        serde_json::to_string(&wire).unwrap_or_else(|_| {
            format!(r#"{{"type":"{RESIZE_MESSAGE_TYPE}","height":{}}}"#, self.height)
        })
    }

    /// Defensive parse of a `message` event payload. Anything that is not a
    /// well-formed resize message yields `None`.
    pub fn parse(data: &str) -> Option<Self> {
        let wire: IncomingWire = serde_json::from_str(data).ok()?;
        if wire.kind != RESIZE_MESSAGE_TYPE || !wire.height.is_finite() || wire.height < 0.0 {
            return None;
        }
        Some(Self {
            height: wire.height.round().min(u32::MAX as f64) as u32,
        })
    }

    /// Inline style value applied to the iframe.
    pub fn css_height(&self) -> String {
        format!("{}px", self.height)
    }
}

/// Lifecycle of one embedded instance's reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReporterState {
    #[default]
    Idle,
    Observing,
    Disposed,
}

/// Decides when the embedded content posts a height to its parent.
///
/// The first height is always reported, later ones only when they differ from
/// the last one sent. Nothing is reported once disposed.
#[derive(Debug, Clone, Default)]
pub struct HeightReporter {
    state: ReporterState,
    last_sent: Option<u32>,
}

impl HeightReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    pub fn last_sent(&self) -> Option<u32> {
        self.last_sent
    }

    /// Idle -> Observing. Returns the cold-start notification.
    pub fn start(&mut self, initial_height: u32) -> Option<ResizeMessage> {
        if self.state != ReporterState::Idle {
            return None;
        }
        self.state = ReporterState::Observing;
        self.emit(initial_height)
    }

    /// One observation callback. An observation arriving while still idle
    /// counts as the start.
    pub fn observe(&mut self, height: u32) -> Option<ResizeMessage> {
        match self.state {
            ReporterState::Idle => self.start(height),
            ReporterState::Observing if self.last_sent != Some(height) => self.emit(height),
            ReporterState::Observing | ReporterState::Disposed => None,
        }
    }

    /// Terminal.
    pub fn dispose(&mut self) {
        self.state = ReporterState::Disposed;
    }

    fn emit(&mut self, height: u32) -> Option<ResizeMessage> {
        self.last_sent = Some(height);
        Some(ResizeMessage::new(height))
    }
}

/// Receiving half of the channel.
///
/// `any_origin` is the page-level iframe wrapper, which applies messages from
/// any sender. `pinned` is the embed script, which only trusts its own origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightListener {
    expected_origin: Option<String>,
}

impl HeightListener {
    pub fn any_origin() -> Self {
        Self {
            expected_origin: None,
        }
    }

    pub fn pinned(origin: &str) -> Self {
        Self {
            expected_origin: Some(origin.trim().trim_end_matches('/').to_string()),
        }
    }

    pub fn expected_origin(&self) -> Option<&str> {
        self.expected_origin.as_deref()
    }

    /// Height to apply for a `message` event, if any.
    pub fn accept(&self, origin: &str, data: Option<&str>) -> Option<ResizeMessage> {
        if let Some(expected) = &self.expected_origin {
            if origin.trim_end_matches('/') != expected {
                return None;
            }
        }
        ResizeMessage::parse(data?)
    }
}
