//! Tabbed dashboard state: which tab is active and what each feature panel shows.
//!
//! Each panel runs `idle → loading → success | error`. Every submission takes a ticket;
//! only the most recent ticket may settle the panel. Switching away from a tab resets its
//! panel and invalidates any in-flight ticket, so a late result for an abandoned tab is
//! dropped instead of resurrecting stale state.

pub mod handlers;

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::FailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Dashboard,
    Predictor,
    Evidence,
    Calendar,
    Settlement,
    Research,
    Drafting,
    Stenographer,
    Triage,
    Adjournments,
    Summarizer,
    Assistant,
    Intelligence,
    Citizen,
}

impl Tab {
    pub const COUNT: usize = 14;

    pub const ALL: [Tab; Tab::COUNT] = [
        Tab::Dashboard,
        Tab::Predictor,
        Tab::Evidence,
        Tab::Calendar,
        Tab::Settlement,
        Tab::Research,
        Tab::Drafting,
        Tab::Stenographer,
        Tab::Triage,
        Tab::Adjournments,
        Tab::Summarizer,
        Tab::Assistant,
        Tab::Intelligence,
        Tab::Citizen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Predictor => "predictor",
            Tab::Evidence => "evidence",
            Tab::Calendar => "calendar",
            Tab::Settlement => "settlement",
            Tab::Research => "research",
            Tab::Drafting => "drafting",
            Tab::Stenographer => "stenographer",
            Tab::Triage => "triage",
            Tab::Adjournments => "adjournments",
            Tab::Summarizer => "summarizer",
            Tab::Assistant => "assistant",
            Tab::Intelligence => "intelligence",
            Tab::Citizen => "citizen",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| format!("unknown tab '{s}'"))
    }
}

/// Proof of a submission. Only the newest ticket for a panel can settle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelState {
    Idle,
    Loading,
    Success { result: Value },
    Error { kind: FailureKind, message: String },
}

impl PanelState {
    pub fn status(&self) -> &'static str {
        match self {
            PanelState::Idle => "idle",
            PanelState::Loading => "loading",
            PanelState::Success { .. } => "success",
            PanelState::Error { .. } => "error",
        }
    }
}

#[derive(Debug)]
struct PanelInner {
    state: PanelState,
    generation: u64,
}

#[derive(Debug)]
pub struct Panel {
    inner: Mutex<PanelInner>,
}

impl Default for Panel {
    fn default() -> Self {
        Panel {
            inner: Mutex::new(PanelInner {
                state: PanelState::Idle,
                generation: 0,
            }),
        }
    }
}

impl Panel {
    fn lock(&self) -> MutexGuard<'_, PanelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a submission. Any previous result is dropped and any earlier in-flight
    /// ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = PanelState::Loading;
        Ticket(inner.generation)
    }

    /// Records a result. Returns false when the ticket is stale and the result was dropped.
    pub fn succeed(&self, ticket: Ticket, result: Value) -> bool {
        self.settle(ticket, PanelState::Success { result })
    }

    /// Records a failure. Returns false when the ticket is stale.
    pub fn fail(&self, ticket: Ticket, kind: FailureKind, message: String) -> bool {
        self.settle(ticket, PanelState::Error { kind, message })
    }

    fn settle(&self, ticket: Ticket, state: PanelState) -> bool {
        let mut inner = self.lock();
        if inner.generation != ticket.0 {
            debug!(
                ticket = ticket.0,
                current = inner.generation,
                "Discarding stale {} result",
                state.status()
            );
            return false;
        }
        inner.state = state;
        true
    }

    /// Back to idle; in-flight tickets are invalidated.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = PanelState::Idle;
    }

    pub fn snapshot(&self) -> PanelState {
        self.lock().state.clone()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSummary {
    pub tab: Tab,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub active_tab: Tab,
    pub panels: Vec<PanelSummary>,
}

#[derive(Debug)]
pub struct Dashboard {
    active: Mutex<Tab>,
    panels: [Panel; Tab::COUNT],
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard {
            active: Mutex::new(Tab::Dashboard),
            panels: std::array::from_fn(|_| Panel::default()),
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, tab: Tab) -> &Panel {
        &self.panels[tab.index()]
    }

    pub fn active_tab(&self) -> Tab {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes `tab` active and returns the previously active tab. Leaving a tab resets
    /// its panel.
    pub fn select(&self, tab: Tab) -> Tab {
        let previous = {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *active, tab)
        };
        if previous != tab {
            self.panel(previous).reset();
            debug!("Switched tab {previous} -> {tab}");
        }
        previous
    }

    pub fn overview(&self) -> DashboardOverview {
        DashboardOverview {
            active_tab: self.active_tab(),
            panels: Tab::ALL
                .into_iter()
                .map(|tab| PanelSummary {
                    tab,
                    status: self.panel(tab).snapshot().status(),
                })
                .collect(),
        }
    }
}
