//! Scripted demo conversations
//!
//! Each flow replays three utterances through a session with a fixed gap
//! between turns. The session lock is held for one turn at a time, so manual
//! input can land between demo turns.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use advisor_core::Result;

use crate::advisor::{ProductAdvisor, TurnOutcome};

/// Built-in demo flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoFlow {
    Laptop,
    Phone,
    Headphones,
}

impl DemoFlow {
    pub const ALL: [DemoFlow; 3] = [DemoFlow::Laptop, DemoFlow::Phone, DemoFlow::Headphones];

    pub fn as_str(&self) -> &'static str {
        match self {
            DemoFlow::Laptop => "laptop",
            DemoFlow::Phone => "phone",
            DemoFlow::Headphones => "headphones",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|flow| flow.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Utterances in playback order
    pub fn script(&self) -> [&'static str; 3] {
        match self {
            DemoFlow::Laptop => [
                "I need a new laptop for work",
                "My budget is around $1000-1500",
                "I need something with good battery life and powerful enough for video editing",
            ],
            DemoFlow::Phone => [
                "Looking for a new smartphone",
                "I can spend up to $800",
                "I really care about camera quality and battery life",
            ],
            DemoFlow::Headphones => [
                "I want wireless headphones",
                "Under $200 please",
                "Noise cancellation would be nice for my commute",
            ],
        }
    }
}

impl fmt::Display for DemoFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replay `flow` against a shared session
///
/// Waits `gap` after each turn before the next one. Stops at the first
/// failed turn.
pub async fn run_demo(
    advisor: Arc<Mutex<ProductAdvisor>>,
    flow: DemoFlow,
    gap: Duration,
) -> Result<Vec<TurnOutcome>> {
    let script = flow.script();
    let mut turns = Vec::with_capacity(script.len());

    for (i, utterance) in script.iter().enumerate() {
        if i > 0 && !gap.is_zero() {
            tokio::time::sleep(gap).await;
        }

        let turn = {
            let mut session = advisor.lock().await;
            tracing::debug!(session_id = session.session_id(), flow = %flow, step = i + 1, "Demo turn");
            session.process(utterance).await?
        };
        turns.push(turn);
    }

    tracing::info!(flow = %flow, turns = turns.len(), "Demo finished");
    Ok(turns)
}
