// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault classification
//!
//! Maps a fault plus the ledger state at the time it surfaced to the one
//! terminal message the supervisor should see and whether the fault goes
//! back to the caller.
//!
//! | Ledger state                         | Origin         | Emit               | Re-raise |
//! |--------------------------------------|----------------|--------------------|----------|
//! | no startup terminal, unknown         | component      | (impersonate)      | no       |
//! | no startup terminal                  | anything else  | `startup-failed`   | yes      |
//! | component sent `startup-failed`      | any            | nothing            | yes      |
//! | `startup-complete` seen              | any            | `shutdown-failed`  | yes      |
//! | shutdown terminal already sent       | any            | nothing            | yes      |

use crate::error::FaultOrigin;
use crate::ledger::{EventLedger, Participation, Terminal};
use crate::message::{MessageKind, Phase};

/// What to do about a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The component never took part in the handshake: swallow the fault and
    /// answer the supervisor on its behalf
    SuppressAndImpersonate,
    /// Send `emit` (if any) to the supervisor, then return the fault to the
    /// caller as a failure of `phase`
    Propagate {
        phase: Phase,
        emit: Option<MessageKind>,
    },
}

impl Decision {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Decision::SuppressAndImpersonate)
    }
}

pub fn classify(ledger: &EventLedger, origin: FaultOrigin) -> Decision {
    match ledger.startup() {
        None if origin == FaultOrigin::Component
            && ledger.participation() == Participation::Unknown =>
        {
            Decision::SuppressAndImpersonate
        }
        None => Decision::Propagate {
            phase: Phase::Startup,
            emit: Some(MessageKind::StartupFailed),
        },
        Some(Terminal::Failed(_)) => Decision::Propagate {
            phase: Phase::Startup,
            emit: None,
        },
        Some(Terminal::Complete) => Decision::Propagate {
            phase: Phase::Shutdown,
            emit: match ledger.shutdown() {
                None => Some(MessageKind::ShutdownFailed),
                Some(_) => None,
            },
        },
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
