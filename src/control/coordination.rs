//! Write spacing for a single device.
//!
//! The first request after a quiet period is written right away. Requests
//! arriving while the spacing window is still open are folded into a single
//! trailing write of the newest value, issued when the window closes. A device
//! therefore never sees more than one write per update delay.

use crate::device::DeviceEntry;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCoordination {
    /// Nothing written recently, nothing waiting.
    Idle,
    /// A write was issued; the next one has to wait until `until`.
    CooldownQuiet { until: Instant },
    /// As above, and `queued` is to be written once `until` passes.
    CooldownPending { until: Instant, queued: u32 },
}

/// What the caller has to do with a requested value right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    /// Write this value to the device immediately.
    Immediate(u32),
    /// A flush got scheduled for `flush_at`.
    Deferred { flush_at: Instant },
    /// An already scheduled flush will carry the value.
    Coalesced,
}

impl WriteCoordination {
    pub fn request(&mut self, value: u32, now: Instant, delay: Duration) -> WriteDecision {
        self.settle(now);
        match *self {
            WriteCoordination::Idle => {
                *self = WriteCoordination::CooldownQuiet { until: now + delay };
                WriteDecision::Immediate(value)
            }
            WriteCoordination::CooldownQuiet { until } => {
                *self = WriteCoordination::CooldownPending {
                    until,
                    queued: value,
                };
                WriteDecision::Deferred { flush_at: until }
            }
            // The armed flush keeps its deadline, only the value changes
            WriteCoordination::CooldownPending { until, .. } => {
                *self = WriteCoordination::CooldownPending {
                    until,
                    queued: value,
                };
                WriteDecision::Coalesced
            }
        }
    }

    /// Hand out the queued value if its flush is due, opening a new window.
    pub fn take_due_flush(&mut self, now: Instant, delay: Duration) -> Option<u32> {
        match *self {
            WriteCoordination::CooldownPending { until, queued } if now >= until => {
                *self = WriteCoordination::CooldownQuiet { until: now + delay };
                Some(queued)
            }
            _ => None,
        }
    }

    /// Drop back to [WriteCoordination::Idle] once a quiet window has passed.
    pub fn settle(&mut self, now: Instant) {
        if let WriteCoordination::CooldownQuiet { until } = *self {
            if now >= until {
                *self = WriteCoordination::Idle;
            }
        }
    }

    pub fn flush_deadline(&self) -> Option<Instant> {
        match *self {
            WriteCoordination::CooldownPending { until, .. } => Some(until),
            _ => None,
        }
    }
}

impl DeviceEntry {
    /// Accept a new value for the device.
    ///
    /// The cached value follows the request immediately, even if the write
    /// itself is deferred or later fails. Requests for the value already
    /// cached are not short-circuited: the device file may have drifted.
    pub fn request_write(&mut self, value: u32, now: Instant, delay: Duration) -> WriteDecision {
        let value = self.clamp(value);
        self.set_current(value);
        let decision = self.coordination.request(value, now, delay);
        log::debug!("{}: request for {} -> {:?}", self.key(), value, decision);
        decision
    }

    pub fn take_due_flush(&mut self, now: Instant, delay: Duration) -> Option<u32> {
        self.coordination.take_due_flush(now, delay)
    }

    pub fn flush_deadline(&self) -> Option<Instant> {
        self.coordination.flush_deadline()
    }
}
