//! Dual-channel duty scheduler.
//!
//! Two servo outputs share one PWM timer. Each timer period serves exactly
//! one channel, alternating, so both outputs never assert in the same period
//! and each is refreshed every second period.
//!
//! Pending duties are written from the bus interrupt (or the main loop in
//! queued mode) and latched into the current duty on the tick that serves
//! their channel. Every shared field is a single atomic byte.

use std::sync::atomic::{AtomicU8, Ordering};

use servo_common::consts::{CHANNEL_COUNT, DEFAULT_PWM_PERIOD};
use static_assertions::const_assert_eq;
use tracing::{debug, trace};

use crate::bus::CommandHandler;

/// Servo output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Servo0 = 0,
    Servo1 = 1,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::Servo0, Channel::Servo1];

    /// Channel for a local sub-address. Returns `None` past the last channel.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Servo0),
            1 => Some(Self::Servo1),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The channel served on the period after this one.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::Servo0 => Self::Servo1,
            Self::Servo1 => Self::Servo0,
        }
    }
}

// One `Channel` variant per output.
const_assert_eq!(CHANNEL_COUNT, 2);

/// Time-division duty scheduler for two PWM channels.
#[derive(Debug)]
pub struct DutyScheduler {
    pending: [AtomicU8; CHANNEL_COUNT],
    current: [AtomicU8; CHANNEL_COUNT],
    selected: AtomicU8,
    /// Channel served in the current period.
    phase: AtomicU8,
    period: u8,
}

impl Default for DutyScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_PWM_PERIOD)
    }
}

impl DutyScheduler {
    /// Scheduler whose duties never exceed `period`.
    pub const fn new(period: u8) -> Self {
        Self {
            pending: [AtomicU8::new(0), AtomicU8::new(0)],
            current: [AtomicU8::new(0), AtomicU8::new(0)],
            selected: AtomicU8::new(0),
            // First tick serves Servo0.
            phase: AtomicU8::new(Channel::Servo1 as u8),
            period,
        }
    }

    #[inline]
    pub const fn period(&self) -> u8 {
        self.period
    }

    /// Select the channel that `set_pending_value` updates.
    /// Indices past the last channel are ignored.
    pub fn select_channel(&self, index: u8) {
        match Channel::from_u8(index) {
            Some(channel) => self.selected.store(channel as u8, Ordering::Relaxed),
            None => debug!(index, "channel select out of range ignored"),
        }
    }

    pub fn selected_channel(&self) -> Channel {
        self.load_channel(&self.selected)
    }

    /// Set the pending duty of the selected channel.
    pub fn set_pending_value(&self, value: u8) {
        self.set_channel_value(self.selected_channel(), value);
    }

    /// Set the pending duty of `channel`. Takes effect on its next tick.
    pub fn set_channel_value(&self, channel: Channel, value: u8) {
        self.pending[channel.index()].store(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn pending(&self, channel: Channel) -> u8 {
        self.pending[channel.index()].load(Ordering::Relaxed)
    }

    /// Duty latched for `channel` the last time it was served.
    #[inline]
    pub fn current(&self, channel: Channel) -> u8 {
        self.current[channel.index()].load(Ordering::Relaxed)
    }

    /// Channel served in the current period.
    pub fn active_channel(&self) -> Channel {
        self.load_channel(&self.phase)
    }

    /// Start a new period: hand the timer to the other channel and latch its
    /// pending duty. Returns true if that channel is driven this period.
    pub fn tick(&self) -> bool {
        let channel = self.active_channel().other();
        self.phase.store(channel as u8, Ordering::Relaxed);
        let duty = self.pending(channel).min(self.period);
        self.current[channel.index()].store(duty, Ordering::Relaxed);
        trace!(?channel, duty, "duty tick");
        duty != 0
    }

    /// Compare value for `channel` in the current period. Zero unless the
    /// channel is the one being served.
    pub fn duty_for(&self, channel: Channel) -> u8 {
        if channel == self.active_channel() {
            self.current(channel)
        } else {
            0
        }
    }

    /// Zero every duty and restart the alternation at Servo0.
    pub fn reset(&self) {
        for channel in Channel::ALL {
            self.pending[channel.index()].store(0, Ordering::Relaxed);
            self.current[channel.index()].store(0, Ordering::Relaxed);
        }
        self.selected.store(Channel::Servo0 as u8, Ordering::Relaxed);
        self.phase.store(Channel::Servo1 as u8, Ordering::Relaxed);
    }

    fn load_channel(&self, cell: &AtomicU8) -> Channel {
        Channel::from_u8(cell.load(Ordering::Relaxed)).unwrap_or(Channel::Servo0)
    }
}

/// Address byte selects the channel, data byte sets its duty.
impl CommandHandler for &DutyScheduler {
    fn on_command(&mut self, address: u8, value: u8) {
        match Channel::from_u8(address) {
            Some(channel) => self.set_channel_value(channel, value),
            None => debug!(address, value, "command for unknown channel ignored"),
        }
    }

    fn on_target(&mut self, address: u8) {
        self.select_channel(address);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
