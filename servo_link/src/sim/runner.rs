//! Scheduled master/slave simulation and its report.

use std::fmt;

use serde::Serialize;
use servo_common::config::BusConfig;
use servo_common::consts::PWM_PERIOD_US;
use tracing::{debug, info};

use super::config::SimulationConfig;
use super::rig::Rig;
use crate::duty::{Channel, DutyScheduler};
use crate::error::LinkError;

/// Outcome of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub periods: u32,
    /// Wall time the run stands for, one PWM period per step.
    pub simulated_time_ms: u64,
    pub samples_sent: u32,
    pub polls: u32,
    pub bus_operations: u64,
    pub master_transactions: u64,
    pub master_desyncs: u64,
    pub slave_transactions: u64,
    pub slave_commands: u64,
    pub slave_reads_served: u64,
    pub slave_desyncs: u64,
    pub last_remote_reading: Option<u8>,
    /// Periods in which each channel was driven.
    pub driven_periods: [u32; 2],
    /// Periods in which both channels were driven. Always zero.
    pub overlap_periods: u32,
    /// Pending duty of each channel at the end of the run.
    pub final_duty: [u8; 2],
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "periods:             {} ({} ms)",
            self.periods, self.simulated_time_ms
        )?;
        writeln!(f, "samples sent:        {}", self.samples_sent)?;
        writeln!(f, "remote polls:        {}", self.polls)?;
        writeln!(f, "bus operations:      {}", self.bus_operations)?;
        writeln!(
            f,
            "master transactions: {} ({} desync)",
            self.master_transactions, self.master_desyncs
        )?;
        writeln!(
            f,
            "slave transactions:  {} ({} commands, {} reads, {} desync)",
            self.slave_transactions,
            self.slave_commands,
            self.slave_reads_served,
            self.slave_desyncs
        )?;
        match self.last_remote_reading {
            Some(value) => writeln!(f, "remote reading:      {value}")?,
            None => writeln!(f, "remote reading:      -")?,
        }
        writeln!(
            f,
            "driven periods:      servo0 {} / servo1 {} (overlap {})",
            self.driven_periods[0], self.driven_periods[1], self.overlap_periods
        )?;
        write!(
            f,
            "final duty:          servo0 {} / servo1 {}",
            self.final_duty[0], self.final_duty[1]
        )
    }
}

/// Drives a [`Rig`] on a fixed schedule, one step per PWM period.
#[derive(Debug, Clone, Copy)]
pub struct Simulation {
    bus: BusConfig,
    schedule: SimulationConfig,
}

impl Simulation {
    pub fn new(bus: BusConfig, schedule: SimulationConfig) -> Self {
        Self { bus, schedule }
    }

    /// Run every scheduled period.
    ///
    /// Each period: toggle the target servo on its interval, submit the
    /// master sample and the remote poll when due, settle the bus, then tick
    /// the slave PWM timer.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Config` for an invalid configuration and
    /// propagates queue or wire errors.
    pub fn run(&self) -> Result<SimulationReport, LinkError> {
        self.bus.validate()?;
        self.schedule.validate()?;

        let duty = DutyScheduler::new(self.bus.pwm_period);
        let mut rig = Rig::new(&self.bus, &duty);
        let mut report = SimulationReport {
            periods: self.schedule.periods,
            simulated_time_ms: u64::from(self.schedule.periods) * u64::from(PWM_PERIOD_US) / 1000,
            ..Default::default()
        };
        let wave = self.schedule.waveform;
        let mut target = Channel::Servo0;

        info!(
            periods = self.schedule.periods,
            encoding = ?self.bus.encoding,
            delivery = ?self.bus.delivery,
            "simulation started"
        );

        for period in 0..self.schedule.periods {
            if period > 0 && period % self.schedule.toggle_interval == 0 {
                target = target.other();
                rig.select_target(target);
            }

            rig.slave_sample(u8::MAX - wave.sample(period));

            if period % self.schedule.sample_interval == 0 {
                rig.master_sample(wave.sample(report.samples_sent))?;
                report.samples_sent += 1;
            }
            if period % self.schedule.poll_interval == 0 {
                rig.poll_remote()?;
                report.polls += 1;
            }
            rig.settle()?;

            let compare = rig.pwm_tick();
            let [a, b] = compare.values();
            if a != 0 {
                report.driven_periods[0] += 1;
            }
            if b != 0 {
                report.driven_periods[1] += 1;
            }
            if a != 0 && b != 0 {
                report.overlap_periods += 1;
            }
            debug!(period, a, b, "pwm period");
        }

        let initiator = rig.master().initiator().stats();
        let responder = rig.slave().responder().stats();
        report.bus_operations = rig.wire().ops();
        report.master_transactions = initiator.transactions;
        report.master_desyncs = initiator.desync_count;
        report.slave_transactions = responder.transactions;
        report.slave_commands = responder.commands;
        report.slave_reads_served = responder.reads_served;
        report.slave_desyncs = responder.desync_count;
        report.last_remote_reading = rig.master().remote_reading();
        report.final_duty = [duty.pending(Channel::Servo0), duty.pending(Channel::Servo1)];

        info!(
            transactions = report.master_transactions,
            commands = report.slave_commands,
            "simulation finished"
        );
        Ok(report)
    }
}
