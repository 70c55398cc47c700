//! Slave board: renders servo duties, answers potentiometer reads.

use servo_common::bus::{BusEvent, StatusDecoder, StatusFlags};
use servo_common::config::{BusConfig, Delivery};

use super::PwmOutputs;
use crate::bus::{BusPort, CommandHandler, Responder};
use crate::duty::{Channel, DutyScheduler};

/// Slave board engines. The duty scheduler is shared with the PWM interrupt.
#[derive(Debug)]
pub struct SlaveNode<'a> {
    responder: Responder<&'a DutyScheduler>,
    duty: &'a DutyScheduler,
    decoder: StatusDecoder,
}

impl<'a> SlaveNode<'a> {
    pub fn new(config: &BusConfig, duty: &'a DutyScheduler) -> Self {
        let mut responder = Responder::new(config);
        responder.set_command_handler(duty);
        Self {
            responder,
            duty,
            decoder: StatusDecoder::new(),
        }
    }

    /// ADC conversion complete: serve the sample on local address 0.
    #[inline]
    pub fn on_sample(&self, sample: u8) {
        self.responder.expose_value(0, sample);
    }

    /// Bus interrupt, already decoded.
    #[inline]
    pub fn on_bus_event<P: BusPort>(&mut self, event: BusEvent, port: &mut P) {
        self.responder.step(event, port);
    }

    /// Bus interrupt, raw status snapshot plus buffered byte.
    pub fn on_bus_status<P: BusPort>(&mut self, status: StatusFlags, buffer: u8, port: &mut P) {
        for event in self.decoder.decode(status, buffer) {
            self.responder.step(event, port);
        }
    }

    /// PWM period interrupt: advance the scheduler and load both compare
    /// registers. Returns true if a channel is driven this period.
    pub fn on_pwm_tick<O: PwmOutputs>(&self, outputs: &mut O) -> bool {
        let driven = self.duty.tick();
        for channel in Channel::ALL {
            outputs.load_compare(channel, self.duty.duty_for(channel));
        }
        driven
    }

    /// Main loop: hand queued commands to the scheduler. Returns how many
    /// were applied. Does nothing in synchronous delivery mode.
    pub fn poll(&mut self) -> usize {
        if self.responder.delivery() != Delivery::Queued {
            return 0;
        }
        let mut handler = self.duty;
        let mut applied = 0;
        while let Some(command) = self.responder.take_pending_command() {
            handler.on_command(command.target(), command.value());
            applied += 1;
        }
        applied
    }

    #[inline]
    pub fn responder(&self) -> &Responder<&'a DutyScheduler> {
        &self.responder
    }

    #[inline]
    pub fn duty(&self) -> &'a DutyScheduler {
        self.duty
    }

    pub fn reset(&mut self) {
        self.responder.reset();
        self.decoder.reset();
        self.duty.reset();
    }
}
