//! Integration test: reinitialisation restores the initial state.

use servo_common::bus::{Address, Command, Encoding};
use servo_common::config::{BusConfig, Delivery};

use servo_link::bus::{FnHandler, Initiator, InitiatorState, RecordingPort};
use servo_link::duty::{Channel, DutyScheduler};
use servo_link::sim::Rig;

#[test]
fn initiator_reset_mid_transaction() {
    let mut init = Initiator::new(Encoding::TwoByte);
    init.set_command_handler(FnHandler(|_: u8, _: u8| {}));
    let mut port = RecordingPort::new();
    init.submit(&Command::new(Address::WriteServo0, 1), &mut port).unwrap();
    init.step(&mut port);
    assert_eq!(init.state(), InitiatorState::DataOut);

    init.reset();
    assert_eq!(init.state(), InitiatorState::Idle);
    assert_eq!(init.codec().queued_bytes(), 0);

    // A fresh command runs as if nothing had happened.
    port.clear();
    init.submit(&Command::new(Address::WriteServo1, 2), &mut port).unwrap();
    while init.state() != InitiatorState::Idle {
        init.step(&mut port);
    }
    assert_eq!(port.written(), vec![0x0E, 2]);
}

#[test]
fn rig_reset_restores_quiet_outputs() {
    let config = BusConfig {
        delivery: Delivery::Queued,
        ..Default::default()
    };
    let duty = DutyScheduler::default();
    let mut rig = Rig::new(&config, &duty);

    rig.slave_sample(40);
    rig.master_sample(90).unwrap();
    rig.poll_remote().unwrap();
    rig.settle().unwrap();
    assert_eq!(rig.pwm_tick().values(), [90, 0]);

    // Leave a command armed on the wire, then reset.
    rig.master_sample(91).unwrap();
    rig.reset();

    assert!(rig.wire().is_quiet());
    assert!(rig.master().initiator().is_idle());
    assert_eq!(rig.master().remote_reading(), None);
    assert!(!rig.slave().responder().has_pending_command());
    assert_eq!(rig.slave().responder().registers().value(0), 0);
    assert_eq!(duty.pending(Channel::Servo0), 0);
    assert_eq!(rig.pwm_tick().values(), [0, 0]);
    assert_eq!(rig.pwm_tick().values(), [0, 0]);

    // The link works again after the reset.
    rig.master_sample(12).unwrap();
    rig.settle().unwrap();
    assert_eq!(duty.pending(Channel::Servo0), 12);
}
