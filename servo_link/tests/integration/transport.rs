//! Integration test: bus transactions between the two engines.

use servo_common::bus::{Address, BusEvent, Command, Encoding, StatusDecoder, StatusFlags};
use servo_common::config::{BusConfig, Delivery};

use servo_link::bus::{BusAction, CommandHandler, Initiator, InitiatorState, RecordingPort, Responder};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Log(Vec<(u8, u8)>);

impl CommandHandler for Log {
    fn on_command(&mut self, address: u8, value: u8) {
        self.0.push((address, value));
    }
}

/// Translate the initiator's recorded operations into the status snapshots
/// a responder peripheral would raise for them.
fn replay(actions: &[BusAction], responder: &mut Responder<Log>, slave_port: &mut RecordingPort) {
    let mut decoder = StatusDecoder::new();
    let mut after_start = false;
    let mut reading = false;
    for action in actions {
        let (status, byte) = match *action {
            BusAction::Start => {
                after_start = true;
                continue;
            }
            BusAction::Write(b) if after_start => {
                after_start = false;
                reading = b & 1 == 1;
                let mut s = StatusFlags::S | StatusFlags::BF;
                if reading {
                    s |= StatusFlags::RW;
                }
                (s, b)
            }
            BusAction::Write(b) => (StatusFlags::S | StatusFlags::BF | StatusFlags::DA, b),
            BusAction::Stop => (StatusFlags::P, 0),
            _ => continue,
        };
        for event in decoder.decode(status, byte) {
            responder.step(event, slave_port);
        }
    }
}

fn drive_to_idle(init: &mut Initiator<Log>, port: &mut RecordingPort) {
    for _ in 0..64 {
        if init.state() == InitiatorState::Idle {
            return;
        }
        init.step(port);
    }
    panic!("initiator did not return to idle");
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn write_transaction_is_one_start_two_bytes_one_stop() {
    let mut init: Initiator<Log> = Initiator::new(Encoding::TwoByte);
    let mut port = RecordingPort::new();

    init.submit(&Command::new(Address::WriteServo1, 150), &mut port).unwrap();
    drive_to_idle(&mut init, &mut port);

    assert_eq!(
        port.actions(),
        &[
            BusAction::Start,
            BusAction::Write(0b0000_1110),
            BusAction::Write(150),
            BusAction::Stop,
        ]
    );
}

#[test]
fn initiator_bytes_reach_responder_handler() {
    let mut init: Initiator<Log> = Initiator::new(Encoding::TwoByte);
    let mut master_port = RecordingPort::new();
    init.submit(&Command::new(Address::WriteServo0, 10), &mut master_port).unwrap();
    init.submit(&Command::new(Address::WriteServo1, 20), &mut master_port).unwrap();
    drive_to_idle(&mut init, &mut master_port);

    let mut responder = Responder::new(&BusConfig::default());
    responder.set_command_handler(Log::default());
    let mut slave_port = RecordingPort::new();
    replay(master_port.actions(), &mut responder, &mut slave_port);

    assert_eq!(responder.stats().commands, 2);
    assert_eq!(responder.stats().transactions, 2);
    assert!(slave_port.actions().is_empty());
}

#[test]
fn three_byte_encoding_end_to_end() {
    let config = BusConfig {
        encoding: Encoding::ThreeByte,
        delivery: Delivery::Queued,
        ..Default::default()
    };
    let mut init: Initiator<Log> = Initiator::new(config.encoding);
    let mut master_port = RecordingPort::new();
    init.submit(&Command::new(Address::WriteServo1, 42), &mut master_port).unwrap();
    drive_to_idle(&mut init, &mut master_port);
    assert_eq!(master_port.written(), vec![0x0E, 65, 42]);

    let mut responder: Responder<Log> = Responder::new(&config);
    let mut slave_port = RecordingPort::new();
    replay(master_port.actions(), &mut responder, &mut slave_port);

    let cmd = responder.take_pending_command().unwrap();
    assert_eq!(cmd.address(), 1);
    assert_eq!(cmd.raw_kind(), Some(65));
    assert_eq!(cmd.value(), 42);
}

#[test]
fn read_transaction_returns_exposed_value() {
    let mut responder: Responder<Log> = Responder::new(&BusConfig::default());
    responder.expose_value(0, 99);
    let mut slave_port = RecordingPort::new();
    responder.step(BusEvent::StartSeen, &mut slave_port);
    responder.step(BusEvent::ByteReadyRead(Address::ReadPotentiometer.raw()), &mut slave_port);
    let supplied = slave_port.written();
    assert_eq!(supplied, vec![99]);

    let mut init = Initiator::new(Encoding::TwoByte);
    init.set_command_handler(Log::default());
    let mut master_port = RecordingPort::new();
    master_port.push_read(supplied[0]);
    init.submit(&Command::read(Address::ReadPotentiometer), &mut master_port).unwrap();
    drive_to_idle(&mut init, &mut master_port);

    assert_eq!(master_port.count(BusAction::Nack), 1);
    assert_eq!(init.handler().map(|h| h.0.clone()), Some(vec![(0x0D, 99)]));
}

#[test]
fn local_address_decoding() {
    let mut responder = Responder::new(&BusConfig::default());
    responder.set_command_handler(Log::default());
    let mut port = RecordingPort::new();
    for raw in [0b0000_1100u8, 0b0000_1110] {
        responder.step(BusEvent::StartSeen, &mut port);
        responder.step(BusEvent::ByteReadyWrite(raw), &mut port);
        assert_eq!(responder.local_address(), (raw >> 1) & 1);
        responder.step(BusEvent::StopSeen, &mut port);
    }
}
