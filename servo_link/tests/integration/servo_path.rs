//! Integration test: master sample to slave compare register.
//!
//! Runs both boards over the simulated bus and checks what the slave's PWM
//! timer loads, period by period.

use servo_common::bus::Encoding;
use servo_common::config::{BusConfig, Delivery};

use servo_link::duty::{Channel, DutyScheduler};
use servo_link::sim::Rig;

fn configs() -> Vec<BusConfig> {
    let mut out = Vec::new();
    for encoding in [Encoding::TwoByte, Encoding::ThreeByte] {
        for delivery in [Delivery::Synchronous, Delivery::Queued] {
            out.push(BusConfig {
                encoding,
                delivery,
                ..Default::default()
            });
        }
    }
    out
}

#[test]
fn sample_lands_on_selected_channel() {
    for config in configs() {
        let duty = DutyScheduler::new(config.pwm_period);
        let mut rig = Rig::new(&config, &duty);

        rig.master_sample(120).unwrap();
        rig.settle().unwrap();
        rig.select_target(Channel::Servo1);
        rig.master_sample(80).unwrap();
        rig.settle().unwrap();

        assert_eq!(duty.pending(Channel::Servo0), 120, "{config:?}");
        assert_eq!(duty.pending(Channel::Servo1), 80, "{config:?}");

        assert_eq!(rig.pwm_tick().values(), [120, 0]);
        assert_eq!(rig.pwm_tick().values(), [0, 80]);
    }
}

#[test]
fn compare_never_exceeds_period() {
    let config = BusConfig {
        pwm_period: 150,
        ..Default::default()
    };
    let duty = DutyScheduler::new(config.pwm_period);
    let mut rig = Rig::new(&config, &duty);
    rig.master_sample(255).unwrap();
    rig.settle().unwrap();
    assert_eq!(rig.pwm_tick().get(Channel::Servo0), 150);
}

#[test]
fn outputs_alternate_and_never_overlap() {
    let duty = DutyScheduler::default();
    let mut rig = Rig::new(&BusConfig::default(), &duty);
    rig.master_sample(30).unwrap();
    rig.select_target(Channel::Servo1);
    rig.master_sample(60).unwrap();
    rig.settle().unwrap();

    let mut served = [0u32; 2];
    for tick in 0..20 {
        let [a, b] = rig.pwm_tick().values();
        assert!(a == 0 || b == 0, "tick {tick}: both outputs driven");
        served[0] += u32::from(a == 30);
        served[1] += u32::from(b == 60);
    }
    assert_eq!(served, [10, 10]);
}

#[test]
fn remote_potentiometer_is_read_back() {
    let duty = DutyScheduler::default();
    let mut rig = Rig::new(&BusConfig::default(), &duty);
    rig.slave_sample(211);
    rig.poll_remote().unwrap();
    rig.settle().unwrap();
    assert_eq!(rig.master().remote_reading(), Some(211));

    rig.slave_sample(17);
    rig.poll_remote().unwrap();
    rig.settle().unwrap();
    assert_eq!(rig.master().remote_reading(), Some(17));
}

#[test]
fn mixed_traffic_in_one_burst() {
    let duty = DutyScheduler::default();
    let config = BusConfig {
        encoding: Encoding::ThreeByte,
        ..Default::default()
    };
    let mut rig = Rig::new(&config, &duty);
    rig.slave_sample(5);
    rig.master_sample(11).unwrap();
    rig.poll_remote().unwrap();
    rig.select_target(Channel::Servo1);
    rig.master_sample(22).unwrap();
    let carried = rig.settle().unwrap();

    assert!(carried > 0);
    assert!(rig.wire().is_quiet());
    assert_eq!(duty.pending(Channel::Servo0), 11);
    assert_eq!(duty.pending(Channel::Servo1), 22);
    assert_eq!(rig.master().remote_reading(), Some(5));
    assert_eq!(rig.slave().responder().stats().transactions, 3);
    assert_eq!(rig.slave().responder().stats().desync_count, 0);
}
