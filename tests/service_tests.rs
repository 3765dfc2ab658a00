//! End-to-end control cycles through `HeaterService` with mock adapters.

mod common;

use common::{
    MockHeater, RecordingSink, ScriptedLine, corrupt_frame, encode_temperature, good_frame,
};
use dewguard::app::events::AppEvent;
use dewguard::app::service::HeaterService;
use dewguard::config::SystemConfig;
use dewguard::sensors::Dht22;

/// Config tightened for tests: no warm-up, 1 s sensor cadence.
fn test_config() -> SystemConfig {
    SystemConfig {
        sensor_warmup_ms: 0,
        sensor_refresh_ms: 1_000,
        ..SystemConfig::default()
    }
}

#[test]
fn cold_optics_drive_the_heater() {
    // 2.0 °C at 90 %RH → dew point ≈ 0.5 °C, setpoint ≈ 5.5 °C, so the
    // optics are below target and the heater must come on.
    let mut dht = Dht22::new(ScriptedLine::new([good_frame(900, 20)]));
    let mut heater = MockHeater::new();
    let mut sink = RecordingSink::new();
    let mut service = HeaterService::new(test_config());

    service.start(0, &mut sink);
    service.tick(1_000, &mut dht, &mut heater, &mut sink);

    assert!((service.pid().input() - 2.0).abs() < 1e-4);
    let setpoint = service.pid().setpoint();
    assert!((setpoint - 5.5).abs() < 0.2, "setpoint={setpoint}");
    assert!(heater.current_duty() > 0.0, "heater should be heating");
}

#[test]
fn warm_optics_keep_the_heater_off() {
    // 20 °C at 30 %RH → dew point ≈ 2 °C; optics far above setpoint.
    let mut dht = Dht22::new(ScriptedLine::new([good_frame(300, 200)]));
    let mut heater = MockHeater::new();
    let mut sink = RecordingSink::new();
    let mut service = HeaterService::new(test_config());

    service.start(0, &mut sink);
    service.tick(1_000, &mut dht, &mut heater, &mut sink);

    assert!((heater.current_duty() - 0.0).abs() < f32::EPSILON);
}

#[test]
fn failed_decode_reports_and_keeps_last_sample() {
    let mut line = ScriptedLine::new([good_frame(900, 20)]);
    line.push(common::LineScript::NoAck);
    line.push(corrupt_frame(900, 20, 3));
    let mut dht = Dht22::new(line);
    let mut heater = MockHeater::new();
    let mut sink = RecordingSink::new();
    let mut service = HeaterService::new(test_config());

    service.start(0, &mut sink);
    service.tick(1_000, &mut dht, &mut heater, &mut sink); // good frame
    let input_after_good = service.pid().input();

    service.tick(2_000, &mut dht, &mut heater, &mut sink); // no ack
    service.tick(3_000, &mut dht, &mut heater, &mut sink); // bad checksum

    use dewguard::error::SensorError;
    assert!(sink.contains(|e| matches!(e, AppEvent::SensorFault(SensorError::Timeout))));
    assert!(sink.contains(|e| matches!(e, AppEvent::SensorFault(SensorError::Checksum))));

    // Controller keeps working from the last good reading.
    assert!((service.pid().input() - input_after_good).abs() < f32::EPSILON);
    assert!(dht.last_sample().valid);
    assert!(heater.current_duty() > 0.0, "control continues on stale sample");
}

#[test]
fn zero_raw_field_does_not_update_the_controller() {
    let mut dht = Dht22::new(ScriptedLine::new([
        good_frame(900, 20),
        good_frame(0, 20), // checksum fine, humidity field zero
    ]));
    let mut heater = MockHeater::new();
    let mut sink = RecordingSink::new();
    let mut service = HeaterService::new(test_config());

    service.start(0, &mut sink);
    service.tick(1_000, &mut dht, &mut heater, &mut sink);
    let setpoint = service.pid().setpoint();

    service.tick(2_000, &mut dht, &mut heater, &mut sink);
    assert!(
        (service.pid().setpoint() - setpoint).abs() < f32::EPSILON,
        "setpoint must not move on an invalid sample"
    );
}

#[test]
fn autotune_through_the_service_applies_gains() {
    // Scripted ambient trace: 10 °C peak-to-peak sine, 60 s period, one
    // frame per second. Humidity constant.
    let mut scripts = Vec::new();
    for k in 0..600u64 {
        let t = k as f64;
        let celsius = 20.0 + 5.0 * (2.0 * std::f64::consts::PI * t / 60.0).sin();
        scripts.push(good_frame(500, encode_temperature(celsius as f32)));
    }
    let mut dht = Dht22::new(ScriptedLine::new(scripts));
    let mut heater = MockHeater::new();
    let mut sink = RecordingSink::new();
    let mut service = HeaterService::new(test_config());

    service.start(0, &mut sink);
    service.tick(50, &mut dht, &mut heater, &mut sink); // first sample lands
    service.pid_mut().set_output(40.0); // known relay baseline
    service.begin_autotune(50, &mut sink);
    assert!(service.autotune_active());
    assert!(service.pid().is_tuning());

    let defaults = service.pid().gains();
    let mut converged_at = None;
    for i in 2..=8_000u64 {
        let now_ms = i * 50;
        service.tick(now_ms, &mut dht, &mut heater, &mut sink);
        if !service.autotune_active() {
            converged_at = Some(now_ms);
            break;
        }
    }

    let converged_at = converged_at.expect("session should converge well inside 400 s");
    assert!(sink.contains(|e| matches!(e, AppEvent::AutotuneConverged(_))));
    assert!(!service.pid().is_tuning());

    // Ziegler–Nichols from the known oscillation: a = 10, d = 30.
    let ku = 4.0 * (2.0 * 30.0) / (10.0 * std::f32::consts::PI);
    let (kp, ki, kd) = service.pid().gains();
    assert_ne!((kp, ki, kd), defaults, "gains must change on convergence");
    assert!((kp - 0.6 * ku).abs() / (0.6 * ku) < 0.05, "kp={kp}");
    assert!((ki - 1.2 * ku / 60.0).abs() / (1.2 * ku / 60.0) < 0.05, "ki={ki}");
    assert!((kd - 0.075 * ku * 60.0).abs() / (0.075 * ku * 60.0) < 0.05, "kd={kd}");

    assert!(converged_at > 60_000, "needs several full oscillations");
}

#[test]
fn autotune_timeout_restores_heater_baseline() {
    // Constant ambient: the relay never sees the input leave the noise
    // band, no oscillation develops, and the session must hit its deadline.
    let mut line = ScriptedLine::new([good_frame(500, 200)]);
    line.repeat_last = true;
    let mut dht = Dht22::new(line);
    let mut heater = MockHeater::new();
    let mut sink = RecordingSink::new();
    let mut service = HeaterService::new(test_config());

    service.start(0, &mut sink);
    service.tick(50, &mut dht, &mut heater, &mut sink);
    service.pid_mut().set_output(40.0);
    service.begin_autotune(50, &mut sink);
    let defaults = service.pid().gains();

    for i in 2..=20_000u64 {
        service.tick(i * 50, &mut dht, &mut heater, &mut sink);
        if !service.autotune_active() {
            break;
        }
    }

    assert!(sink.contains(|e| matches!(e, AppEvent::AutotuneTimedOut)));
    assert!(!sink.contains(|e| matches!(e, AppEvent::AutotuneConverged(_))));
    assert_eq!(service.pid().gains(), defaults);
    assert!(
        (heater.current_duty() - 40.0).abs() < f32::EPSILON,
        "pre-session output restored exactly"
    );
}

#[test]
fn telemetry_is_emitted_on_its_cadence() {
    let mut line = ScriptedLine::new([good_frame(500, 200)]);
    line.repeat_last = true;
    let mut dht = Dht22::new(line);
    let mut heater = MockHeater::new();
    let mut sink = RecordingSink::new();
    let mut service = HeaterService::new(test_config());

    service.start(0, &mut sink);
    let interval = u64::from(service.config().telemetry_interval_ticks);
    for i in 1..=(interval * 3) {
        service.tick(i * 1_000, &mut dht, &mut heater, &mut sink);
    }

    let telem = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::Telemetry(_)))
        .count();
    assert_eq!(telem, 3);
}
