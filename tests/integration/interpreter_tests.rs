//! Request → reply behaviour of `GpioService` against a recording GPIO.

use pinrelay::app::events::{AppEvent, PowerAction};
use pinrelay::app::ports::{Direction, PinState};
use pinrelay::app::service::GpioService;
use pinrelay::roles::directive;

use crate::mock_hw::{GpioCall, LogSink, MockGpio, MockPower};

struct Rig {
    service: GpioService,
    gpio: MockGpio,
    power: MockPower,
    sink: LogSink,
}

impl Rig {
    fn new(conf: &str) -> Self {
        let report = directive::parse(conf).expect("valid configuration");
        Self {
            service: GpioService::new(report.table),
            gpio: MockGpio::new(),
            power: MockPower::disabled(),
            sink: LogSink::new(),
        }
    }

    fn ask(&mut self, request: &str) -> String {
        self.service
            .handle(
                request.as_bytes(),
                &mut self.gpio,
                &mut self.power,
                &mut self.sink,
            )
            .to_string()
    }
}

// ── Set / toggle ──────────────────────────────────────────────

#[test]
fn set_low_high_toggle_on_output_pin() {
    let mut rig = Rig::new("pins-out=4,17,21\n");
    assert_eq!(rig.ask("GX040"), "4 0");
    assert_eq!(rig.gpio.level(4), PinState::Low);
    assert_eq!(rig.ask("GX041"), "4 1");
    assert_eq!(rig.gpio.level(4), PinState::High);
    assert_eq!(rig.ask("GX042"), "4 0");
    assert_eq!(rig.gpio.level(4), PinState::Low);
    assert_eq!(rig.ask("GX172"), "17 1");
}

#[test]
fn toggle_reads_then_writes_then_reads_back() {
    let mut rig = Rig::new("pins-out=21\n");
    rig.gpio.set_level(21, PinState::High);
    assert_eq!(rig.ask("GX212"), "21 0");
    assert_eq!(
        rig.gpio.calls,
        vec![
            GpioCall::ReadLevel { pin: 21 },
            GpioCall::WriteLevel {
                pin: 21,
                level: PinState::Low
            },
            GpioCall::ReadLevel { pin: 21 },
        ]
    );
}

#[test]
fn set_on_pin_outside_out_writes_nothing() {
    let mut rig = Rig::new("pins-out=4\npins-in=5\npins-high=6\n");
    for request in ["GX051", "GX061", "GX072", "GX311", "GX991"] {
        assert_eq!(rig.ask(request), "-1", "{request}");
    }
    assert!(rig.gpio.calls.is_empty());
    assert_eq!(rig.service.rejected_count(), 5);
}

#[test]
fn empty_table_authorizes_nothing() {
    let mut rig = Rig::new("");
    assert_eq!(rig.ask("GX001"), "-1");
    assert_eq!(rig.gpio.mutations(), 0);
}

#[test]
fn bad_set_action_is_rejected() {
    let mut rig = Rig::new("pins-out=4\n");
    assert_eq!(rig.ask("GX043"), "-1");
    assert_eq!(rig.ask("GX04x"), "-1");
    assert_eq!(rig.ask("GX04"), "-1");
    assert!(rig.gpio.calls.is_empty());
}

#[test]
fn backend_failure_becomes_error_reply() {
    let mut rig = Rig::new("pins-out=4\n");
    rig.gpio.failing_pin = Some(4);
    assert_eq!(rig.ask("GX041"), "-1");
    assert_eq!(rig.ask("IX04"), "-1");
}

// ── Reads ─────────────────────────────────────────────────────

#[test]
fn read_single_pin_regardless_of_role() {
    let mut rig = Rig::new("pins-in=5\n");
    rig.gpio.set_level(5, PinState::High);
    assert_eq!(rig.ask("IX05"), "5 1");
    assert_eq!(rig.ask("IX09"), "9 0");
    assert_eq!(rig.gpio.mutations(), 0);
}

#[test]
fn read_all_returns_thirty_two_digits() {
    let mut rig = Rig::new("");
    rig.gpio.set_level(0, PinState::High);
    rig.gpio.set_level(31, PinState::High);
    let reply = rig.ask("IX32");
    assert_eq!(reply.len(), 32);
    assert!(reply.chars().all(|c| c == '0' || c == '1'));
    assert!(reply.starts_with('1'));
    assert!(reply.ends_with('1'));
    assert_eq!(reply.matches('1').count(), 2);
}

#[test]
fn read_out_of_range_is_rejected() {
    let mut rig = Rig::new("");
    assert_eq!(rig.ask("IX33"), "-1");
    assert_eq!(rig.ask("IXab"), "-1");
    assert!(rig.gpio.calls.is_empty());
}

// ── State ─────────────────────────────────────────────────────

#[test]
fn state_single_pin() {
    let mut rig = Rig::new("");
    rig.gpio.set_direction(3, Direction::Output);
    rig.gpio.set_direction(15, Direction::Alternate);
    assert_eq!(rig.ask("SX03"), "3 O");
    assert_eq!(rig.ask("SX15"), "15 O");
    assert_eq!(rig.ask("SX04"), "4 I");
}

#[test]
fn state_all_reports_header_pins() {
    let mut rig = Rig::new("");
    rig.gpio.set_direction(0, Direction::Output);
    rig.gpio.set_direction(29, Direction::Output);
    let reply = rig.ask("SX32");
    assert_eq!(reply.len(), 17);
    assert!(reply.chars().all(|c| c == 'O' || c == 'I'));
    assert_eq!(reply, "OIIIIIIIIIIIIIIIO");

    let queried: Vec<u8> = rig
        .gpio
        .calls
        .iter()
        .filter_map(|c| match c {
            GpioCall::ReadDirection { pin } => Some(*pin),
            _ => None,
        })
        .collect();
    assert_eq!(queried, pinrelay::pins::HEADER_PINS.to_vec());
}

// ── Framing ───────────────────────────────────────────────────

#[test]
fn malformed_requests_reply_error() {
    let mut rig = Rig::new("pins-out=4\n");
    for request in ["", "G", "GY041", "IY04", "ZX04", "gx041", "I", "S"] {
        assert_eq!(rig.ask(request), "-1", "{request:?}");
    }
    assert!(rig.gpio.calls.is_empty());
}

#[test]
fn line_terminators_are_tolerated() {
    let mut rig = Rig::new("pins-out=4\n");
    assert_eq!(rig.ask("GX041\n"), "4 1");
    assert_eq!(rig.ask("IX04\r\n"), "4 1");
}

// ── Ping / power ──────────────────────────────────────────────

#[test]
fn ping_has_no_side_effects() {
    let mut rig = Rig::new("pins-out=4\n");
    assert_eq!(rig.ask("XX00"), "OK");
    assert_eq!(rig.ask("XX"), "OK");
    assert!(rig.gpio.calls.is_empty());
    assert!(rig.sink.events.is_empty());
}

#[test]
fn power_requests_run_when_enabled() {
    let mut rig = Rig::new("");
    rig.power = MockPower::enabled();
    assert_eq!(rig.ask("XX50"), "OK");
    assert_eq!(rig.ask("XX70"), "OK");
    assert_eq!(rig.power.restarts, 1);
    assert_eq!(rig.power.shutdowns, 1);
    assert_eq!(
        rig.sink.events,
        vec![
            AppEvent::PowerRequested {
                action: PowerAction::Restart,
                executed: true
            },
            AppEvent::PowerRequested {
                action: PowerAction::Shutdown,
                executed: true
            },
        ]
    );
}

#[test]
fn power_requests_refused_when_disabled() {
    let mut rig = Rig::new("");
    assert_eq!(rig.ask("XX50"), "OK");
    assert_eq!(rig.ask("XX70"), "OK");
    assert_eq!(rig.power.restarts, 0);
    assert_eq!(rig.power.shutdowns, 0);
    assert!(rig.sink.events.iter().all(|e| matches!(
        e,
        AppEvent::PowerRequested {
            executed: false,
            ..
        }
    )));
}
