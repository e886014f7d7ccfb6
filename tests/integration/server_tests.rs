//! Request loop over a scripted transport: replies, reload, shutdown.

use pinrelay::app::events::AppEvent;
use pinrelay::app::service::GpioService;
use pinrelay::control::Control;
use pinrelay::error::ConfigError;
use pinrelay::roles::{PinRoleTable, directive};
use pinrelay::server::{Poll, Server, ServerOptions};

use crate::mock_hw::{Inbound, LogSink, MockConfig, MockGpio, MockPower, MockTransport};

type TestServer = Server<MockTransport, MockGpio, MockPower, MockConfig, LogSink>;

fn table(conf: &str) -> PinRoleTable {
    directive::parse(conf).unwrap().table
}

fn server(transport: MockTransport, config: MockConfig) -> TestServer {
    let control = Control::new();
    let mut transport = transport;
    transport.on_drained = Some(control.clone());
    Server {
        transport,
        gpio: MockGpio::new(),
        power: MockPower::disabled(),
        config,
        sink: LogSink::new(),
        service: GpioService::new(table("pins-out=4\n")),
        control,
        options: ServerOptions::default(),
    }
}

#[test]
fn answers_each_datagram_in_order() {
    let mut s = server(
        MockTransport::new(&["GX041", "IX04", "GX051", "XX00"]),
        MockConfig::new(),
    );
    assert_eq!(s.run(), 4);
    assert_eq!(s.transport.replies(), ["4 1", "4 1", "-1", "OK"]);

    // One reply per request, each to the peer that asked.
    let peers: Vec<u32> = s.transport.sent.iter().map(|(_, p)| *p).collect();
    assert_eq!(peers, [1, 2, 3, 4]);
    assert!(s.transport.sent.iter().all(|(d, _)| d.last() == Some(&0)));

    assert!(matches!(s.sink.events.first(), Some(AppEvent::Started { .. })));
    assert_eq!(
        s.sink.events.last(),
        Some(&AppEvent::Stopped { requests: 4 })
    );
}

#[test]
fn send_failure_does_not_stop_the_loop() {
    let mut transport = MockTransport::new(&["GX041", "GX040"]);
    transport.failing_sends = 1;
    let mut s = server(transport, MockConfig::new());
    assert_eq!(s.run(), 2);
    assert_eq!(s.transport.replies(), ["4 0"]);
    assert_eq!(s.gpio.level(4), pinrelay::app::ports::PinState::Low);
}

#[test]
fn receive_errors_and_timeouts_are_survived() {
    let mut transport = MockTransport::new(&[]);
    transport.inbox.push_back(Inbound::Timeout);
    transport.inbox.push_back(Inbound::Error);
    transport.inbox.push_back(Inbound::Datagram(b"XX00".to_vec()));
    let mut s = server(transport, MockConfig::new());

    assert_eq!(s.poll_once(), Poll::Idle);
    assert_eq!(s.poll_once(), Poll::Idle);
    assert_eq!(s.poll_once(), Poll::Served);
    assert_eq!(s.transport.replies(), ["OK"]);
}

#[test]
fn oversized_datagram_is_truncated_not_fatal() {
    let long = "GX041".to_string() + &"9".repeat(200);
    let mut s = server(MockTransport::new(&[&long]), MockConfig::new());
    assert_eq!(s.poll_once(), Poll::Served);
    assert_eq!(s.transport.replies(), ["4 1"]);
}

#[test]
fn reload_replaces_the_table_between_requests() {
    let config = MockConfig::new().then(Ok(table("pins-out=5\n")));
    let mut s = server(MockTransport::new(&["GX041", "GX051"]), config);

    assert_eq!(s.poll_once(), Poll::Served);
    s.control.request_reload();
    assert_eq!(s.poll_once(), Poll::Served);
    assert_eq!(s.transport.replies(), ["4 1", "5 1"]);
    assert!(!s.service.roles().is_output(4));
    assert!(
        s.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::ConfigReloaded(c) if c.out == 1))
    );
}

#[test]
fn failed_reload_keeps_previous_table() {
    let config = MockConfig::new().then(Err(ConfigError::ConflictingLevel { pin: 4 }));
    let mut s = server(MockTransport::new(&["GX041"]), config);
    s.control.request_reload();
    assert_eq!(s.poll_once(), Poll::Served);
    assert_eq!(s.transport.replies(), ["4 1"]);
    assert!(s.service.roles().is_output(4));
    assert!(
        s.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::ConfigReloadFailed(_)))
    );
}

#[test]
fn reload_does_not_reapply_forced_levels() {
    let config = MockConfig::new().then(Ok(table("pins-out=4\npins-high=4\n")));
    let mut s = server(MockTransport::new(&[]), config);
    s.control.request_reload();
    s.poll_once();
    assert_eq!(s.gpio.mutations(), 0);
}

#[test]
fn shutdown_is_honoured_before_the_next_datagram() {
    let mut s = server(MockTransport::new(&["XX00", "XX00"]), MockConfig::new());
    assert_eq!(s.poll_once(), Poll::Served);
    s.control.request_shutdown();
    assert_eq!(s.poll_once(), Poll::Stop);
    assert_eq!(s.transport.inbox.len(), 1);
}

#[test]
fn bare_replies_without_nul() {
    let mut s = server(MockTransport::new(&["XX00"]), MockConfig::new());
    s.options.nul_terminate = false;
    s.run();
    assert_eq!(s.transport.sent[0].0, b"OK");
}
