//! Fuzz target: request decoding and interpretation
//!
//! Feeds arbitrary datagrams through `GpioService::handle` against the
//! simulated pin bank and asserts that every input yields a reply that
//! fits the reply buffer.
//!
//! cargo fuzz run fuzz_request_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinrelay::adapters::log_sink::LogEventSink;
use pinrelay::adapters::power::DisabledPower;
use pinrelay::adapters::sim_gpio::SimGpio;
use pinrelay::app::commands::{self, REPLY_CAPACITY};
use pinrelay::app::service::GpioService;
use pinrelay::roles::{PinRoleTable, Role, RoleSet};

fuzz_target!(|data: &[u8]| {
    // Decoding alone must be total.
    let _ = commands::decode(data);

    let mut table = PinRoleTable::new();
    table.assign(Role::Output, RoleSet::from([0, 4, 17, 31]));
    let mut service = GpioService::new(table);
    let mut gpio = SimGpio::new();

    let reply = service.handle(data, &mut gpio, &mut DisabledPower, &mut LogEventSink::new());
    assert!(!reply.is_empty(), "every request gets a reply");
    assert!(reply.len() <= REPLY_CAPACITY);
});
