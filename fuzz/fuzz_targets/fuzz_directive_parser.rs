//! Fuzz target: `directive::parse`
//!
//! Arbitrary configuration text must never panic the parser, and any
//! table it accepts must hold only addressable pins and pass validation.
//!
//! cargo fuzz run fuzz_directive_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinrelay::pins::is_addressable;
use pinrelay::roles::{Role, directive};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(report) = directive::parse(text) {
        for role in [Role::Output, Role::Input, Role::High, Role::Low] {
            assert!(report.table.get(role).iter().all(is_addressable));
        }
        assert!(report.table.validate().is_ok());
    }
});
