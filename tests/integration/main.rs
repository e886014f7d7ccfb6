//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one subsystem against
//! the mock adapters in `mock_hw`.  No real pins or sockets are used.

mod interpreter_tests;
mod mock_hw;
mod server_tests;
