//! Pin numbering for the Raspberry Pi header.
//!
//! Single source of truth for pin identifiers: the protocol, the role
//! table and the hardware backends all reference this module rather than
//! hard-coding numbers.
//!
//! Pin identifiers use the wiringPi numbering scheme.  The sysfs backend
//! translates them to BCM line numbers with [`bcm_line`].

// ---------------------------------------------------------------------------
// Identifier space
// ---------------------------------------------------------------------------

/// Number of addressable pin identifiers (0–31).
pub const PIN_COUNT: u8 = 32;

/// Operand value meaning "every pin".  Only valid as a request operand;
/// never stored in a role set.
pub const ALL_PINS: u8 = 32;

/// Highest operand value accepted by the read/state queries.
pub const MAX_OPERAND: u8 = ALL_PINS;

/// Whether `pin` names a single addressable line.
pub const fn is_addressable(pin: u8) -> bool {
    pin < PIN_COUNT
}

// ---------------------------------------------------------------------------
// Header pins reported by the all-pins state query
// ---------------------------------------------------------------------------

/// Pins broken out on the 40-pin header, in reply order for `SX32`.
pub const HEADER_PINS: [u8; 17] = [
    0, 1, 2, 3, 4, 5, 6, 7, 21, 22, 23, 24, 25, 26, 27, 28, 29,
];

// ---------------------------------------------------------------------------
// wiringPi → BCM translation
// ---------------------------------------------------------------------------

/// BCM line for each wiringPi pin.  17–20 are the P5 header of rev-2
/// boards; the lines exist on every SoC, so they are always mapped.
const WPI_TO_BCM: [u8; PIN_COUNT as usize] = [
    17,  // 0
    18,  // 1
    27,  // 2
    22,  // 3
    23,  // 4
    24,  // 5
    25,  // 6
    4,   // 7
    2,   // 8  SDA
    3,   // 9  SCL
    8,   // 10 CE0
    7,   // 11 CE1
    10,  // 12 MOSI
    9,   // 13 MISO
    11,  // 14 SCLK
    14,  // 15 TXD
    15,  // 16 RXD
    28,  // 17 P5
    29,  // 18 P5
    30,  // 19 P5
    31,  // 20 P5
    5,   // 21
    6,   // 22
    13,  // 23
    19,  // 24
    26,  // 25
    12,  // 26
    16,  // 27
    20,  // 28
    21,  // 29
    0,   // 30 ID_SD
    1,   // 31 ID_SC
];

/// BCM line number for a wiringPi pin; `None` for identifiers past 31.
pub fn bcm_line(pin: u8) -> Option<u8> {
    WPI_TO_BCM.get(pin as usize).copied()
}
