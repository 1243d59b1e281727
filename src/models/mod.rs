mod serial_code;

pub use serial_code::*;
