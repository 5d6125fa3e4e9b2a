//! Infrastructure: CPAL streams, lock-free transport, engine wiring

pub mod audio;
