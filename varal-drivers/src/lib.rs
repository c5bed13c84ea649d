//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in varal-core, on top of `embedded-hal` 1.0 pins:
//!
//! - Stepper output (ULN2003 four-coil darlington driver)
//! - Reference switch (mechanical end-stop)
//! - Rain sensor (analog plate with comparator output)

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;
pub mod stepper;
