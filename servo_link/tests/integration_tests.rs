//! Integration tests for the servo link.
//!
//! These tests exercise the engines together over the simulated bus: full
//! write and read transactions, the path from a master sample to a slave
//! compare register, reinitialisation and configuration files.

mod integration;
