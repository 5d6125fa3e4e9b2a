//! Core EQ domain: filter design, runtime chains, parameters, presets

pub mod domain;
