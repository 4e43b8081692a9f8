//! Core engine functionality

pub mod entity;
