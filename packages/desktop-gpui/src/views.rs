//! View modules for Mahlzeit Desktop

pub mod chat;
