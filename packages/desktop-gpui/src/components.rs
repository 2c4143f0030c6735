//! Reusable UI components for Mahlzeit Desktop

pub mod button;
pub mod chat_input;
