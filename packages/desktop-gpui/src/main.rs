//! Mahlzeit Desktop - GPUI meal logging application
//!
//! Native desktop interface for the Mahlzeit AI meal log. Meals are
//! captured through a chat with the generation backend, which turns
//! free-form descriptions into structured entries.

mod api;
mod app;
mod components;
mod config;
mod state;
mod theme;
mod views;

use anyhow::Result;
use gpui::prelude::*;
use gpui::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mahlzeit Desktop");

    let config = config::Config::load();

    // Initialize GPUI application
    Application::new().run(move |cx: &mut App| {
        // Initialize state management
        state::init(cx, &config);

        // Initialize theme system (also sets global Theme)
        theme::init(cx, &config.theme);

        // Initialize API client
        api::init(cx, &config.backend_url);

        // Open the main window
        cx.open_window(
            WindowOptions {
                titlebar: Some(TitlebarOptions {
                    title: Some("Mahlzeit".into()),
                    appears_transparent: true,
                    ..Default::default()
                }),
                window_bounds: Some(WindowBounds::Windowed(Bounds {
                    origin: point(px(100.0), px(100.0)),
                    size: size(px(480.0), px(800.0)),
                })),
                ..Default::default()
            },
            |_window, cx| cx.new(|cx| app::AppRoot::new(cx)),
        )
        .unwrap();

        tracing::info!("Mahlzeit Desktop window opened");
    });

    Ok(())
}
