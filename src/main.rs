// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod startup;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();
    #[cfg(not(debug_assertions))]
    env_logger::init();

    let launch = startup::LaunchOptions::from_args(std::env::args_os().skip(1));
    log::debug!("Launch options: {:?}", launch);

    let app = AppWindow::new()?;
    let app_state = ui::AppState::new(&app, launch.session)?;

    // Setup all UI event handlers
    ui::setup_handlers(&app, &app_state);
    startup::configure_startup_opening(&app, &app_state, launch.folder);

    app.run()?;

    Ok(())
}
