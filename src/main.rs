use eframe::egui;
use measurer::app::Measurer;
use measurer::config::MeasureOptions;

fn main() -> eframe::Result {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Measurer v{} starting", env!("CARGO_PKG_VERSION"));

    let options = MeasureOptions::load_from_file(&MeasureOptions::config_path());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(options.window_size)
            .with_title("Measurer")
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Measurer",
        native_options,
        Box::new(|cc| Ok(Box::new(Measurer::new(cc, options)))),
    )
}
