use airlock::{app::AirlockApp, config::EndpointConfig};
use eframe::{egui, NativeOptions};
use std::env;

fn main() -> eframe::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("airlock-clinician {}", env!("AIRLOCK_DISPLAY_VERSION"));
        return Ok(());
    }

    // An optional bare argument is the genome database host.
    let genome_db_ip = args.iter().find(|a| !a.starts_with('-')).cloned();
    let mut config = EndpointConfig::load();
    if let Some(ip) = genome_db_ip {
        config = config.with_genome_db_ip(&ip);
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Airlock Clinician",
        options,
        Box::new(move |_cc| Ok(Box::new(AirlockApp::new(config)?))),
    )
}
