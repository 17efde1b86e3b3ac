use log::error;
use rocket_science::config::SimulationConfig;
use rocket_science::wgpu_window::run_wgpu_window;

fn main() {
    env_logger::init();

    let config = SimulationConfig::default();
    if let Err(e) = run_wgpu_window(config) {
        error!("{}", e);
        std::process::exit(1);
    }
}
