mod cli;
mod config;
mod display;
mod plot;

fn main() {
    if let Err(err) = cli::run() {
        display::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
