fn main() {
    if let Err(err) = routeway::cli::run_cli() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
