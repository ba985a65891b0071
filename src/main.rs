fn main() {
    if let Err(err) = stay_recon::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
