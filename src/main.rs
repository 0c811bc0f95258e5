fn main() {
    if let Err(err) = funnelwatch_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
