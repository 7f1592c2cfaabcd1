fn main() {
    if let Err(err) = payment_dashboard::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
