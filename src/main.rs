fn main() {
    if let Err(e) = sozlesme::run() {
        eprintln!("sozlesme: {e}");
        std::process::exit(1);
    }
}
