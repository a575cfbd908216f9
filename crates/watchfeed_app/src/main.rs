mod platform;

fn main() {
    std::process::exit(platform::run_app());
}
