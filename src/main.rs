fn main() {
    std::process::exit(reporank::app::startup::startup());
}
