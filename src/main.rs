fn main() {
    tspi::cli::run();
}
