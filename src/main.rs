fn main() {
    sparqlfmt::cli::run();
}
