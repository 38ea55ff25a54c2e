fn main() {
    yoink::run_cli();
}
