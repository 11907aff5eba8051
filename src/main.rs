fn main() -> Result<(), Box<dyn std::error::Error>> {
    chairchat::cli::main()
}
