use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    banter::cli::main()
}
