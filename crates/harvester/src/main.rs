use harvester::runtime::{boot, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let config = boot::boot()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    run::run(&config, &args)
}
