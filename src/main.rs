use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    audioproof::cli::run()
}
