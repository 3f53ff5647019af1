use anyhow::Result;
use clap::Parser;
use mood_icon_gen::icon_gen::{generate_icons, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    generate_icons(args)?;
    Ok(())
}
