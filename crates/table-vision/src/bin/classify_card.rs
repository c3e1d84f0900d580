//! CLI tool to run a saved card crop through both classifier stages.
//! Usage: cargo run --bin classify_card --features cli -- <cards_dir> <crop.png>

use std::path::PathBuf;
use table_vision::CardMatcher;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <cards_dir> <crop.png>", args[0]);
        std::process::exit(1);
    }

    let cards_dir = PathBuf::from(&args[1]);
    let crop_path = PathBuf::from(&args[2]);

    let matcher = CardMatcher::load(&cards_dir).expect("failed to load card catalog");
    println!("Catalog: {} templates", matcher.template_count());

    let crop = image::open(&crop_path)
        .expect("failed to open crop")
        .to_rgba8();
    println!("Crop: {}x{}", crop.width(), crop.height());

    match matcher.hash_lookup(&crop) {
        Some(code) => println!("Hash stage: {code}"),
        None => {
            println!("Hash stage: miss");
            println!("Nearest-neighbor stage: {}", matcher.nearest_match(&crop));
        }
    }
}
