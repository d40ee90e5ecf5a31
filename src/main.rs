use dict_container::decode_container;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-container-file>", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];
    println!("Reading container file: {}", path);
    println!("{}", "=".repeat(60));

    match decode_container(path) {
        Ok(decoded) => {
            println!("\nDictionary Information:");
            println!("  Title: {}", decoded.header.title);
            println!("  Engine version: {}", decoded.header.engine_version);
            println!("  Encoding: {}", decoded.header.encoding.name());
            if let Some(desc) = &decoded.header.description {
                println!("  Description: {}", desc);
            }

            println!("\nStatistics:");
            println!("  Total key entries: {}", decoded.entries.len());
            println!("  Key-block segments: {}", decoded.segments.len());
            println!(
                "  Key-block region: {} bytes compressed",
                decoded.meta.key_blocks_bytes_len
            );

            println!("\nSample Key Entries (first 10):");
            for (i, entry) in decoded.entries.iter().take(10).enumerate() {
                println!("  {}. [{}] {}", i + 1, entry.id, entry.text);
            }
            if decoded.entries.len() > 10 {
                println!("  ... and {} more", decoded.entries.len() - 10);
            }
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to decode container file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
