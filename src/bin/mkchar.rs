// Each tool uses a different slice of the shared charset module.
#[path = "../charset.rs"]
#[allow(dead_code)]
mod charset;

use std::env;
use std::fs;
use std::process;

// Character ROM builder.
// Usage:
//   cargo run --bin mkchar -- --atlas font.txt -o charset.bin
// Without an atlas the built-in uppercase font is written.

fn usage(program: &str) {
    eprintln!("Usage: {} [--atlas FILE] [-o OUTPUT]", program);
    eprintln!(
        "Atlas lines use '#' for a lit pixel and '.' for background, {} characters per line, 8 lines per glyph row.",
        charset::GLYPHS_PER_ROW * 8
    );
}

fn main() {
    let argv: Vec<String> = env::args().collect();
    let mut atlas_path: Option<String> = None;
    let mut output = String::from("charset.bin");

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--atlas" => {
                if let Some(v) = args.next() {
                    atlas_path = Some(v);
                } else {
                    eprintln!("--atlas requires a value");
                    process::exit(2);
                }
            }
            "-o" | "--output" => {
                if let Some(v) = args.next() {
                    output = v;
                } else {
                    eprintln!("{} requires a value", a);
                    process::exit(2);
                }
            }
            "--help" | "-h" => {
                usage(&argv[0]);
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage(&argv[0]);
                process::exit(2);
            }
        }
    }

    let charset_bytes = match &atlas_path {
        Some(path) => {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Failed to read {}: {}", path, e);
                    process::exit(2);
                }
            };
            match charset::parse_atlas(&text) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    process::exit(2);
                }
            }
        }
        None => charset::builtin(),
    };

    match fs::write(&output, &charset_bytes) {
        Ok(()) => println!("Wrote {} ({} bytes)", output, charset_bytes.len()),
        Err(e) => {
            eprintln!("Failed to write {}: {}", output, e);
            process::exit(1);
        }
    }
}
