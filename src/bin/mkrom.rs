// Each tool uses a different slice of the shared charset module.
#[path = "../charset.rs"]
#[allow(dead_code)]
mod charset;

use std::env;
use std::fs;
use std::process;

// Demo ROM builder.
// Usage:
//   cargo run --bin mkrom -- [--charset charset.bin] [--program code.bin] [-o rom.bin]
// Produces a 32 KiB image: character ROM at the front, program code at
// $0800 and the reset vector pointing at it.

const ROM_SIZE: usize = 0x8000;
const PROGRAM_OFFSET: usize = 0x0800;
const RESET_VECTOR_OFFSET: usize = 0x7FFC;
const ENTRY_ADDRESS: u16 = 0x8800;

// Fills the first $4E video cells with ascending glyph indices, then stops.
const DEMO_PROGRAM: &[u8] = &[
    0xA2, 0x00, // LDX #$00
    0xA0, 0x4E, // LDY #$4E
    0x8A, // TXA
    0x9D, 0x00, 0x02, // STA $0200,X
    0x48, // PHA
    0xE8, // INX
    0x88, // DEY
    0xC0, 0x00, // CPY #$00
    0xD0, 0xF5, // BNE -11
    0x00, // BRK
];

fn usage(program: &str) {
    eprintln!(
        "Usage: {} [--charset FILE] [--program FILE] [-o OUTPUT]",
        program
    );
    eprintln!("Defaults: built-in charset, built-in demo program, rom.bin output.");
}

fn main() {
    let argv: Vec<String> = env::args().collect();
    let mut charset_path: Option<String> = None;
    let mut program_path: Option<String> = None;
    let mut output = String::from("rom.bin");

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--charset" => {
                if let Some(v) = args.next() {
                    charset_path = Some(v);
                } else {
                    eprintln!("--charset requires a value");
                    process::exit(2);
                }
            }
            "--program" => {
                if let Some(v) = args.next() {
                    program_path = Some(v);
                } else {
                    eprintln!("--program requires a value");
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

    let charset_bytes = match &charset_path {
        Some(path) => match fs::read(path) {
            Ok(bytes) => {
                if bytes.len() != charset::CHARSET_LEN {
                    eprintln!(
                        "{} is {} bytes, expected {}",
                        path,
                        bytes.len(),
                        charset::CHARSET_LEN
                    );
                    process::exit(2);
                }
                bytes
            }
            Err(e) => {
                eprintln!("Failed to read {}: {}", path, e);
                process::exit(2);
            }
        },
        None => charset::builtin(),
    };

    let program_bytes = match &program_path {
        Some(path) => match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Failed to read {}: {}", path, e);
                process::exit(2);
            }
        },
        None => DEMO_PROGRAM.to_vec(),
    };
    if PROGRAM_OFFSET + program_bytes.len() > RESET_VECTOR_OFFSET {
        eprintln!(
            "program is {} bytes, only {} fit below the vectors",
            program_bytes.len(),
            RESET_VECTOR_OFFSET - PROGRAM_OFFSET
        );
        process::exit(2);
    }

    let rom = build_rom(&charset_bytes, &program_bytes);
    match fs::write(&output, &rom) {
        Ok(()) => println!(
            "Wrote {} ({} bytes, entry ${:04X})",
            output,
            rom.len(),
            ENTRY_ADDRESS
        ),
        Err(e) => {
            eprintln!("Failed to write {}: {}", output, e);
            process::exit(1);
        }
    }
}

fn build_rom(charset: &[u8], program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; ROM_SIZE];
    rom[..charset.len()].copy_from_slice(charset);
    rom[PROGRAM_OFFSET..PROGRAM_OFFSET + program.len()].copy_from_slice(program);
    rom[RESET_VECTOR_OFFSET] = ENTRY_ADDRESS as u8;
    rom[RESET_VECTOR_OFFSET + 1] = (ENTRY_ADDRESS >> 8) as u8;
    rom
}
