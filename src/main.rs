mod bus;
mod cpu;
mod cpu_bus;
mod debug_flags;
mod diagnostics;
mod display;
mod emulator;
mod rom;
mod savestate;

use emulator::{Emulator, EmulatorConfig, RunOutcome};
use rom::{RomImage, RomLayout};
use std::env;
use std::path::{Path, PathBuf};
use std::process;

const ROM_EXTENSIONS: [&str; 2] = ["bin", "rom"];
const ROM_DIR: &str = "roms";

/// Locates a ROM image named on the command line. Accepts a direct path,
/// a path missing its extension, or a bare name looked up under ./roms
/// (case-insensitive on the file stem).
fn resolve_rom_path(arg: &str) -> Result<PathBuf, String> {
    let mut candidates = Vec::new();
    for base in [PathBuf::from(arg), Path::new(ROM_DIR).join(arg)] {
        candidates.push(base.clone());
        if base.extension().is_none() {
            for ext in ROM_EXTENSIONS {
                candidates.push(base.with_extension(ext));
            }
        }
    }
    if let Some(hit) = candidates.into_iter().find(|p| p.is_file()) {
        return Ok(hit);
    }

    let known = rom_images_in(ROM_DIR);
    let query = arg.to_lowercase();
    let mut matches: Vec<&PathBuf> = known
        .iter()
        .filter(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| stem.to_lowercase() == query)
                .unwrap_or(false)
        })
        .collect();

    match matches.len() {
        1 => Ok(matches.remove(0).clone()),
        0 if known.is_empty() => Err(format!(
            "ROM '{}' not found. Provide a path to a raw image, or put *.bin/*.rom files under ./{}.",
            arg, ROM_DIR
        )),
        0 => Err(format!(
            "ROM '{}' not found. Images under ./{}:\n{}",
            arg,
            ROM_DIR,
            path_listing(&known)
        )),
        _ => Err(format!(
            "Name '{}' is ambiguous:\n{}",
            arg,
            path_listing(&matches.into_iter().cloned().collect::<Vec<_>>())
        )),
    }
}

/// Every *.bin / *.rom file directly under the given directory.
fn rom_images_in(dir: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| ROM_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
                .unwrap_or(false);
            if is_image && path.is_file() {
                found.push(path);
            }
        }
    }
    found
}

fn path_listing(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("- {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [--headless] [--quiet] [--trace] [--dump-on-brk] [--max-instructions N] [--layout 64k|32k] [--load-state FILE] <rom>",
        program
    );
    eprintln!(
        "ROM images are raw memory dumps: 32768 bytes mapped at $8000 (32k) or 65536 bytes mapped at $0000 (64k)."
    );
}

fn main() {
    env_logger::init();
    let code = run_emulator();
    if code != 0 {
        process::exit(code);
    }
}

fn run_emulator() -> i32 {
    let args: Vec<String> = env::args().collect();

    // Minimal CLI flags (optional):
    //   --headless             => HEADLESS=1
    //   --quiet                => QUIET=1
    //   --trace                => TRACE_CPU=1
    //   --dump-on-brk          => DUMP_ON_BRK=1
    //   --max-instructions <N> => MAX_INSTRUCTIONS=N
    //   --layout <64k|32k>     => force the ROM layout
    //   --load-state <FILE>    => resume from a save state
    //   --help                 => usage
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return 0;
    }
    if args.len() < 2 {
        print_usage(&args[0]);
        return 2;
    }

    let mut layout_override: Option<RomLayout> = None;
    let mut load_state: Option<String> = None;
    let mut rom_arg_opt: Option<String> = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--headless" => {
                env::set_var("HEADLESS", "1");
                i += 1;
            }
            "--quiet" => {
                env::set_var("QUIET", "1");
                i += 1;
            }
            "--trace" => {
                env::set_var("TRACE_CPU", "1");
                i += 1;
            }
            "--dump-on-brk" => {
                env::set_var("DUMP_ON_BRK", "1");
                i += 1;
            }
            "--max-instructions" => {
                if i + 1 >= args.len() {
                    eprintln!("--max-instructions requires a value");
                    return 2;
                }
                env::set_var("MAX_INSTRUCTIONS", &args[i + 1]);
                i += 2;
            }
            "--layout" => {
                if i + 1 >= args.len() {
                    eprintln!("--layout requires a value");
                    return 2;
                }
                layout_override = match args[i + 1].to_lowercase().as_str() {
                    "64k" => Some(RomLayout::Full64K),
                    "32k" => Some(RomLayout::High32K),
                    other => {
                        eprintln!("--layout must be 64k or 32k, got '{}'", other);
                        return 2;
                    }
                };
                i += 2;
            }
            "--load-state" => {
                if i + 1 >= args.len() {
                    eprintln!("--load-state requires a value");
                    return 2;
                }
                load_state = Some(args[i + 1].clone());
                i += 2;
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown option: {}", s);
                return 2;
            }
            s => {
                if rom_arg_opt.is_some() {
                    eprintln!("Unexpected argument: {}", s);
                    return 2;
                }
                rom_arg_opt = Some(s.to_string());
                i += 1;
            }
        }
    }

    let rom_arg = match rom_arg_opt {
        Some(s) => s,
        None => {
            eprintln!("ROM argument missing");
            return 2;
        }
    };

    // Resolve ROM path robustly (direct path, roms/, missing extension, case-insensitive)
    let rom_path = match resolve_rom_path(&rom_arg) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{}", msg);
            return 2;
        }
    };

    let quiet = debug_flags::quiet();

    let layout = layout_override.unwrap_or(RomLayout::High32K);

    if !quiet {
        println!("Loading ROM: {} ({:?} layout)", rom_path.display(), layout);
    }
    let rom = match RomImage::load_from_file(&rom_path, layout) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("Failed to load ROM: {}", e);
            return 2;
        }
    };
    if !quiet {
        println!("ROM loaded, checksum ${:08X}", rom.checksum());
    }

    let title = rom_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| format!("emu6502 - {}", s))
        .unwrap_or_else(|| String::from("emu6502"));

    let mut config = EmulatorConfig::from_env();
    config.load_state = load_state;

    let mut emulator = match Emulator::new(&rom, &title, &config) {
        Ok(emulator) => emulator,
        Err(e) => {
            eprintln!("Failed to initialize emulator: {}", e);
            return 2;
        }
    };

    match emulator.run() {
        Ok(RunOutcome::InvalidOpcode) => 1,
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Emulator error: {}", e);
            2
        }
    }
}
