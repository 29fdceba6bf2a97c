use std::time::{Duration, Instant};

use crate::bus::Bus;
use crate::cpu::{Cpu, HaltReason, StepResult};
use crate::debug_flags;
use crate::diagnostics::{self, Tracer};
use crate::display::Display;
use crate::rom::RomImage;
use crate::savestate::SaveState;

const QUICK_SAVE_FILE: &str = "quicksave.sav";
const TRACE_CAPACITY: usize = 64;
const TRACE_DUMP_LINES: usize = 16;

/// Why the run loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program executed BRK, the controlled stop.
    BreakHalt,
    /// Fetch hit a byte with no instruction assigned to it.
    InvalidOpcode,
    /// The window was closed or Escape was pressed.
    Stopped,
    /// The instruction budget ran out before the program halted.
    BudgetExhausted,
}

pub struct EmulatorConfig {
    pub headless: bool,
    /// 0 means unbounded.
    pub max_instructions: u64,
    pub dump_on_brk: bool,
    pub trace: bool,
    pub load_state: Option<String>,
}

impl EmulatorConfig {
    /// Baseline configuration from environment variables. Command line
    /// flags override individual fields afterwards.
    pub fn from_env() -> Self {
        EmulatorConfig {
            headless: debug_flags::headless(),
            max_instructions: debug_flags::max_instructions(),
            dump_on_brk: debug_flags::dump_on_brk(),
            trace: debug_flags::trace_cpu(),
            load_state: None,
        }
    }
}

pub struct Emulator {
    cpu: Cpu,
    bus: Bus,
    display: Option<Display>,
    tracer: Option<Tracer>,
    rom_checksum: u32,
    dump_on_brk: bool,
    max_instructions: u64,
    instructions: u64,
}

impl Emulator {
    pub fn new(rom: &RomImage, title: &str, config: &EmulatorConfig) -> Result<Self, String> {
        let mut bus = Bus::new();
        bus.load_rom(rom);

        if !debug_flags::quiet() {
            println!(
                "Vectors: reset=${:04X} irq=${:04X} nmi=${:04X}",
                bus.reset_vector(),
                bus.irq_vector(),
                bus.nmi_vector()
            );
        }

        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);

        let display = if config.headless {
            None
        } else {
            match Display::new(title) {
                Ok(display) => Some(display),
                Err(e) => {
                    println!(
                        "WINDOW: creation failed ({}). Falling back to headless mode.",
                        e
                    );
                    None
                }
            }
        };

        let tracer = if config.trace {
            Some(Tracer::new(TRACE_CAPACITY))
        } else {
            None
        };

        let mut emulator = Emulator {
            cpu,
            bus,
            display,
            tracer,
            rom_checksum: rom.checksum(),
            dump_on_brk: config.dump_on_brk,
            max_instructions: config.max_instructions,
            instructions: 0,
        };

        if let Some(path) = &config.load_state {
            let state = SaveState::load_from_file(path)
                .map_err(|e| format!("Failed to load save state: {}", e))?;
            state.restore(&mut emulator.cpu, &mut emulator.bus, emulator.rom_checksum)?;
            if !debug_flags::quiet() {
                println!("Resumed from save state {}", path);
            }
        }

        Ok(emulator)
    }

    /// Runs instructions until the program halts, the window closes or the
    /// instruction budget runs out. The display is polled after every
    /// completed instruction and presented at 60 Hz.
    pub fn run(&mut self) -> Result<RunOutcome, String> {
        let frame_duration = Duration::from_secs_f64(1.0 / 60.0);
        let mut last_present = Instant::now();

        loop {
            if let Some(display) = &self.display {
                if !display.is_open() || display.escape_pressed() {
                    return Ok(RunOutcome::Stopped);
                }
            }
            if self.max_instructions > 0 && self.instructions >= self.max_instructions {
                if !debug_flags::quiet() {
                    println!(
                        "Instruction budget of {} reached, stopping",
                        self.max_instructions
                    );
                }
                return Ok(RunOutcome::BudgetExhausted);
            }

            if let Some(tracer) = &mut self.tracer {
                tracer.record(&self.cpu, &self.bus);
            }

            match self.cpu.step(&mut self.bus) {
                StepResult::Executed(_) => self.instructions += 1,
                StepResult::Halted(reason) => {
                    self.report_halt(reason);
                    return self.finish(reason);
                }
            }

            let mut save_requested = false;
            let mut load_requested = false;
            if let Some(display) = &mut self.display {
                display.poll(&self.bus);
                if last_present.elapsed() >= frame_duration {
                    display.present()?;
                    save_requested = display.save_requested();
                    load_requested = display.load_requested();
                    last_present = Instant::now();
                }
            }
            if save_requested {
                self.quick_save();
            }
            if load_requested {
                self.quick_load();
            }
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn instructions_executed(&self) -> u64 {
        self.instructions
    }

    fn report_halt(&self, reason: HaltReason) {
        match reason {
            HaltReason::InvalidOpcode(_) => {
                diagnostics::dump_halt(&self.cpu, &self.bus, reason);
                if let Some(tracer) = &self.tracer {
                    tracer.print_recent(TRACE_DUMP_LINES);
                }
            }
            HaltReason::Break => {
                if self.dump_on_brk {
                    diagnostics::dump_halt(&self.cpu, &self.bus, reason);
                    if let Some(tracer) = &self.tracer {
                        tracer.print_recent(TRACE_DUMP_LINES);
                    }
                } else if !debug_flags::quiet() {
                    println!(
                        "BRK at ${:04X} after {} instructions ({} cycles)",
                        self.cpu.pc, self.instructions, self.cpu.cycles
                    );
                }
            }
        }
    }

    /// After a controlled stop the final frame stays on screen until the
    /// window is closed. A crash exits immediately.
    fn finish(&mut self, reason: HaltReason) -> Result<RunOutcome, String> {
        let outcome = match reason {
            HaltReason::Break => RunOutcome::BreakHalt,
            HaltReason::InvalidOpcode(_) => RunOutcome::InvalidOpcode,
        };

        if outcome == RunOutcome::BreakHalt {
            if let Some(display) = &mut self.display {
                display.poll(&self.bus);
                if !debug_flags::quiet() {
                    println!("Close the window or press Escape to exit");
                }
                while display.is_open() && !display.escape_pressed() {
                    display.present()?;
                    std::thread::sleep(Duration::from_secs_f64(1.0 / 60.0));
                }
            }
        }

        Ok(outcome)
    }

    fn quick_save(&self) {
        let state = SaveState::capture(&self.cpu, &self.bus, self.rom_checksum);
        match state.save_to_file(QUICK_SAVE_FILE) {
            Ok(_) => println!("Quick save completed successfully"),
            Err(e) => println!("Failed to save state: {}", e),
        }
    }

    fn quick_load(&mut self) {
        match SaveState::load_from_file(QUICK_SAVE_FILE) {
            Ok(state) => match state.restore(&mut self.cpu, &mut self.bus, self.rom_checksum) {
                Ok(_) => {
                    if let Some(display) = &mut self.display {
                        display.invalidate();
                        display.poll(&self.bus);
                    }
                    println!("Quick load completed successfully");
                }
                Err(e) => println!("Failed to restore state: {}", e),
            },
            Err(e) => println!("Failed to load state: {}", e),
        }
    }
}
