use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use anyhow::{Context, Result};
use log::debug;

use famicore::{Bus, Cartridge, Cpu};

fn prompt(stdin: &mut impl BufRead, text: &str) -> Result<String> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    stdin.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut stdin = io::stdin().lock();
    let rom_path = prompt(&mut stdin, "Enter ROM path: ")?;
    let cycle_budget: u64 = prompt(&mut stdin, "Enter CPU cycles: ")?
        .parse()
        .context("cycle count must be an integer")?;

    let cartridge = Cartridge::from_file(&rom_path)
        .with_context(|| format!("failed to load '{rom_path}'"))?;
    let cartridge = Rc::new(RefCell::new(cartridge));

    let mut bus = Bus::new();
    bus.connect_cartridge(Rc::clone(&cartridge));

    let mut cpu = Cpu::new(&mut bus);
    cpu.reset();
    while cpu.cycles < cycle_budget {
        debug!("{}", cpu.trace_line());
        cpu.step()?;
    }

    println!("ran {} cycles, stopped at ${:04X}", cpu.cycles, cpu.program_counter);
    Ok(())
}
