use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use synacor_isa::{load_image, Disassembly, Opcode};

#[derive(Parser)]
#[command(name = "sdis")]
#[command(about = "Synacor disassembler - lists the instructions of a binary image")]
#[command(version)]
struct Cli {
    /// Binary image to disassemble
    image: Option<PathBuf>,

    /// Address to start decoding at
    #[arg(short, long, default_value = "0")]
    start: usize,

    /// Stop after this many lines
    #[arg(short, long)]
    count: Option<usize>,

    /// Show instruction reference
    #[arg(short, long)]
    reference: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn get_instruction_format(opcode: Opcode) -> &'static str {
    match opcode {
        Opcode::Halt | Opcode::Ret | Opcode::Noop => "",
        Opcode::Push | Opcode::Jmp | Opcode::Call | Opcode::Out => "a",
        Opcode::Pop | Opcode::In => "reg",
        Opcode::Set | Opcode::Not | Opcode::Rmem => "reg, b",
        Opcode::Jt | Opcode::Jf | Opcode::Wmem => "a, b",
        Opcode::Eq | Opcode::Gt | Opcode::Add | Opcode::Mult | Opcode::Mod | Opcode::And | Opcode::Or => "reg, b, c",
    }
}

fn get_instruction_description(opcode: Opcode) -> &'static str {
    match opcode {
        Opcode::Halt => "Stop execution",
        Opcode::Set => "reg = b",
        Opcode::Push => "Push a onto the stack",
        Opcode::Pop => "reg = pop(); empty stack is an error",
        Opcode::Eq => "reg = (b == c) ? 1 : 0",
        Opcode::Gt => "reg = (b > c) ? 1 : 0",
        Opcode::Jmp => "PC = a",
        Opcode::Jt => "if (a != 0) PC = b",
        Opcode::Jf => "if (a == 0) PC = b",
        Opcode::Add => "reg = (b + c) % 32768",
        Opcode::Mult => "reg = (b * c) % 32768",
        Opcode::Mod => "reg = b % c",
        Opcode::And => "reg = b & c",
        Opcode::Or => "reg = b | c",
        Opcode::Not => "reg = 15-bit ~b",
        Opcode::Rmem => "reg = memory[b]",
        Opcode::Wmem => "memory[a] = b",
        Opcode::Call => "push(PC + 2); PC = a",
        Opcode::Ret => "PC = pop(); empty stack halts",
        Opcode::Out => "Write character a",
        Opcode::In => "reg = next input character",
        Opcode::Noop => "No operation",
    }
}

fn print_instruction_reference() {
    println!("SYNACOR INSTRUCTION REFERENCE");
    println!("=============================\n");

    for opcode in Opcode::all() {
        let format = get_instruction_format(opcode);
        let description = get_instruction_description(opcode);
        if format.is_empty() {
            println!("{:>2} {:<6}             # {}", opcode.code(), opcode.to_str(), description);
        } else {
            println!("{:>2} {:<6} {:<12}# {}", opcode.code(), opcode.to_str(), format, description);
        }
    }
    println!();

    println!("OPERANDS");
    println!("--------");
    println!("0..32767            # Literal value");
    println!("32768..32775        # Registers r0..r7");
    println!("32776..65535        # Invalid");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.reference {
        print_instruction_reference();
        return Ok(());
    }

    let Some(path) = cli.image else {
        bail!("No image provided. Use --help for usage information.");
    };

    let bytes = fs::read(&path).with_context(|| format!("Error reading file '{}'", path.display()))?;
    let memory = load_image(&bytes).with_context(|| format!("Error loading image '{}'", path.display()))?;
    log::info!("Loaded {} words from {}", memory.len(), path.display());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let listing = Disassembly::new(&memory, cli.start);
    let limit = cli.count.unwrap_or(usize::MAX);
    for decoded in listing.take(limit) {
        writeln!(out, "{decoded}")?;
    }
    out.flush()?;

    Ok(())
}
