use colored::*;
use synacor_isa::{decode, Register};
use crate::vm::{VMState, VM};

pub struct Debugger {}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}

impl Debugger {
    pub fn new() -> Self {
        Self {}
    }

    /// One trace line: address, the instruction about to run, and the registers.
    pub fn format_trace(vm: &VM, address: usize) -> String {
        let decoded = decode(&vm.memory, address);
        format!(
            "{} {} {} {}",
            format!("[{address:05}]").bright_black(),
            format!("{:<22}", decoded.text()).bright_cyan(),
            Self::format_registers(vm),
            format!("sp={}", vm.stack.len()).bright_black()
        )
    }

    fn format_registers(vm: &VM) -> String {
        Register::all()
            .map(|reg| {
                let value = vm.registers[reg.index()];
                let formatted = format!("{reg}={value:<5}");
                if value != 0 {
                    formatted.bright_white().to_string()
                } else {
                    formatted.bright_black().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Print the current VM state in a pretty format
    pub fn print_state(&self, vm: &VM) {
        eprintln!("\n{}", "─".repeat(80).bright_black());

        eprintln!(
            "{}: {:05}  {}: {}  {}: {}",
            "PC".bright_cyan().bold(),
            vm.pc,
            "State".bright_cyan().bold(),
            Self::format_state(&vm.state),
            "Cycles".bright_cyan().bold(),
            vm.cycles
        );

        eprintln!("\n{}", "Registers:".bright_cyan().bold());
        eprintln!("  {}", Self::format_registers(vm));

        let top: Vec<String> = vm.stack.iter().rev().take(8).map(|w| w.to_string()).collect();
        eprintln!(
            "\n{} depth {} [{}]",
            "Stack:".bright_cyan().bold(),
            vm.stack.len(),
            top.join(", ")
        );

        if let Some(decoded) = vm.current_instruction() {
            eprintln!("\n{}", "Next Instruction:".bright_cyan().bold());
            let text = decoded.text();
            let colored = if decoded.is_data() {
                text.bright_red()
            } else {
                text.normal()
            };
            eprintln!("  [{:05}] {colored}", decoded.address);
        }

        eprintln!("{}", "─".repeat(80).bright_black());
    }

    fn format_state(state: &VMState) -> ColoredString {
        match state {
            VMState::Running => "Running".bright_green(),
            VMState::WaitingForInput => "Waiting for input".bright_yellow(),
            VMState::Halted(reason) => format!("Halted ({reason})").bright_red(),
            VMState::Error(e) => format!("Error: {e}").bright_red().bold(),
        }
    }
}
