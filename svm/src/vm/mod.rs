/// VM module - the Synacor virtual machine

mod error;
mod execution;
mod snapshot;
mod state;

pub use error::VmError;
pub use snapshot::{Snapshot, SnapshotError};
pub use state::{HaltReason, VMState};

use std::collections::VecDeque;
use synacor_isa::{
    decode, load_image, lookup, Decoded, Opcode, Word, LITERAL_MASK, MAX_ARITY, MEMORY_SIZE,
    REGISTER_COUNT,
};

use crate::debug::Debugger;

/// The Synacor Virtual Machine
pub struct VM {
    // 15-bit address space, zero-initialized
    pub memory: Vec<Word>,

    pub registers: [Word; REGISTER_COUNT],

    // Shared by push/pop and call/ret
    pub stack: Vec<Word>,

    pub pc: usize,

    pub state: VMState,

    // Characters waiting to be consumed by `in`
    pub input_buffer: VecDeque<Word>,

    // Characters written by `out` and not yet collected
    pub output_buffer: String,

    // Print every executed instruction to stderr
    pub trace: bool,

    // Instructions executed so far
    pub cycles: u64,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    pub fn new() -> Self {
        VM {
            memory: vec![0; MEMORY_SIZE],
            registers: [0; REGISTER_COUNT],
            stack: Vec::new(),
            pc: 0,
            state: VMState::Running,
            input_buffer: VecDeque::new(),
            output_buffer: String::new(),
            trace: false,
            cycles: 0,
        }
    }

    /// Load a little-endian binary image at address 0.
    pub fn load_image(&mut self, binary: &[u8]) -> Result<(), VmError> {
        let words = load_image(binary)?;
        self.load_words(&words)
    }

    /// Copy `words` into memory starting at address 0. The rest of memory is cleared.
    pub fn load_words(&mut self, words: &[Word]) -> Result<(), VmError> {
        if words.len() > MEMORY_SIZE {
            return Err(synacor_isa::IsaError::ImageTooLarge(words.len()).into());
        }
        self.memory.fill(0);
        self.memory[..words.len()].copy_from_slice(words);
        log::info!("Loaded {} words", words.len());
        Ok(())
    }

    /// Running, or waiting on input that has since arrived.
    pub fn can_step(&self) -> bool {
        match self.state {
            VMState::Running => true,
            VMState::WaitingForInput => !self.input_buffer.is_empty(),
            _ => false,
        }
    }

    pub fn step(&mut self) -> Result<(), VmError> {
        match self.state {
            VMState::Running => {}
            VMState::WaitingForInput => {
                if self.input_buffer.is_empty() {
                    return Ok(());
                }
                self.state = VMState::Running;
            }
            VMState::Halted(_) => return Ok(()),
            VMState::Error(ref e) => return Err(e.clone()),
        }

        if let Err(e) = self.fetch_and_execute() {
            self.state = VMState::Error(e.clone());
            return Err(e);
        }
        Ok(())
    }

    fn fetch_and_execute(&mut self) -> Result<(), VmError> {
        let address = self.pc;
        if address >= MEMORY_SIZE {
            log::warn!("Execution reached end of memory (pc={address})");
            self.halt(HaltReason::EndOfMemory);
            return Ok(());
        }

        let raw = self.memory[address];
        let instr = lookup(raw).map_err(|_| VmError::UnknownOpcode { opcode: raw, address })?;
        let next = address + instr.length();
        if next > MEMORY_SIZE {
            return Err(VmError::TruncatedInstruction { address });
        }

        // Block before committing: `in` is re-fetched once input arrives.
        if instr.opcode == Opcode::In && self.input_buffer.is_empty() {
            self.state = VMState::WaitingForInput;
            return Ok(());
        }

        let mut operands = [0; MAX_ARITY];
        operands[..instr.arity].copy_from_slice(&self.memory[address + 1..next]);

        if self.trace {
            eprintln!("{}", Debugger::format_trace(self, address));
        }
        log::trace!("[{address:05}] {}", decode(&self.memory, address).text());

        // Advance before executing so jumps can overwrite pc.
        self.pc = next;
        self.cycles += 1;
        self.execute_instruction(instr.opcode, address, &operands[..instr.arity])
    }

    /// Step until the machine halts, blocks on input or fails.
    pub fn run(&mut self) -> Result<(), VmError> {
        while self.can_step() {
            self.step()?;
        }
        Ok(())
    }

    /// Step at most `limit` instructions. Returns how many steps were taken.
    pub fn run_for(&mut self, limit: usize) -> Result<usize, VmError> {
        let mut steps = 0;
        while steps < limit && self.can_step() {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    fn halt(&mut self, reason: HaltReason) {
        log::debug!("Halted after {} instructions: {reason}", self.cycles);
        self.state = VMState::Halted(reason);
    }

    /// Drain everything `out` has written so far.
    pub fn get_output(&mut self) -> String {
        std::mem::take(&mut self.output_buffer)
    }

    pub fn push_input(&mut self, c: char) {
        self.input_buffer.push_back((c as u32 & LITERAL_MASK as u32) as Word);
    }

    pub fn push_input_str(&mut self, input: &str) {
        for c in input.chars() {
            self.push_input(c);
        }
    }

    /// Queue one line of input, terminated by a newline.
    pub fn push_input_line(&mut self, line: &str) {
        self.push_input_str(line);
        if !line.ends_with('\n') {
            self.push_input('\n');
        }
    }

    pub fn current_instruction(&self) -> Option<Decoded> {
        if self.pc < MEMORY_SIZE {
            Some(decode(&self.memory, self.pc))
        } else {
            None
        }
    }
}
