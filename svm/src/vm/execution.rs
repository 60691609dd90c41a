use super::{HaltReason, VmError, VM};
use synacor_isa::{classify, Opcode, Operand, Word, LITERAL_MASK, MODULUS};

// Reduce a wide intermediate result to a 15-bit word.
fn wrap(value: u32) -> Word {
    (value % MODULUS) as Word
}

impl VM {
    /// Resolve an operand to its value: the literal itself or the register contents.
    fn value(&self, raw: Word, address: usize) -> Result<Word, VmError> {
        match classify(raw) {
            Ok(Operand::Literal(value)) => Ok(value),
            Ok(Operand::Register(reg)) => Ok(self.registers[reg.index()]),
            Err(_) => Err(VmError::IllegalOperand { raw, address }),
        }
    }

    /// Resolve a destination operand, which must name a register.
    fn register(&self, raw: Word, address: usize) -> Result<usize, VmError> {
        match classify(raw) {
            Ok(Operand::Register(reg)) => Ok(reg.index()),
            Ok(Operand::Literal(_)) => Err(VmError::InvalidRegister { raw, address }),
            Err(_) => Err(VmError::IllegalOperand { raw, address }),
        }
    }

    /// Apply a binary operation to `b` and `c`, storing into register `a`.
    fn binary_op(
        &mut self,
        args: &[Word],
        address: usize,
        op: impl FnOnce(u32, u32) -> u32,
    ) -> Result<(), VmError> {
        let a = self.register(args[0], address)?;
        let b = self.value(args[1], address)? as u32;
        let c = self.value(args[2], address)? as u32;
        self.registers[a] = wrap(op(b, c));
        Ok(())
    }

    /// Execute one decoded instruction. `pc` already points past it.
    pub(super) fn execute_instruction(
        &mut self,
        opcode: Opcode,
        address: usize,
        args: &[Word],
    ) -> Result<(), VmError> {
        match opcode {
            Opcode::Halt => self.halt(HaltReason::Halt),

            Opcode::Set => {
                let a = self.register(args[0], address)?;
                self.registers[a] = self.value(args[1], address)?;
            }

            Opcode::Push => {
                let a = self.value(args[0], address)?;
                self.stack.push(a);
            }

            Opcode::Pop => {
                let a = self.register(args[0], address)?;
                let top = self.stack.pop().ok_or(VmError::StackUnderflow { address })?;
                self.registers[a] = top;
            }

            Opcode::Eq => self.binary_op(args, address, |b, c| (b == c) as u32)?,
            Opcode::Gt => self.binary_op(args, address, |b, c| (b > c) as u32)?,

            Opcode::Jmp => {
                self.pc = self.value(args[0], address)? as usize;
            }

            Opcode::Jt => {
                let condition = self.value(args[0], address)?;
                let target = self.value(args[1], address)?;
                if condition != 0 {
                    self.pc = target as usize;
                }
            }

            Opcode::Jf => {
                let condition = self.value(args[0], address)?;
                let target = self.value(args[1], address)?;
                if condition == 0 {
                    self.pc = target as usize;
                }
            }

            Opcode::Add => self.binary_op(args, address, |b, c| b + c)?,
            Opcode::Mult => self.binary_op(args, address, |b, c| b * c)?,

            Opcode::Mod => {
                if self.value(args[2], address)? == 0 {
                    return Err(VmError::DivisionByZero { address });
                }
                self.binary_op(args, address, |b, c| b % c)?
            }

            Opcode::And => self.binary_op(args, address, |b, c| b & c)?,
            Opcode::Or => self.binary_op(args, address, |b, c| b | c)?,

            Opcode::Not => {
                let a = self.register(args[0], address)?;
                let b = self.value(args[1], address)?;
                self.registers[a] = !b & LITERAL_MASK;
            }

            Opcode::Rmem => {
                let a = self.register(args[0], address)?;
                let b = self.value(args[1], address)?;
                self.registers[a] = self.memory[b as usize];
            }

            Opcode::Wmem => {
                let a = self.value(args[0], address)?;
                let b = self.value(args[1], address)?;
                self.memory[a as usize] = b;
            }

            Opcode::Call => {
                let target = self.value(args[0], address)?;
                self.stack.push(self.pc as Word);
                self.pc = target as usize;
            }

            Opcode::Ret => match self.stack.pop() {
                Some(target) => self.pc = target as usize,
                None => self.halt(HaltReason::ReturnFromEmptyStack),
            },

            Opcode::Out => {
                let code = self.value(args[0], address)?;
                let c = char::from_u32(code as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
                self.output_buffer.push(c);
            }

            Opcode::In => {
                let a = self.register(args[0], address)?;
                // `step` blocks before dispatch when the queue is empty.
                let code = self
                    .input_buffer
                    .pop_front()
                    .ok_or(VmError::InputUnavailable { address })?;
                self.registers[a] = code;
            }

            Opcode::Noop => {}
        }
        Ok(())
    }
}
