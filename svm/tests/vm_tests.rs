use pretty_assertions::assert_eq;
use svm::{HaltReason, Snapshot, VMState, VmError, VM};
use synacor_isa::{encode_image, Word, MEMORY_SIZE};

const R0: Word = 32768;
const R1: Word = 32769;
const R2: Word = 32770;

fn machine(program: &[Word]) -> VM {
    let mut vm = VM::new();
    vm.load_words(program).unwrap();
    vm
}

fn run(program: &[Word]) -> VM {
    let mut vm = machine(program);
    vm.run().unwrap();
    vm
}

#[test]
fn test_set_add_out() {
    // set r0 5; add r0 r0 3; out r0
    let mut vm = run(&[1, R0, 5, 9, R0, R0, 3, 19, R0]);
    assert_eq!(vm.get_output(), "\u{8}");
    assert_eq!(vm.registers[0], 8);
}

#[test]
fn test_lone_halt() {
    let mut vm = run(&[0]);
    assert_eq!(vm.state, VMState::Halted(HaltReason::Halt));
    assert_eq!(vm.get_output(), "");
    assert_eq!(vm.registers, [0; 8]);
    assert!(vm.stack.is_empty());
    assert!(vm.memory.iter().all(|&w| w == 0));
    assert_eq!(vm.cycles, 1);
}

#[test]
fn test_ret_on_empty_stack_halts_cleanly() {
    let mut vm = machine(&[18]);
    assert_eq!(vm.run(), Ok(()));
    assert_eq!(vm.state, VMState::Halted(HaltReason::ReturnFromEmptyStack));
    assert_eq!(vm.get_output(), "");
}

#[test]
fn test_pop_on_empty_stack_is_fatal() {
    let mut vm = machine(&[3, R0]);
    let err = vm.run().unwrap_err();
    assert_eq!(err, VmError::StackUnderflow { address: 0 });
    assert_eq!(vm.state, VMState::Error(err.clone()));
    // A failed machine keeps reporting the same error.
    assert_eq!(vm.step(), Err(err));
}

#[test]
fn test_runoff_at_end_of_memory_halts() {
    // All noops: execution walks off the end of memory.
    let mut vm = machine(&vec![21; MEMORY_SIZE]);
    vm.run().unwrap();
    assert_eq!(vm.state, VMState::Halted(HaltReason::EndOfMemory));
    assert_eq!(vm.pc, MEMORY_SIZE);
    assert_eq!(vm.cycles, MEMORY_SIZE as u64);
}

#[test]
fn test_unknown_opcode_is_fatal() {
    let mut vm = machine(&[21, 22]);
    assert_eq!(vm.run(), Err(VmError::UnknownOpcode { opcode: 22, address: 1 }));
}

#[test]
fn test_truncated_instruction_at_end_of_memory() {
    let mut program = vec![6, (MEMORY_SIZE - 2) as Word];
    program.resize(MEMORY_SIZE - 2, 0);
    program.extend([9, R0]);
    let mut vm = machine(&program);
    assert_eq!(
        vm.run(),
        Err(VmError::TruncatedInstruction { address: MEMORY_SIZE - 2 })
    );
}

#[test]
fn test_wraparound_results_stay_fifteen_bit() {
    let pairs: [(Word, Word); 6] = [(32767, 32767), (0, 32767), (1, 32767), (16384, 2), (12345, 6789), (32767, 1)];
    for (b, c) in pairs {
        // add, mult, mod, and, or, not
        let vm = run(&[
            9, R0, b, c,
            10, R1, b, c,
            11, R2, b, c,
            12, 32771, b, c,
            13, 32772, b, c,
            14, 32773, b,
            0,
        ]);
        let (b32, c32) = (b as u32, c as u32);
        assert_eq!(vm.registers[0] as u32, (b32 + c32) % 32768);
        assert_eq!(vm.registers[1] as u32, (b32 * c32) % 32768);
        assert_eq!(vm.registers[2] as u32, b32 % c32);
        assert_eq!(vm.registers[3] as u32, b32 & c32);
        assert_eq!(vm.registers[4] as u32, b32 | c32);
        assert_eq!(vm.registers[5] as u32, !b32 & 0x7FFF);
        assert!(vm.registers.iter().all(|&r| r <= 32767));
    }
}

#[test]
fn test_add_max_plus_max() {
    let vm = run(&[9, R0, 32767, 32767, 0]);
    assert_eq!(vm.registers[0], 32766);
}

#[test]
fn test_mult_by_zero() {
    let vm = run(&[1, R1, 31000, 10, R0, 0, R1, 0]);
    assert_eq!(vm.registers[0], 0);
}

#[test]
fn test_comparisons() {
    let vm = run(&[4, R0, 7, 7, 4, R1, 7, 8, 5, R2, 9, 8, 5, 32771, 8, 9, 0]);
    assert_eq!(&vm.registers[..4], &[1, 0, 1, 0]);
}

#[test]
fn test_stack_is_lifo() {
    // push 10; push 20; push r7 (=30); pop r0; pop r1; pop r2
    let vm = run(&[
        1, 32775, 30,
        2, 10, 2, 20, 2, 32775,
        3, R0, 3, R1, 3, R2,
        0,
    ]);
    assert_eq!(&vm.registers[..3], &[30, 20, 10]);
    assert!(vm.stack.is_empty());
}

#[test]
fn test_push_literal_operand() {
    let vm = run(&[2, 1234, 0]);
    assert_eq!(vm.stack, vec![1234]);
}

#[test]
fn test_call_returns_after_call_site() {
    // 0: call 6
    // 2: out 'B'
    // 4: halt
    // 5: noop
    // 6: out 'A'
    // 8: ret
    let mut vm = run(&[17, 6, 19, 66, 0, 21, 19, 65, 18]);
    assert_eq!(vm.get_output(), "AB");
    assert_eq!(vm.state, VMState::Halted(HaltReason::Halt));
    assert!(vm.stack.is_empty());
}

#[test]
fn test_unmatched_push_redirects_ret() {
    // The subroutine pushes 4 and returns to it instead of to 2.
    // 0: call 5
    // 2: out 'X'
    // 4: halt
    // 5: push 4
    // 7: ret
    let mut vm = run(&[17, 5, 19, 88, 0, 2, 4, 18]);
    assert_eq!(vm.get_output(), "");
    assert_eq!(vm.stack, vec![2]);
}

#[test]
fn test_conditional_jumps() {
    // 0: jt 0 99      (not taken)
    // 3: jf 1 99      (not taken)
    // 6: jt r0 12     (r0 = 0, not taken)
    // 9: jf r0 13     (taken)
    // 12: halt
    // 13: out 'J'
    // 15: halt
    let mut vm = run(&[7, 0, 99, 8, 1, 99, 7, R0, 12, 8, R0, 13, 0, 19, 74, 0]);
    assert_eq!(vm.get_output(), "J");
}

#[test]
fn test_jmp_through_register() {
    let mut vm = run(&[1, R0, 6, 6, R0, 0, 19, 33, 0]);
    assert_eq!(vm.get_output(), "!");
}

#[test]
fn test_rmem_wmem() {
    // wmem 100 r0(=77); rmem r1 100; wmem r1 r1
    let vm = run(&[1, R0, 77, 16, 100, R0, 15, R1, 100, 16, R1, R1, 0]);
    assert_eq!(vm.memory[100], 77);
    assert_eq!(vm.registers[1], 77);
    assert_eq!(vm.memory[77], 77);
}

#[test]
fn test_self_modifying_code() {
    // Overwrite the halt at 6 with a noop, then fall through to out '!'.
    let mut vm = run(&[16, 6, 21, 21, 21, 21, 0, 19, 33, 0]);
    assert_eq!(vm.get_output(), "!");
}

#[test]
fn test_in_blocks_until_input() {
    // in r0; out r0; in r1; out r1; halt
    let program = [20, R0, 19, R0, 20, R1, 19, R1, 0];
    let mut vm = machine(&program);
    vm.run().unwrap();
    assert_eq!(vm.state, VMState::WaitingForInput);
    assert_eq!(vm.pc, 0);
    assert_eq!(vm.cycles, 0);

    // Stepping while blocked is a no-op.
    vm.step().unwrap();
    assert_eq!(vm.pc, 0);

    vm.push_input_line("h");
    vm.run().unwrap();
    assert_eq!(vm.state, VMState::Halted(HaltReason::Halt));
    assert_eq!(vm.get_output(), "h\n");
    assert_eq!(vm.registers[1], '\n' as Word);
}

#[test]
fn test_in_drains_one_character_per_instruction() {
    let mut vm = machine(&[20, R0, 20, R1, 20, R2, 0]);
    vm.push_input_str("abc");
    vm.run().unwrap();
    assert_eq!(&vm.registers[..3], &['a' as Word, 'b' as Word, 'c' as Word]);
    assert!(vm.input_buffer.is_empty());
}

#[test]
fn test_run_for_limits_steps() {
    // 0: noop; 1: jmp 0
    let mut vm = machine(&[21, 6, 0]);
    assert_eq!(vm.run_for(1000), Ok(1000));
    assert_eq!(vm.state, VMState::Running);
    assert_eq!(vm.cycles, 1000);
}

#[test]
fn test_load_image_bytes() {
    let mut vm = VM::new();
    vm.load_image(&encode_image(&[19, 111, 19, 107, 0])).unwrap();
    vm.run().unwrap();
    assert_eq!(vm.get_output(), "ok");
}

#[test]
fn test_load_image_rejects_odd_length() {
    let mut vm = VM::new();
    assert!(matches!(vm.load_image(&[1, 2, 3]), Err(VmError::Image(_))));
}

#[test]
fn test_snapshot_round_trip() {
    // Run part way: set some registers, push to the stack, then block on input.
    let mut vm = machine(&[1, R0, 42, 2, 7, 17, 7, 20, R1, 0]);
    vm.run().unwrap();
    assert_eq!(vm.state, VMState::WaitingForInput);
    vm.push_input_str("xy");

    let snapshot = vm.snapshot();
    let restored = VM::restore(snapshot.clone()).unwrap();
    assert_eq!(restored.memory, vm.memory);
    assert_eq!(restored.registers, vm.registers);
    assert_eq!(restored.stack, vm.stack);
    assert_eq!(restored.pc, vm.pc);
    assert_eq!(restored.input_buffer, vm.input_buffer);
    assert_eq!(restored.snapshot(), snapshot);
}

#[test]
fn test_snapshot_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut vm = machine(&[1, R2, 9, 16, 500, R2, 2, 3, 20, R0, 19, R0, 0]);
    vm.run().unwrap();
    vm.push_input_line("go");

    let path = vm.snapshot().save_timestamped(dir.path()).unwrap();
    assert!(path.starts_with(dir.path()));

    let mut restored = VM::restore(Snapshot::load(&path).unwrap()).unwrap();
    assert_eq!(restored.snapshot(), vm.snapshot());

    // Both machines continue identically.
    vm.run().unwrap();
    restored.run().unwrap();
    assert_eq!(restored.get_output(), vm.get_output());
    assert_eq!(restored.state, vm.state);
}

#[test]
fn test_restore_resumes_mid_program() {
    let program = [19, 49, 20, R0, 19, 50, 0];
    let mut vm = machine(&program);
    vm.run().unwrap();
    assert_eq!(vm.get_output(), "1");

    let mut resumed = VM::restore(vm.snapshot()).unwrap();
    resumed.push_input_line("");
    resumed.run().unwrap();
    assert_eq!(resumed.get_output(), "2");
    assert_eq!(resumed.state, VMState::Halted(HaltReason::Halt));
}

#[test]
fn test_machines_are_independent() {
    let mut a = machine(&[19, 97, 0]);
    let mut b = machine(&[19, 98, 0]);
    a.run().unwrap();
    b.run().unwrap();
    assert_eq!(a.get_output(), "a");
    assert_eq!(b.get_output(), "b");
}
