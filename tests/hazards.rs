mod common;

use common::*;
use pretty_assertions::assert_eq;
use sim_lib::cpu::Simulator;
use sim_lib::pipelined::pipeline::Hazard;
use sim_lib::pipelined::Pipeline;

/// Steps until the next stall and returns its cause
fn next_stall(pipeline: &mut Pipeline, limit: u64) -> Option<Hazard> {
    for _ in 0..limit {
        pipeline.step();
        if let Some(hazard) = pipeline.last_stall() {
            return Some(hazard);
        }
    }
    None
}

#[test]
fn load_use_matches_reference() {
    let program = [lw(1, 0, 0), add(4, 1, 1), HALT];
    let machine = Machine::new(&program).word(0, 21);

    let mut pipeline = machine.pipeline();
    let mut reference = machine.single_cycle();
    run_to_halt(&mut pipeline);
    run_to_halt(&mut reference);

    assert_eq!(pipeline.cpu().gpr.read(4), 42);
    assert_eq!(pipeline.cpu().gpr, reference.cpu().gpr);
    assert_eq!(pipeline.cpu().history.stall_count, 1);
}

#[test]
fn load_use_stall_cause() {
    let program = [lw(1, 0, 0), sw(1, 4, 0), HALT];
    let mut pipeline = Machine::new(&program).word(0, 5).pipeline();

    assert_eq!(
        next_stall(&mut pipeline, 10),
        Some(Hazard::LoadUse { reg: 1 })
    );
    run_to_halt(&mut pipeline);
    assert_eq!(pipeline.cpu().dmem.read(4, true), 5);
}

#[test]
fn alu_results_are_bypassed_without_stalls() {
    // Each instruction consumes the previous one's result
    let program = [
        add(3, 1, 2),
        sub(4, 3, 1),
        and(5, 4, 3),
        or(6, 5, 3),
        sw(6, 0, 0),
        HALT,
    ];
    let mut pipeline =
        Machine::new(&program).reg(1, 5).reg(2, 7).pipeline();
    run_to_halt(&mut pipeline);

    let cpu = pipeline.cpu();
    assert_eq!(cpu.gpr.read(3), 12);
    assert_eq!(cpu.gpr.read(4), 7);
    assert_eq!(cpu.gpr.read(5), 4);
    assert_eq!(cpu.gpr.read(6), 12);
    assert_eq!(cpu.dmem.read(0, true), 12);
    assert_eq!(cpu.history.stall_count, 0);
    assert!(cpu.history.ex_mem_forward_count >= 4);
}

#[test]
fn mem_bypass_wins_over_wb_bypass() {
    // $3 is written twice; the consumer must see the second write
    let program = [add(3, 1, 1), add(3, 2, 2), add(4, 3, 0), HALT];
    let mut pipeline =
        Machine::new(&program).reg(1, 1).reg(2, 2).pipeline();
    run_to_halt(&mut pipeline);
    assert_eq!(pipeline.cpu().gpr.read(4), 4);
}

#[test]
fn branch_operand_bypassed_from_memory_stage() {
    // add is in MEM when beq decodes; beq at 8 targets 8 + 8 + 4
    let program = [
        add(1, 2, 2),
        NOP,
        beq(1, 3, 1),
        add(4, 2, 2),
        add(5, 2, 2),
        HALT,
    ];
    let mut pipeline =
        Machine::new(&program).reg(2, 5).reg(3, 10).pipeline();
    run_to_halt(&mut pipeline);

    let cpu = pipeline.cpu();
    assert_eq!(cpu.gpr.read(4), 10);
    assert_eq!(cpu.gpr.read(5), 0);
    assert_eq!(cpu.history.equality_forward_count, 1);
    assert_eq!(cpu.history.stall_count, 0);
}

#[test]
fn branch_on_execute_producer_stalls() {
    let program =
        [add(1, 2, 2), beq(1, 3, 1), add(4, 2, 2), add(5, 2, 2), HALT];
    let machine = Machine::new(&program).reg(2, 5).reg(3, 10);

    let mut pipeline = machine.pipeline();
    assert_eq!(
        next_stall(&mut pipeline, 10),
        Some(Hazard::BranchOnExecute { reg: 1 })
    );
    run_to_halt(&mut pipeline);
    assert_eq!(pipeline.cpu().gpr.read(5), 0);

    let mut reference = machine.single_cycle();
    run_to_halt(&mut reference);
    assert_eq!(pipeline.cpu().gpr, reference.cpu().gpr);
}

#[test]
fn branch_on_load_stalls_twice() {
    // beq at 4 targets 4 + 8 + 4
    let program = [lw(1, 0, 0), beq(1, 2, 1), NOP, add(5, 2, 2), HALT];
    let mut pipeline =
        Machine::new(&program).word(0, 3).reg(2, 3).pipeline();

    assert_eq!(
        next_stall(&mut pipeline, 10),
        Some(Hazard::LoadUse { reg: 1 })
    );
    assert_eq!(
        next_stall(&mut pipeline, 1),
        Some(Hazard::BranchOnLoad { reg: 1 })
    );
    run_to_halt(&mut pipeline);
    assert_eq!(pipeline.cpu().gpr.read(5), 0);
    assert_eq!(pipeline.cpu().history.stall_count, 2);
}

// Without the interlock the datapath has two latent hazards. These tests
// pin the stale results so a change in forwarding is noticed.

#[test]
fn forward_only_branch_compares_stale_register() {
    let program =
        [add(1, 2, 2), beq(1, 3, 1), add(4, 2, 2), add(5, 2, 2), HALT];
    let mut pipeline =
        Machine::new(&program).reg(2, 5).reg(3, 10).forward_only();
    run_to_halt(&mut pipeline);

    // $1 was still 0 when the branch compared, so it fell through
    assert_eq!(pipeline.cpu().gpr.read(5), 10);
    assert_eq!(pipeline.cpu().history.stall_count, 0);
}

#[test]
fn forward_only_load_use_sees_address() {
    let program = [lw(1, 0x40, 0), add(4, 1, 0), HALT];
    let mut pipeline = Machine::new(&program).word(0x40, 7).forward_only();
    run_to_halt(&mut pipeline);

    // The bypass carried the effective address instead of the loaded word
    assert_eq!(pipeline.cpu().gpr.read(4), 0x40);
    assert_eq!(pipeline.cpu().gpr.read(1), 7);
}

#[test]
fn forward_only_never_stalls() {
    let program = [lw(1, 0, 0), add(4, 1, 1), beq(4, 1, 0), HALT];
    let mut pipeline = Machine::new(&program).forward_only();
    assert_eq!(next_stall(&mut pipeline, 20), None);
}
