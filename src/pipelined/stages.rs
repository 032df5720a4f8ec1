//! 5 stages adapted for pipelined execution.
//! Each stage reads only the latched output sides in `current`
//! and returns the input side of its downstream register.

use tracing::debug;

use super::pipeline::EXMEMRegister;
use super::pipeline::IDEXRegister;
use super::pipeline::IFIDRegister;
use super::pipeline::MEMWBRegister;
use super::pipeline::PipelineState;
use crate::memory::DataMemory;
use crate::memory::InstructionMemory;
use crate::register_file::RegisterFile;
use crate::stages_simple;

/// IF stage
pub fn instruction_fetch(
    current: &PipelineState,
    imem: &InstructionMemory,
) -> IFIDRegister {
    let pc = current.id_ex.next_pc;
    let raw_inst = stages_simple::instruction_fetch(pc, imem);

    debug!("IF: PC {:#010x}; instruction {:#010x}", pc, raw_inst);

    IFIDRegister { raw_inst }
}

/// ID stage, including the equality unit and next-PC selection
pub fn instruction_decode(
    current: &PipelineState,
    gpr: &RegisterFile,
) -> IDEXRegister {
    let inst = stages_simple::instruction_decode(current.if_id.raw_inst);
    let pc = current.id_ex.next_pc;

    let (rs_data, rt_data) = stages_simple::register_read(&inst, gpr);

    // The branch compares one cycle before EX would see these values,
    // so the ALU result in MEM is bypassed here. A producer still in
    // EX cannot be covered; see PipelineState::hazard.
    let equality_rs = if current.equality_forward_rs(&inst) {
        debug!("Forwarding RS from MEM to equality unit");
        current.ex_mem.alu_result
    } else {
        rs_data
    };
    let equality_rt = if current.equality_forward_rt(&inst) {
        debug!("Forwarding RT from MEM to equality unit");
        current.ex_mem.alu_result
    } else {
        rt_data
    };

    let next_pc =
        stages_simple::next_pc(&inst, pc, equality_rs == equality_rt);

    if inst.controls.branch || inst.controls.jump {
        debug!(
            "ID: {:?} at PC {:#010x} selects {:#010x}",
            inst.function, pc, next_pc
        );
    }

    IDEXRegister { inst, rs_data, rt_data, next_pc }
}

/// EX stage, including the forwarding unit
pub fn execute(current: &PipelineState) -> EXMEMRegister {
    let inst = current.id_ex.inst;

    // MEM hazard -> WB hazard -> Data in the register
    let op1 = if current.ex_mem_forward_rs() {
        debug!("Forwarding RS from MEM to ALU input");
        current.ex_mem.alu_result
    } else if current.mem_wb_forward_rs() {
        debug!("Forwarding RS from WB to ALU input");
        current.mem_wb.wb_result
    } else {
        current.id_ex.rs_data
    };

    let op2 = if current.ex_mem_forward_rt() {
        debug!("Forwarding RT from MEM to ALU input");
        current.ex_mem.alu_result
    } else if current.mem_wb_forward_rt() {
        debug!("Forwarding RT from WB to ALU input");
        current.mem_wb.wb_result
    } else {
        current.id_ex.rt_data
    };

    let alu_result = stages_simple::execute(&inst, op1, op2);

    EXMEMRegister {
        inst,
        alu_result,
        rt_data: op2,
        reg_num: stages_simple::destination(&inst),
    }
}

/// MEM stage
pub fn memory_access(
    current: &PipelineState,
    dmem: &mut DataMemory,
) -> MEMWBRegister {
    let ex_mem = current.ex_mem;

    let wb_result = stages_simple::memory_access(
        &ex_mem.inst,
        dmem,
        ex_mem.alu_result,
        ex_mem.rt_data,
    );

    MEMWBRegister { inst: ex_mem.inst, reg_num: ex_mem.reg_num, wb_result }
}

/// WB stage
pub fn write_back(current: &PipelineState, gpr: &mut RegisterFile) {
    let mem_wb = current.mem_wb;

    stages_simple::write_back(
        &mem_wb.inst,
        gpr,
        mem_wb.reg_num,
        mem_wb.wb_result,
    );
}
