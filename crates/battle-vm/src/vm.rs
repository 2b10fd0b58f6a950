//! Single-step interpreter.
//!
//! [`step`] decodes and executes exactly one instruction against an
//! [`Agent`] and an [`Arena`]. It never fails: the only "failure" mode,
//! an invalid opcode, is handled as silent death of the executing agent.

use battle_arena::Arena;

use crate::agent::Agent;
use crate::isa::{Opcode, IMMEDIATE_LEN};

/// Execute one instruction for `agent` against `arena`.
///
/// Does nothing if `agent.alive` is already `false` — the kernel is
/// expected to skip dead agents itself, but this keeps the function total
/// and safe to call unconditionally.
pub fn step(agent: &mut Agent, arena: &mut Arena) {
    if !agent.alive {
        return;
    }

    let ip = arena.wrap(agent.pc);
    let Some(opcode) = Opcode::decode(arena.read_byte(ip)) else {
        agent.alive = false;
        return;
    };

    match opcode {
        Opcode::Nop => {
            agent.pc = arena.wrap(ip.wrapping_add(1));
        }
        Opcode::Halt => {
            agent.alive = false;
        }
        Opcode::Mov => {
            agent.regs.a = read_immediate(arena, ip);
            agent.pc = advance_past_immediate(arena, ip);
        }
        Opcode::Add => {
            agent.regs.a = agent.regs.a.wrapping_add(read_immediate(arena, ip));
            agent.regs.z = (agent.regs.a == 0) as u32;
            agent.pc = advance_past_immediate(arena, ip);
        }
        Opcode::Load => {
            let addr = arena.wrap(read_immediate(arena, ip));
            agent.regs.a = arena.read_byte(addr) as u32;
            agent.regs.z = (agent.regs.a == 0) as u32;
            agent.pc = advance_past_immediate(arena, ip);
        }
        Opcode::Store => {
            let addr = arena.wrap(read_immediate(arena, ip));
            arena.write_byte(addr, agent.regs.a as u8, &agent.id);
            agent.mem_writes += 1;
            agent.pc = advance_past_immediate(arena, ip);
        }
        Opcode::Jmp => {
            agent.pc = arena.wrap(read_immediate(arena, ip));
        }
        Opcode::Jz => {
            let target = arena.wrap(read_immediate(arena, ip));
            agent.pc = if agent.regs.z == 1 {
                target
            } else {
                advance_past_immediate(arena, ip)
            };
        }
        Opcode::Movp => {
            agent.regs.p = read_immediate(arena, ip);
            agent.pc = advance_past_immediate(arena, ip);
        }
        Opcode::Addp => {
            agent.regs.p = agent.regs.p.wrapping_add(read_immediate(arena, ip));
            agent.pc = advance_past_immediate(arena, ip);
        }
        Opcode::Loadi => {
            let addr = arena.wrap(agent.regs.p);
            agent.regs.a = arena.read_byte(addr) as u32;
            agent.regs.z = (agent.regs.a == 0) as u32;
            agent.pc = arena.wrap(ip.wrapping_add(1));
        }
        Opcode::Storei => {
            let addr = arena.wrap(agent.regs.p);
            arena.write_byte(addr, agent.regs.a as u8, &agent.id);
            agent.mem_writes += 1;
            agent.pc = arena.wrap(ip.wrapping_add(1));
        }
    }
}

/// Read the 4-byte little-endian immediate following the opcode byte at
/// `ip`, with each byte individually wrapped around the arena.
fn read_immediate(arena: &Arena, ip: u32) -> u32 {
    arena.read_u32_le(ip.wrapping_add(1))
}

/// `pc` after an opcode-plus-immediate instruction: `ip + 1 + IMMEDIATE_LEN`,
/// wrapped.
fn advance_past_immediate(arena: &Arena, ip: u32) -> u32 {
    arena.wrap(ip.wrapping_add(1 + IMMEDIATE_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::AgentId;

    fn agent(pc: u32) -> Agent {
        Agent::new(AgentId::new("A"), pc, (pc, pc))
    }

    fn encode(op: u8, imm: Option<u32>) -> Vec<u8> {
        let mut bytes = vec![op];
        if let Some(v) = imm {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn nop_advances_pc_by_one() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(0, None));
        let mut a = agent(0);
        step(&mut a, &mut arena);
        assert_eq!(a.pc, 1);
        assert!(a.alive);
    }

    #[test]
    fn mov_loads_accumulator_and_advances_five() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(1, Some(0x1234_5678)));
        let mut a = agent(0);
        step(&mut a, &mut arena);
        assert_eq!(a.regs.a, 0x1234_5678);
        assert_eq!(a.pc, 5);
    }

    #[test]
    fn add_wraps_mod_2_32_and_sets_zero_flag() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(2, Some(1)));
        let mut a = agent(0);
        a.regs.a = u32::MAX;
        step(&mut a, &mut arena);
        assert_eq!(a.regs.a, 0);
        assert_eq!(a.regs.z, 1);
    }

    #[test]
    fn load_sets_accumulator_and_zero_flag_from_memory() {
        let mut arena = Arena::new(256).unwrap();
        arena.write_byte(50, 0, &AgentId::new("X"));
        arena.load_code(&AgentId::new("A"), 0, &encode(3, Some(50)));
        let mut a = agent(0);
        step(&mut a, &mut arena);
        assert_eq!(a.regs.a, 0);
        assert_eq!(a.regs.z, 1);
    }

    #[test]
    fn store_tags_writer_and_counts_mem_write() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(4, Some(100)));
        let mut a = agent(0);
        a.regs.a = 0xAB;
        step(&mut a, &mut arena);
        assert_eq!(arena.read_byte(100), 0xAB);
        assert_eq!(arena.writer_at(100), Some(&AgentId::new("A")));
        assert_eq!(a.mem_writes, 1);
    }

    #[test]
    fn jmp_sets_pc_directly_mod_arena() {
        let mut arena = Arena::new(16).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(5, Some(20)));
        let mut a = agent(0);
        step(&mut a, &mut arena);
        assert_eq!(a.pc, 4);
    }

    #[test]
    fn jz_branches_only_when_zero_flag_set() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(6, Some(200)));
        let mut not_taken = agent(0);
        not_taken.regs.z = 0;
        step(&mut not_taken, &mut arena);
        assert_eq!(not_taken.pc, 5);

        let mut taken = agent(0);
        taken.regs.z = 1;
        step(&mut taken, &mut arena);
        assert_eq!(taken.pc, 200);
    }

    #[test]
    fn halt_kills_the_agent() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(7, None));
        let mut a = agent(0);
        step(&mut a, &mut arena);
        assert!(!a.alive);
    }

    #[test]
    fn movp_and_addp_do_not_touch_zero_flag() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(8, Some(10)));
        let mut a = agent(0);
        a.regs.z = 1;
        step(&mut a, &mut arena);
        assert_eq!(a.regs.p, 10);
        assert_eq!(a.regs.z, 1, "movp must not modify Z");

        arena.load_code(&AgentId::new("A"), 5, &encode(9, Some(5)));
        a.pc = 5;
        a.regs.z = 1;
        step(&mut a, &mut arena);
        assert_eq!(a.regs.p, 15);
        assert_eq!(a.regs.z, 1, "addp must not modify Z");
    }

    #[test]
    fn loadi_and_storei_use_pointer_register_and_advance_by_one() {
        let mut arena = Arena::new(256).unwrap();
        arena.write_byte(40, 7, &AgentId::new("X"));
        arena.load_code(&AgentId::new("A"), 0, &encode(10, None));
        let mut a = agent(0);
        a.regs.p = 40;
        step(&mut a, &mut arena);
        assert_eq!(a.regs.a, 7);
        assert_eq!(a.pc, 1);

        arena.load_code(&AgentId::new("A"), 1, &encode(11, None));
        a.regs.a = 99;
        a.regs.p = 41;
        step(&mut a, &mut arena);
        assert_eq!(arena.read_byte(41), 99);
        assert_eq!(arena.writer_at(41), Some(&AgentId::new("A")));
        assert_eq!(a.pc, 2);
    }

    #[test]
    fn invalid_opcode_kills_silently() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(200, None));
        let mut a = agent(0);
        step(&mut a, &mut arena);
        assert!(!a.alive);
    }

    #[test]
    fn dead_agent_is_not_stepped() {
        let mut arena = Arena::new(256).unwrap();
        arena.load_code(&AgentId::new("A"), 0, &encode(1, Some(5)));
        let mut a = agent(0);
        a.alive = false;
        step(&mut a, &mut arena);
        assert_eq!(a.pc, 0);
        assert_eq!(a.regs.a, 0);
    }

    #[test]
    fn pc_wraps_around_small_arena() {
        let mut arena = Arena::new(16).unwrap();
        arena.load_code(&AgentId::new("A"), 14, &encode(1, Some(0xAA)));
        let mut a = agent(14);
        step(&mut a, &mut arena);
        assert_eq!(a.regs.a, 0xAA);
        assert_eq!(a.pc, 3);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pc_is_always_in_bounds_after_a_step(
            size in 16u32..512,
            pc in 0u32..4096,
            op in 0u8..12,
            imm in any::<u32>(),
        ) {
            let mut arena = Arena::new(size).unwrap();
            arena.load_code(&AgentId::new("A"), pc, &encode(op, Some(imm)));
            let mut a = agent(pc);
            step(&mut a, &mut arena);
            prop_assert!(a.pc < size);
        }

        #[test]
        fn mov_always_sets_accumulator_verbatim_regardless_of_starting_state(
            size in 16u32..512,
            pc in 0u32..4096,
            imm in any::<u32>(),
            starting_a in any::<u32>(),
        ) {
            let mut arena = Arena::new(size).unwrap();
            arena.load_code(&AgentId::new("A"), pc, &encode(1, Some(imm)));
            let mut a = agent(pc);
            a.regs.a = starting_a;
            step(&mut a, &mut arena);
            prop_assert_eq!(a.regs.a, imm);
        }

        #[test]
        fn zero_flag_always_matches_accumulator_after_add(
            size in 16u32..512,
            pc in 0u32..4096,
            starting_a in any::<u32>(),
            imm in any::<u32>(),
        ) {
            let mut arena = Arena::new(size).unwrap();
            arena.load_code(&AgentId::new("A"), pc, &encode(2, Some(imm)));
            let mut a = agent(pc);
            a.regs.a = starting_a;
            step(&mut a, &mut arena);
            prop_assert_eq!(a.regs.z == 1, a.regs.a == 0);
        }

        #[test]
        fn invalid_opcode_bytes_always_kill_without_panicking(
            size in 16u32..512,
            pc in 0u32..4096,
            byte in 12u8..=255,
        ) {
            let mut arena = Arena::new(size).unwrap();
            arena.load_code(&AgentId::new("A"), pc, &[byte]);
            let mut a = agent(pc);
            step(&mut a, &mut arena);
            prop_assert!(!a.alive);
        }
    }
}
