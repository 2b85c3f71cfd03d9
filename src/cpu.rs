use bitflags::bitflags;
use thiserror::Error;

use crate::bus::Bus;
use crate::cpu::opcodes::{AddressingMode, Mnemonic, Opcode, DECODE_TABLE};

pub mod opcodes;

const STACK_BASE_ADDR: u16 = 0x0100;
const NMI_VECTOR_ADDR: u16 = 0xFFFA;
const RESET_VECTOR_ADDR: u16 = 0xFFFC;
const IRQ_VECTOR_ADDR: u16 = 0xFFFE;
const SP_AFTER_RESET: u8 = 0xFD;

bitflags! {
    /* https://www.nesdev.org/wiki/Status_flags
           7  bit  0
        ---- ----
        NV1B DIZC
        |||| ||||
        |||| |||+- Carry
        |||| ||+-- Zero
        |||| |+--- Interrupt Disable
        |||| +---- Decimal (storage only on the NES variant)
        |||+------ Break (only exists in pushed copies)
        ||+------- Unused (always reads back as 1)
        |+-------- Overflow
        +--------- Negative
    */
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Flags: u8 {
        const CARRY             = 1 << 0;
        const ZERO              = 1 << 1;
        const INTERRUPT_DISABLE = 1 << 2;
        const DECIMAL_MODE      = 1 << 3;
        const BREAK             = 1 << 4;
        const UNUSED            = 1 << 5;
        const OVERFLOW          = 1 << 6;
        const NEGATIVE          = 1 << 7;
    }
}

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("illegal opcode ${0:02X}")]
    IllegalOpcode(u8),
}

/// Instruction-stepped 6502 core. One `step()` runs exactly one instruction
/// and reports how many cycles it took; `cycles` keeps the running total so
/// other subsystems can synchronize against it.
///
/// The CPU only borrows the bus; the bus (and the cartridge behind it) stay
/// owned by the host driver and outlive the CPU.
pub struct Cpu<'a> {
    pub register_a: u8,
    pub register_x: u8,
    pub register_y: u8,
    pub stack_pointer: u8,
    pub status: Flags,
    pub program_counter: u16,

    /// Raised by an external vblank source (a future PPU); polled at the
    /// top of every step.
    pub nmi_pending: bool,

    /// Cycles elapsed since reset.
    pub cycles: u64,

    addr_mode: AddressingMode,
    operand_addr: u16,
    curr_cycles: u8,
    page_crossed: bool,

    bus: &'a mut Bus,
}

fn is_page_crossed(addr1: u16, addr2: u16) -> bool {
    addr1 & 0xFF00 != addr2 & 0xFF00
}

impl<'a> Cpu<'a> {
    pub fn new(bus: &'a mut Bus) -> Cpu<'a> {
        Cpu {
            register_a: 0,
            register_x: 0,
            register_y: 0,
            stack_pointer: 0,
            status: Flags::empty(),
            program_counter: 0,
            nmi_pending: false,
            cycles: 0,
            addr_mode: AddressingMode::Implied,
            operand_addr: 0,
            curr_cycles: 0,
            page_crossed: false,
            bus,
        }
    }

    /// Power-on/reset sequence: registers cleared, SP at $FD, only the
    /// interrupt-disable and unused bits set, PC fetched from $FFFC.
    /// The hardware burns 7 cycles doing this.
    pub fn reset(&mut self) {
        self.register_a = 0;
        self.register_x = 0;
        self.register_y = 0;
        self.stack_pointer = SP_AFTER_RESET;
        self.status = Flags::INTERRUPT_DISABLE | Flags::UNUSED;
        self.program_counter = self.bus.read_u16(RESET_VECTOR_ADDR);
        self.cycles += 7;
    }

    /// Executes one instruction and returns its cycle cost. A pending NMI
    /// is serviced instead (7 cycles) before any opcode is fetched.
    pub fn step(&mut self) -> Result<u8, CpuError> {
        if self.nmi_pending {
            self.nmi_pending = false;
            return Ok(self.interrupt(NMI_VECTOR_ADDR));
        }

        self.curr_cycles = 0;
        self.page_crossed = false;

        let code = self.fetch_byte();
        let opcode = DECODE_TABLE[code as usize].ok_or(CpuError::IllegalOpcode(code))?;
        self.execute(opcode);

        self.cycles += self.curr_cycles as u64;
        Ok(self.curr_cycles)
    }

    /// One-line state dump for the instruction about to execute, in the
    /// usual trace-log shape.
    pub fn trace_line(&self) -> String {
        let code = self.bus.read(self.program_counter);
        let mnemonic = DECODE_TABLE[code as usize].map_or("???", |op| op.mnemonic.as_str());
        format!(
            "{:04X}  {:02X} {:>4}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.program_counter,
            code,
            mnemonic,
            self.register_a,
            self.register_x,
            self.register_y,
            self.status.bits(),
            self.stack_pointer,
            self.cycles,
        )
    }

    fn execute(&mut self, opcode: &Opcode) {
        self.addr_mode = opcode.mode;
        self.operand_addr = match opcode.mode {
            AddressingMode::Accumulator | AddressingMode::Implied => 0,
            AddressingMode::Immediate | AddressingMode::Relative => self.resolve_immediate(),
            AddressingMode::Absolute => self.resolve_absolute(0),
            AddressingMode::AbsoluteX => self.resolve_absolute(self.register_x),
            AddressingMode::AbsoluteY => self.resolve_absolute(self.register_y),
            AddressingMode::ZeroPage => self.resolve_zeropage(0),
            AddressingMode::ZeroPageX => self.resolve_zeropage(self.register_x),
            AddressingMode::ZeroPageY => self.resolve_zeropage(self.register_y),
            AddressingMode::Indirect => self.resolve_indirect(),
            AddressingMode::IndirectX => self.resolve_preindexed_indirect(),
            AddressingMode::IndirectY => self.resolve_postindexed_indirect(),
        };

        // Base cycles first; branch and page-cross bonuses land on top.
        self.curr_cycles += opcode.cycles;

        match opcode.mnemonic {
            Mnemonic::Lda => self.lda(),
            Mnemonic::Ldx => self.ldx(),
            Mnemonic::Ldy => self.ldy(),
            Mnemonic::Sta => self.sta(),
            Mnemonic::Stx => self.stx(),
            Mnemonic::Sty => self.sty(),
            Mnemonic::Tax => self.tax(),
            Mnemonic::Tay => self.tay(),
            Mnemonic::Tsx => self.tsx(),
            Mnemonic::Txa => self.txa(),
            Mnemonic::Txs => self.txs(),
            Mnemonic::Tya => self.tya(),
            Mnemonic::Pha => self.pha(),
            Mnemonic::Php => self.php(),
            Mnemonic::Pla => self.pla(),
            Mnemonic::Plp => self.plp(),
            Mnemonic::And => self.and(),
            Mnemonic::Ora => self.ora(),
            Mnemonic::Eor => self.eor(),
            Mnemonic::Bit => self.bit(),
            Mnemonic::Asl => self.asl(),
            Mnemonic::Lsr => self.lsr(),
            Mnemonic::Rol => self.rol(),
            Mnemonic::Ror => self.ror(),
            Mnemonic::Adc => self.adc(),
            Mnemonic::Sbc => self.sbc(),
            Mnemonic::Cmp => self.cmp(),
            Mnemonic::Cpx => self.cpx(),
            Mnemonic::Cpy => self.cpy(),
            Mnemonic::Inc => self.inc(),
            Mnemonic::Inx => self.inx(),
            Mnemonic::Iny => self.iny(),
            Mnemonic::Dec => self.dec(),
            Mnemonic::Dex => self.dex(),
            Mnemonic::Dey => self.dey(),
            Mnemonic::Bpl => self.bpl(),
            Mnemonic::Bmi => self.bmi(),
            Mnemonic::Bvc => self.bvc(),
            Mnemonic::Bvs => self.bvs(),
            Mnemonic::Bcc => self.bcc(),
            Mnemonic::Bcs => self.bcs(),
            Mnemonic::Bne => self.bne(),
            Mnemonic::Beq => self.beq(),
            Mnemonic::Jmp => self.jmp(),
            Mnemonic::Jsr => self.jsr(),
            Mnemonic::Rts => self.rts(),
            Mnemonic::Rti => self.rti(),
            Mnemonic::Brk => self.brk(),
            Mnemonic::Clc => self.status.remove(Flags::CARRY),
            Mnemonic::Sec => self.status.insert(Flags::CARRY),
            Mnemonic::Cli => self.status.remove(Flags::INTERRUPT_DISABLE),
            Mnemonic::Sei => self.status.insert(Flags::INTERRUPT_DISABLE),
            Mnemonic::Clv => self.status.remove(Flags::OVERFLOW),
            Mnemonic::Cld => self.status.remove(Flags::DECIMAL_MODE),
            Mnemonic::Sed => self.status.insert(Flags::DECIMAL_MODE),
            Mnemonic::Nop => {}
        }

        if opcode.page_cross && self.page_crossed {
            self.curr_cycles += 1;
        }
    }

    /// Pushes PC and the status copy (B clear, U set), disables interrupts
    /// and vectors through the given address.
    fn interrupt(&mut self, vector: u16) -> u8 {
        self.push_stack((self.program_counter >> 8) as u8);
        self.push_stack(self.program_counter as u8);
        self.push_stack(((self.status - Flags::BREAK) | Flags::UNUSED).bits());
        self.status.insert(Flags::INTERRUPT_DISABLE);
        self.program_counter = self.bus.read_u16(vector);
        self.cycles += 7;
        7
    }

    fn fetch_byte(&mut self) -> u8 {
        let byte = self.bus.read(self.program_counter);
        self.program_counter = self.program_counter.wrapping_add(1);
        byte
    }

    fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        hi << 8 | lo
    }

    // Addressing-mode resolution. Each resolver consumes the instruction's
    // operand bytes and leaves the effective address behind; the indexed
    // absolute and postindexed modes also record whether a page was crossed.

    fn resolve_immediate(&mut self) -> u16 {
        let addr = self.program_counter;
        self.program_counter = self.program_counter.wrapping_add(1);
        addr
    }

    fn resolve_zeropage(&mut self, offset: u8) -> u16 {
        self.fetch_byte().wrapping_add(offset) as u16
    }

    fn resolve_absolute(&mut self, offset: u8) -> u16 {
        let base = self.fetch_word();
        let effective = base.wrapping_add(offset as u16);
        self.page_crossed = is_page_crossed(base, effective);
        effective
    }

    fn resolve_indirect(&mut self) -> u16 {
        let pointer = self.fetch_word();
        self.read_wrapped_page(pointer)
    }

    fn resolve_preindexed_indirect(&mut self) -> u16 {
        let pointer = self.fetch_byte().wrapping_add(self.register_x) as u16;
        self.read_wrapped_page(pointer)
    }

    fn resolve_postindexed_indirect(&mut self) -> u16 {
        let pointer = self.fetch_byte() as u16;
        let base = self.read_wrapped_page(pointer);
        let effective = base.wrapping_add(self.register_y as u16);
        self.page_crossed = is_page_crossed(base, effective);
        effective
    }

    /// 16-bit pointer fetch with the hardware quirk: a pointer whose low
    /// byte sits at $xxFF takes its high byte from $xx00, not $(xx+1)00.
    fn read_wrapped_page(&self, addr: u16) -> u16 {
        let lo = self.bus.read(addr) as u16;
        let hi_addr = if addr & 0x00FF == 0x00FF {
            addr & 0xFF00
        } else {
            addr + 1
        };
        let hi = self.bus.read(hi_addr) as u16;
        hi << 8 | lo
    }

    /// The operand value: the accumulator itself in accumulator mode,
    /// otherwise the byte at the resolved address.
    fn operand(&self) -> u8 {
        if self.addr_mode == AddressingMode::Accumulator {
            self.register_a
        } else {
            self.bus.read(self.operand_addr)
        }
    }

    fn store_operand(&mut self, value: u8) {
        if self.addr_mode == AddressingMode::Accumulator {
            self.register_a = value;
        } else {
            self.bus.write(self.operand_addr, value);
        }
    }

    fn push_stack(&mut self, value: u8) {
        self.bus
            .write(STACK_BASE_ADDR | self.stack_pointer as u16, value);
        self.stack_pointer = self.stack_pointer.wrapping_sub(1);
    }

    fn pop_stack(&mut self) -> u8 {
        self.stack_pointer = self.stack_pointer.wrapping_add(1);
        self.bus.read(STACK_BASE_ADDR | self.stack_pointer as u16)
    }

    fn set_nz_flags(&mut self, value: u8) {
        self.status.set(Flags::ZERO, value == 0);
        self.status.set(Flags::NEGATIVE, value & 0x80 != 0);
    }

    // Loads and stores

    fn lda(&mut self) {
        self.register_a = self.operand();
        self.set_nz_flags(self.register_a);
    }

    fn ldx(&mut self) {
        self.register_x = self.operand();
        self.set_nz_flags(self.register_x);
    }

    fn ldy(&mut self) {
        self.register_y = self.operand();
        self.set_nz_flags(self.register_y);
    }

    fn sta(&mut self) {
        self.store_operand(self.register_a);
    }

    fn stx(&mut self) {
        self.store_operand(self.register_x);
    }

    fn sty(&mut self) {
        self.store_operand(self.register_y);
    }

    // Transfers

    fn tax(&mut self) {
        self.register_x = self.register_a;
        self.set_nz_flags(self.register_x);
    }

    fn tay(&mut self) {
        self.register_y = self.register_a;
        self.set_nz_flags(self.register_y);
    }

    fn tsx(&mut self) {
        self.register_x = self.stack_pointer;
        self.set_nz_flags(self.register_x);
    }

    fn txa(&mut self) {
        self.register_a = self.register_x;
        self.set_nz_flags(self.register_a);
    }

    // TXS is the one transfer that leaves the flags alone
    fn txs(&mut self) {
        self.stack_pointer = self.register_x;
    }

    fn tya(&mut self) {
        self.register_a = self.register_y;
        self.set_nz_flags(self.register_a);
    }

    // Stack operations

    fn pha(&mut self) {
        self.push_stack(self.register_a);
    }

    fn php(&mut self) {
        // the pushed copy carries B and U set; the live register never
        // holds B
        self.push_stack((self.status | Flags::BREAK | Flags::UNUSED).bits());
    }

    fn pla(&mut self) {
        self.register_a = self.pop_stack();
        self.set_nz_flags(self.register_a);
    }

    fn plp(&mut self) {
        let mut flags = Flags::from_bits_truncate(self.pop_stack());
        flags.remove(Flags::BREAK);
        flags.insert(Flags::UNUSED);
        self.status = flags;
    }

    // Logical operations

    fn and(&mut self) {
        self.register_a &= self.operand();
        self.set_nz_flags(self.register_a);
    }

    fn ora(&mut self) {
        self.register_a |= self.operand();
        self.set_nz_flags(self.register_a);
    }

    fn eor(&mut self) {
        self.register_a ^= self.operand();
        self.set_nz_flags(self.register_a);
    }

    fn bit(&mut self) {
        let operand = self.operand();
        self.status.set(Flags::ZERO, self.register_a & operand == 0);
        self.status.set(Flags::OVERFLOW, operand & 0x40 != 0);
        self.status.set(Flags::NEGATIVE, operand & 0x80 != 0);
    }

    // Shifts and rotates

    fn asl(&mut self) {
        let operand = self.operand();
        let result = operand << 1;
        self.status.set(Flags::CARRY, operand & 0x80 != 0);
        self.set_nz_flags(result);
        self.store_operand(result);
    }

    fn lsr(&mut self) {
        let operand = self.operand();
        let result = operand >> 1;
        self.status.set(Flags::CARRY, operand & 0x01 != 0);
        self.set_nz_flags(result);
        self.store_operand(result);
    }

    fn rol(&mut self) {
        let operand = self.operand();
        let carry_in = self.status.contains(Flags::CARRY) as u8;
        let result = operand << 1 | carry_in;
        self.status.set(Flags::CARRY, operand & 0x80 != 0);
        self.set_nz_flags(result);
        self.store_operand(result);
    }

    fn ror(&mut self) {
        let operand = self.operand();
        let carry_in = self.status.contains(Flags::CARRY) as u8;
        let result = operand >> 1 | carry_in << 7;
        self.status.set(Flags::CARRY, operand & 0x01 != 0);
        self.set_nz_flags(result);
        self.store_operand(result);
    }

    // Arithmetic

    fn add_to_accumulator(&mut self, operand: u8) {
        let carry_in = self.status.contains(Flags::CARRY) as u16;
        let sum = self.register_a as u16 + operand as u16 + carry_in;
        self.status.set(Flags::CARRY, sum > 0xFF);
        let result = sum as u8;
        self.status.set(
            Flags::OVERFLOW,
            (self.register_a ^ result) & (operand ^ result) & 0x80 != 0,
        );
        self.register_a = result;
        self.set_nz_flags(result);
    }

    fn adc(&mut self) {
        let operand = self.operand();
        self.add_to_accumulator(operand);
    }

    // subtraction is addition of the inverted operand; decimal mode does
    // not exist on this part
    fn sbc(&mut self) {
        let operand = self.operand();
        self.add_to_accumulator(operand ^ 0xFF);
    }

    // Compares

    fn compare(&mut self, register: u8) {
        let operand = self.operand();
        self.status.set(Flags::CARRY, register >= operand);
        self.set_nz_flags(register.wrapping_sub(operand));
    }

    fn cmp(&mut self) {
        self.compare(self.register_a);
    }

    fn cpx(&mut self) {
        self.compare(self.register_x);
    }

    fn cpy(&mut self) {
        self.compare(self.register_y);
    }

    // Increments and decrements

    fn inc(&mut self) {
        let result = self.operand().wrapping_add(1);
        self.set_nz_flags(result);
        self.store_operand(result);
    }

    fn inx(&mut self) {
        self.register_x = self.register_x.wrapping_add(1);
        self.set_nz_flags(self.register_x);
    }

    fn iny(&mut self) {
        self.register_y = self.register_y.wrapping_add(1);
        self.set_nz_flags(self.register_y);
    }

    fn dec(&mut self) {
        let result = self.operand().wrapping_sub(1);
        self.set_nz_flags(result);
        self.store_operand(result);
    }

    fn dex(&mut self) {
        self.register_x = self.register_x.wrapping_sub(1);
        self.set_nz_flags(self.register_x);
    }

    fn dey(&mut self) {
        self.register_y = self.register_y.wrapping_sub(1);
        self.set_nz_flags(self.register_y);
    }

    // Branches: +1 cycle when taken, +1 more when the target sits on a
    // different page than the instruction that follows the branch.

    fn branch(&mut self, condition: bool) {
        let offset = self.operand() as i8;
        if !condition {
            return;
        }
        self.curr_cycles += 1;
        let target = self.program_counter.wrapping_add(offset as u16);
        if is_page_crossed(self.program_counter, target) {
            self.curr_cycles += 1;
        }
        self.program_counter = target;
    }

    fn bpl(&mut self) {
        self.branch(!self.status.contains(Flags::NEGATIVE));
    }

    fn bmi(&mut self) {
        self.branch(self.status.contains(Flags::NEGATIVE));
    }

    fn bvc(&mut self) {
        self.branch(!self.status.contains(Flags::OVERFLOW));
    }

    fn bvs(&mut self) {
        self.branch(self.status.contains(Flags::OVERFLOW));
    }

    fn bcc(&mut self) {
        self.branch(!self.status.contains(Flags::CARRY));
    }

    fn bcs(&mut self) {
        self.branch(self.status.contains(Flags::CARRY));
    }

    fn bne(&mut self) {
        self.branch(!self.status.contains(Flags::ZERO));
    }

    fn beq(&mut self) {
        self.branch(self.status.contains(Flags::ZERO));
    }

    // Jumps, calls and interrupts

    fn jmp(&mut self) {
        self.program_counter = self.operand_addr;
    }

    fn jsr(&mut self) {
        let return_addr = self.program_counter.wrapping_sub(1);
        self.push_stack((return_addr >> 8) as u8);
        self.push_stack(return_addr as u8);
        self.program_counter = self.operand_addr;
    }

    fn rts(&mut self) {
        let lo = self.pop_stack() as u16;
        let hi = self.pop_stack() as u16;
        self.program_counter = (hi << 8 | lo).wrapping_add(1);
    }

    fn rti(&mut self) {
        self.plp();
        let lo = self.pop_stack() as u16;
        let hi = self.pop_stack() as u16;
        self.program_counter = hi << 8 | lo;
    }

    fn brk(&mut self) {
        // the byte after BRK is a padding/signature byte the return
        // address skips over
        let return_addr = self.program_counter.wrapping_add(1);
        self.push_stack((return_addr >> 8) as u8);
        self.push_stack(return_addr as u8);
        self.push_stack((self.status | Flags::BREAK).bits());
        self.status.insert(Flags::INTERRUPT_DISABLE);
        self.program_counter = self.bus.read_u16(IRQ_VECTOR_ADDR);
    }
}
