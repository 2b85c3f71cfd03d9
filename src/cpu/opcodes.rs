use once_cell::sync::Lazy;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Accumulator,
    Implied,
    Immediate,
    Absolute,
    ZeroPage,
    AbsoluteX,
    AbsoluteY,
    ZeroPageX,
    ZeroPageY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

impl Mnemonic {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC", Mnemonic::And => "AND", Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC", Mnemonic::Bcs => "BCS", Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT", Mnemonic::Bmi => "BMI", Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL", Mnemonic::Brk => "BRK", Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS", Mnemonic::Clc => "CLC", Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI", Mnemonic::Clv => "CLV", Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX", Mnemonic::Cpy => "CPY", Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX", Mnemonic::Dey => "DEY", Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC", Mnemonic::Inx => "INX", Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP", Mnemonic::Jsr => "JSR", Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX", Mnemonic::Ldy => "LDY", Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP", Mnemonic::Ora => "ORA", Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP", Mnemonic::Pla => "PLA", Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL", Mnemonic::Ror => "ROR", Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS", Mnemonic::Sbc => "SBC", Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED", Mnemonic::Sei => "SEI", Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX", Mnemonic::Sty => "STY", Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY", Mnemonic::Tsx => "TSX", Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS", Mnemonic::Tya => "TYA",
        }
    }
}

/// One decode-table entry: the documented behavior of a single opcode byte.
/// `page_cross` marks the entries whose base cycle count grows by one when
/// the resolved address crosses a page boundary.
pub struct Opcode {
    pub code: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
    pub page_cross: bool,
}

impl Opcode {
    pub const fn new(
        code: u8,
        mnemonic: Mnemonic,
        mode: AddressingMode,
        cycles: u8,
        page_cross: bool,
    ) -> Self {
        Self {
            code,
            mnemonic,
            mode,
            cycles,
            page_cross,
        }
    }
}

use self::AddressingMode as M;
use self::Mnemonic as Op;

#[rustfmt::skip]
const OPCODES: &[Opcode] = &[
    // Loads
    Opcode::new(0xA9, Op::Lda, M::Immediate, 2, false),
    Opcode::new(0xA5, Op::Lda, M::ZeroPage,  3, false),
    Opcode::new(0xB5, Op::Lda, M::ZeroPageX, 4, false),
    Opcode::new(0xAD, Op::Lda, M::Absolute,  4, false),
    Opcode::new(0xBD, Op::Lda, M::AbsoluteX, 4, true),
    Opcode::new(0xB9, Op::Lda, M::AbsoluteY, 4, true),
    Opcode::new(0xA1, Op::Lda, M::IndirectX, 6, false),
    Opcode::new(0xB1, Op::Lda, M::IndirectY, 5, true),

    Opcode::new(0xA2, Op::Ldx, M::Immediate, 2, false),
    Opcode::new(0xA6, Op::Ldx, M::ZeroPage,  3, false),
    Opcode::new(0xB6, Op::Ldx, M::ZeroPageY, 4, false),
    Opcode::new(0xAE, Op::Ldx, M::Absolute,  4, false),
    Opcode::new(0xBE, Op::Ldx, M::AbsoluteY, 4, true),

    Opcode::new(0xA0, Op::Ldy, M::Immediate, 2, false),
    Opcode::new(0xA4, Op::Ldy, M::ZeroPage,  3, false),
    Opcode::new(0xB4, Op::Ldy, M::ZeroPageX, 4, false),
    Opcode::new(0xAC, Op::Ldy, M::Absolute,  4, false),
    Opcode::new(0xBC, Op::Ldy, M::AbsoluteX, 4, true),

    // Stores
    Opcode::new(0x85, Op::Sta, M::ZeroPage,  3, false),
    Opcode::new(0x95, Op::Sta, M::ZeroPageX, 4, false),
    Opcode::new(0x8D, Op::Sta, M::Absolute,  4, false),
    Opcode::new(0x9D, Op::Sta, M::AbsoluteX, 5, false),
    Opcode::new(0x99, Op::Sta, M::AbsoluteY, 5, false),
    Opcode::new(0x81, Op::Sta, M::IndirectX, 6, false),
    Opcode::new(0x91, Op::Sta, M::IndirectY, 6, false),

    Opcode::new(0x86, Op::Stx, M::ZeroPage,  3, false),
    Opcode::new(0x96, Op::Stx, M::ZeroPageY, 4, false),
    Opcode::new(0x8E, Op::Stx, M::Absolute,  4, false),

    Opcode::new(0x84, Op::Sty, M::ZeroPage,  3, false),
    Opcode::new(0x94, Op::Sty, M::ZeroPageX, 4, false),
    Opcode::new(0x8C, Op::Sty, M::Absolute,  4, false),

    // Transfers
    Opcode::new(0xAA, Op::Tax, M::Implied, 2, false),
    Opcode::new(0xA8, Op::Tay, M::Implied, 2, false),
    Opcode::new(0xBA, Op::Tsx, M::Implied, 2, false),
    Opcode::new(0x8A, Op::Txa, M::Implied, 2, false),
    Opcode::new(0x9A, Op::Txs, M::Implied, 2, false),
    Opcode::new(0x98, Op::Tya, M::Implied, 2, false),

    // Stack
    Opcode::new(0x48, Op::Pha, M::Implied, 3, false),
    Opcode::new(0x08, Op::Php, M::Implied, 3, false),
    Opcode::new(0x68, Op::Pla, M::Implied, 4, false),
    Opcode::new(0x28, Op::Plp, M::Implied, 4, false),

    // Logical
    Opcode::new(0x29, Op::And, M::Immediate, 2, false),
    Opcode::new(0x25, Op::And, M::ZeroPage,  3, false),
    Opcode::new(0x35, Op::And, M::ZeroPageX, 4, false),
    Opcode::new(0x2D, Op::And, M::Absolute,  4, false),
    Opcode::new(0x3D, Op::And, M::AbsoluteX, 4, true),
    Opcode::new(0x39, Op::And, M::AbsoluteY, 4, true),
    Opcode::new(0x21, Op::And, M::IndirectX, 6, false),
    Opcode::new(0x31, Op::And, M::IndirectY, 5, true),

    Opcode::new(0x09, Op::Ora, M::Immediate, 2, false),
    Opcode::new(0x05, Op::Ora, M::ZeroPage,  3, false),
    Opcode::new(0x15, Op::Ora, M::ZeroPageX, 4, false),
    Opcode::new(0x0D, Op::Ora, M::Absolute,  4, false),
    Opcode::new(0x1D, Op::Ora, M::AbsoluteX, 4, true),
    Opcode::new(0x19, Op::Ora, M::AbsoluteY, 4, true),
    Opcode::new(0x01, Op::Ora, M::IndirectX, 6, false),
    Opcode::new(0x11, Op::Ora, M::IndirectY, 5, true),

    Opcode::new(0x49, Op::Eor, M::Immediate, 2, false),
    Opcode::new(0x45, Op::Eor, M::ZeroPage,  3, false),
    Opcode::new(0x55, Op::Eor, M::ZeroPageX, 4, false),
    Opcode::new(0x4D, Op::Eor, M::Absolute,  4, false),
    Opcode::new(0x5D, Op::Eor, M::AbsoluteX, 4, true),
    Opcode::new(0x59, Op::Eor, M::AbsoluteY, 4, true),
    Opcode::new(0x41, Op::Eor, M::IndirectX, 6, false),
    Opcode::new(0x51, Op::Eor, M::IndirectY, 5, true),

    Opcode::new(0x24, Op::Bit, M::ZeroPage, 3, false),
    Opcode::new(0x2C, Op::Bit, M::Absolute, 4, false),

    // Shifts
    Opcode::new(0x0A, Op::Asl, M::Accumulator, 2, false),
    Opcode::new(0x06, Op::Asl, M::ZeroPage,    5, false),
    Opcode::new(0x16, Op::Asl, M::ZeroPageX,   6, false),
    Opcode::new(0x0E, Op::Asl, M::Absolute,    6, false),
    Opcode::new(0x1E, Op::Asl, M::AbsoluteX,   7, false),

    Opcode::new(0x4A, Op::Lsr, M::Accumulator, 2, false),
    Opcode::new(0x46, Op::Lsr, M::ZeroPage,    5, false),
    Opcode::new(0x56, Op::Lsr, M::ZeroPageX,   6, false),
    Opcode::new(0x4E, Op::Lsr, M::Absolute,    6, false),
    Opcode::new(0x5E, Op::Lsr, M::AbsoluteX,   7, false),

    Opcode::new(0x2A, Op::Rol, M::Accumulator, 2, false),
    Opcode::new(0x26, Op::Rol, M::ZeroPage,    5, false),
    Opcode::new(0x36, Op::Rol, M::ZeroPageX,   6, false),
    Opcode::new(0x2E, Op::Rol, M::Absolute,    6, false),
    Opcode::new(0x3E, Op::Rol, M::AbsoluteX,   7, false),

    Opcode::new(0x6A, Op::Ror, M::Accumulator, 2, false),
    Opcode::new(0x66, Op::Ror, M::ZeroPage,    5, false),
    Opcode::new(0x76, Op::Ror, M::ZeroPageX,   6, false),
    Opcode::new(0x6E, Op::Ror, M::Absolute,    6, false),
    Opcode::new(0x7E, Op::Ror, M::AbsoluteX,   7, false),

    // Arithmetic
    Opcode::new(0x69, Op::Adc, M::Immediate, 2, false),
    Opcode::new(0x65, Op::Adc, M::ZeroPage,  3, false),
    Opcode::new(0x75, Op::Adc, M::ZeroPageX, 4, false),
    Opcode::new(0x6D, Op::Adc, M::Absolute,  4, false),
    Opcode::new(0x7D, Op::Adc, M::AbsoluteX, 4, true),
    Opcode::new(0x79, Op::Adc, M::AbsoluteY, 4, true),
    Opcode::new(0x61, Op::Adc, M::IndirectX, 6, false),
    Opcode::new(0x71, Op::Adc, M::IndirectY, 5, true),

    Opcode::new(0xE9, Op::Sbc, M::Immediate, 2, false),
    Opcode::new(0xE5, Op::Sbc, M::ZeroPage,  3, false),
    Opcode::new(0xF5, Op::Sbc, M::ZeroPageX, 4, false),
    Opcode::new(0xED, Op::Sbc, M::Absolute,  4, false),
    Opcode::new(0xFD, Op::Sbc, M::AbsoluteX, 4, true),
    Opcode::new(0xF9, Op::Sbc, M::AbsoluteY, 4, true),
    Opcode::new(0xE1, Op::Sbc, M::IndirectX, 6, false),
    Opcode::new(0xF1, Op::Sbc, M::IndirectY, 5, true),

    // Compares
    Opcode::new(0xC9, Op::Cmp, M::Immediate, 2, false),
    Opcode::new(0xC5, Op::Cmp, M::ZeroPage,  3, false),
    Opcode::new(0xD5, Op::Cmp, M::ZeroPageX, 4, false),
    Opcode::new(0xCD, Op::Cmp, M::Absolute,  4, false),
    Opcode::new(0xDD, Op::Cmp, M::AbsoluteX, 4, true),
    Opcode::new(0xD9, Op::Cmp, M::AbsoluteY, 4, true),
    Opcode::new(0xC1, Op::Cmp, M::IndirectX, 6, false),
    Opcode::new(0xD1, Op::Cmp, M::IndirectY, 5, true),

    Opcode::new(0xE0, Op::Cpx, M::Immediate, 2, false),
    Opcode::new(0xE4, Op::Cpx, M::ZeroPage,  3, false),
    Opcode::new(0xEC, Op::Cpx, M::Absolute,  4, false),

    Opcode::new(0xC0, Op::Cpy, M::Immediate, 2, false),
    Opcode::new(0xC4, Op::Cpy, M::ZeroPage,  3, false),
    Opcode::new(0xCC, Op::Cpy, M::Absolute,  4, false),

    // Increments
    Opcode::new(0xE6, Op::Inc, M::ZeroPage,  5, false),
    Opcode::new(0xF6, Op::Inc, M::ZeroPageX, 6, false),
    Opcode::new(0xEE, Op::Inc, M::Absolute,  6, false),
    Opcode::new(0xFE, Op::Inc, M::AbsoluteX, 7, false),

    Opcode::new(0xE8, Op::Inx, M::Implied, 2, false),
    Opcode::new(0xC8, Op::Iny, M::Implied, 2, false),

    // Decrements
    Opcode::new(0xC6, Op::Dec, M::ZeroPage,  5, false),
    Opcode::new(0xD6, Op::Dec, M::ZeroPageX, 6, false),
    Opcode::new(0xCE, Op::Dec, M::Absolute,  6, false),
    Opcode::new(0xDE, Op::Dec, M::AbsoluteX, 7, false),

    Opcode::new(0xCA, Op::Dex, M::Implied, 2, false),
    Opcode::new(0x88, Op::Dey, M::Implied, 2, false),

    // Jumps and subroutines
    Opcode::new(0x4C, Op::Jmp, M::Absolute, 3, false),
    Opcode::new(0x6C, Op::Jmp, M::Indirect, 5, false),
    Opcode::new(0x20, Op::Jsr, M::Absolute, 6, false),
    Opcode::new(0x60, Op::Rts, M::Implied,  6, false),
    Opcode::new(0x40, Op::Rti, M::Implied,  6, false),
    Opcode::new(0x00, Op::Brk, M::Implied,  7, false),

    // Branches
    Opcode::new(0x10, Op::Bpl, M::Relative, 2, false),
    Opcode::new(0x30, Op::Bmi, M::Relative, 2, false),
    Opcode::new(0x50, Op::Bvc, M::Relative, 2, false),
    Opcode::new(0x70, Op::Bvs, M::Relative, 2, false),
    Opcode::new(0x90, Op::Bcc, M::Relative, 2, false),
    Opcode::new(0xB0, Op::Bcs, M::Relative, 2, false),
    Opcode::new(0xD0, Op::Bne, M::Relative, 2, false),
    Opcode::new(0xF0, Op::Beq, M::Relative, 2, false),

    // Flag operations
    Opcode::new(0x18, Op::Clc, M::Implied, 2, false),
    Opcode::new(0x38, Op::Sec, M::Implied, 2, false),
    Opcode::new(0x58, Op::Cli, M::Implied, 2, false),
    Opcode::new(0x78, Op::Sei, M::Implied, 2, false),
    Opcode::new(0xB8, Op::Clv, M::Implied, 2, false),
    Opcode::new(0xD8, Op::Cld, M::Implied, 2, false),
    Opcode::new(0xF8, Op::Sed, M::Implied, 2, false),

    Opcode::new(0xEA, Op::Nop, M::Implied, 2, false),
];

/// Full 256-slot decode table indexed by the fetched opcode byte. Slots with
/// no documented instruction stay `None`; executing one is an error.
pub static DECODE_TABLE: Lazy<[Option<&'static Opcode>; 256]> = Lazy::new(|| {
    let mut table: [Option<&'static Opcode>; 256] = [None; 256];
    for opcode in OPCODES {
        table[opcode.code as usize] = Some(opcode);
    }
    table
});
