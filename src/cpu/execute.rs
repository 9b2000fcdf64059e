// Instruction execution core
//
// `step` runs one whole instruction and returns its cycle cost; `clock`
// wraps it in the per-cycle countdown the system sequencer drives. The
// instruction's effects land eagerly on the first cycle and the remaining
// budget is idle, so bus traffic is exact at completion-boundary
// granularity.

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, AddressingResult};
use crate::cpu::opcodes::{OpcodeInfo, OPCODE_TABLE};
use crate::cpu::Cpu;

impl Cpu {
    /// Advance one CPU cycle.
    ///
    /// When no instruction is in flight, fetch/decode/execute the next one
    /// and charge its full cycle budget; otherwise just burn a cycle.
    pub fn clock(&mut self, bus: &mut Bus) {
        if self.cycles_remaining == 0 {
            self.cycles_remaining = self.step(bus);
        }

        self.cycles_remaining -= 1;
    }

    /// Execute one full instruction and return the cycles it consumed
    /// (base + page-cross penalty + branch adjustments).
    ///
    /// Executing a KIL opcode (or one of the unstable illegals this core
    /// does not carry) is fatal.
    pub fn step(&mut self, bus: &mut Bus) -> u8 {
        let opcode_pc = self.pc;
        let opcode = bus.read(opcode_pc);
        let info = &OPCODE_TABLE[opcode as usize];

        if info.mnemonic == "KIL" {
            panic!(
                "unsupported opcode {:02X} at {:04X}",
                opcode, opcode_pc
            );
        }

        self.pc = self.pc.wrapping_add(1);

        let addr_result = match info.mode {
            AddressingMode::Implied => self.addr_implied(),
            AddressingMode::Accumulator => self.addr_accumulator(),
            AddressingMode::Immediate => self.addr_immediate(bus),
            AddressingMode::ZeroPage => self.addr_zero_page(bus),
            AddressingMode::ZeroPageX => self.addr_zero_page_x(bus),
            AddressingMode::ZeroPageY => self.addr_zero_page_y(bus),
            AddressingMode::Relative => self.addr_relative(bus),
            AddressingMode::Absolute => self.addr_absolute(bus),
            AddressingMode::AbsoluteX => self.addr_absolute_x(bus),
            AddressingMode::AbsoluteY => self.addr_absolute_y(bus),
            AddressingMode::Indirect => self.addr_indirect(bus),
            AddressingMode::IndexedIndirect => self.addr_indexed_indirect(bus),
            AddressingMode::IndirectIndexed => self.addr_indirect_indexed(bus),
        };

        let extra_cycles = self.execute_instruction(info, &addr_result, bus);

        let mut cycles = info.cycles;
        if info.page_cycle && addr_result.page_crossed {
            cycles += 1;
        }
        cycles += extra_cycles;

        self.total_cycles = self.total_cycles.wrapping_add(cycles as u64);
        cycles
    }

    /// Dispatch on the decoded mnemonic. Returns extra cycles (branches).
    fn execute_instruction(
        &mut self,
        info: &OpcodeInfo,
        addr_result: &AddressingResult,
        bus: &mut Bus,
    ) -> u8 {
        let accumulator = info.mode == AddressingMode::Accumulator;

        match info.mnemonic {
            // Loads and stores
            "LDA" => self.lda(bus, addr_result),
            "LDX" => self.ldx(bus, addr_result),
            "LDY" => self.ldy(bus, addr_result),
            "STA" => self.sta(bus, addr_result),
            "STX" => self.stx(bus, addr_result),
            "STY" => self.sty(bus, addr_result),

            // Transfers
            "TAX" => self.tax(),
            "TAY" => self.tay(),
            "TXA" => self.txa(),
            "TYA" => self.tya(),
            "TSX" => self.tsx(),
            "TXS" => self.txs(),

            // Arithmetic
            "ADC" => self.adc(bus, addr_result),
            "SBC" => self.sbc(bus, addr_result),
            "INC" => self.inc(bus, addr_result),
            "DEC" => self.dec(bus, addr_result),
            "INX" => self.inx(),
            "INY" => self.iny(),
            "DEX" => self.dex(),
            "DEY" => self.dey(),

            // Logic
            "AND" => self.and(bus, addr_result),
            "ORA" => self.ora(bus, addr_result),
            "EOR" => self.eor(bus, addr_result),
            "BIT" => self.bit(bus, addr_result),

            // Shifts and rotates
            "ASL" => self.asl(bus, addr_result, accumulator),
            "LSR" => self.lsr(bus, addr_result, accumulator),
            "ROL" => self.rol(bus, addr_result, accumulator),
            "ROR" => self.ror(bus, addr_result, accumulator),

            // Comparisons
            "CMP" => self.cmp(bus, addr_result),
            "CPX" => self.cpx(bus, addr_result),
            "CPY" => self.cpy(bus, addr_result),

            // Branches bill their own extra cycles
            "BCC" => return self.bcc(addr_result),
            "BCS" => return self.bcs(addr_result),
            "BEQ" => return self.beq(addr_result),
            "BNE" => return self.bne(addr_result),
            "BMI" => return self.bmi(addr_result),
            "BPL" => return self.bpl(addr_result),
            "BVC" => return self.bvc(addr_result),
            "BVS" => return self.bvs(addr_result),

            // Jumps and subroutines
            "JMP" => self.jmp(addr_result),
            "JSR" => self.jsr(bus, addr_result),
            "RTS" => self.rts(bus),

            // Stack
            "PHA" => self.pha(bus),
            "PLA" => self.pla(bus),
            "PHP" => self.php(bus),
            "PLP" => self.plp(bus),

            // Flags
            "CLC" => self.clc(),
            "CLD" => self.cld(),
            "CLI" => self.cli(),
            "CLV" => self.clv(),
            "SEC" => self.sec(),
            "SED" => self.sed(),
            "SEI" => self.sei(),

            // System
            "BRK" => self.brk(bus),
            "RTI" => self.rti(bus),
            "NOP" => self.nop(bus, addr_result),

            // Stable illegal combinations
            "LAX" => self.lax(bus, addr_result),
            "SAX" => self.sax(bus, addr_result),
            "DCP" => self.dcp(bus, addr_result),
            "ISC" => self.isc(bus, addr_result),
            "SLO" => self.slo(bus, addr_result),
            "SRE" => self.sre(bus, addr_result),
            "RLA" => self.rla(bus, addr_result),
            "RRA" => self.rra(bus, addr_result),

            other => unreachable!("mnemonic {} missing from dispatch", other),
        }

        0
    }

    /// Render the instruction at PC in nestest trace format:
    ///
    /// ```text
    /// C000  4C F5 C5  JMP $C5F5    A:00 X:00 Y:00 P:24 SP:FD CYC:7
    /// ```
    ///
    /// The disassembly column is best-effort; conformance checks compare
    /// the register fields.
    pub fn trace(&self, bus: &mut Bus) -> String {
        let pc = self.pc;
        let opcode = bus.read(pc);
        let info = &OPCODE_TABLE[opcode as usize];

        let byte2 = if info.bytes >= 2 {
            bus.read(pc.wrapping_add(1))
        } else {
            0
        };
        let byte3 = if info.bytes >= 3 {
            bus.read(pc.wrapping_add(2))
        } else {
            0
        };

        let hex_bytes = match info.bytes {
            2 => format!("{:02X} {:02X}   ", opcode, byte2),
            3 => format!("{:02X} {:02X} {:02X}", opcode, byte2, byte3),
            _ => format!("{:02X}      ", opcode),
        };

        let operand = match info.mode {
            AddressingMode::Implied => String::new(),
            AddressingMode::Accumulator => "A".to_string(),
            AddressingMode::Immediate => format!("#${:02X}", byte2),
            AddressingMode::ZeroPage => format!("${:02X}", byte2),
            AddressingMode::ZeroPageX => format!("${:02X},X", byte2),
            AddressingMode::ZeroPageY => format!("${:02X},Y", byte2),
            AddressingMode::Relative => {
                let target = pc
                    .wrapping_add(2)
                    .wrapping_add(byte2 as i8 as u16);
                format!("${:04X}", target)
            }
            AddressingMode::Absolute => {
                format!("${:04X}", u16::from_le_bytes([byte2, byte3]))
            }
            AddressingMode::AbsoluteX => {
                format!("${:04X},X", u16::from_le_bytes([byte2, byte3]))
            }
            AddressingMode::AbsoluteY => {
                format!("${:04X},Y", u16::from_le_bytes([byte2, byte3]))
            }
            AddressingMode::Indirect => {
                format!("(${:04X})", u16::from_le_bytes([byte2, byte3]))
            }
            AddressingMode::IndexedIndirect => format!("(${:02X},X)", byte2),
            AddressingMode::IndirectIndexed => format!("(${:02X}),Y", byte2),
        };

        let disassembly = if operand.is_empty() {
            info.mnemonic.to_string()
        } else {
            format!("{} {}", info.mnemonic, operand)
        };

        format!(
            "{:04X}  {}  {:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            pc, hex_bytes, disassembly, self.a, self.x, self.y, self.status, self.sp,
            self.total_cycles
        )
    }
}
