use core::fmt;

use crate::error::CPUError;

/// A decoded instruction word. Register operands are indices into the V
/// registers (0x0..=0xF).
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Instruction {
    ClearScreen,                // 00E0
    Return,                     // 00EE
    Jump(u16),                  // 1nnn
    Call(u16),                  // 2nnn
    SkipIfEqual(u8, u8),        // 3xnn
    SkipIfNotEqual(u8, u8),     // 4xnn
    SkipIfEqualVy(u8, u8),      // 5xyn
    LoadVx(u8, u8),             // 6xnn
    AddVx(u8, u8),              // 7xnn
    LoadVxVy(u8, u8),           // 8xy0
    Or(u8, u8),                 // 8xy1
    And(u8, u8),                // 8xy2
    Xor(u8, u8),                // 8xy3
    AddVxVy(u8, u8),            // 8xy4
    SubVxVy(u8, u8),            // 8xy5
    ShiftRight(u8),             // 8xy6
    SubN(u8, u8),               // 8xy7
    ShiftLeft(u8),              // 8xyE
    SkipIfNotEqualVy(u8, u8),   // 9xyn
    LoadIndex(u16),             // Annn
    JumpPlusV0(u16),            // Bnnn
    Random(u8, u8),             // Cxnn
    Draw(u8, u8, u8),           // Dxyn
    SkipIfKeyPressed(u8),       // Ex9E
    SkipIfKeyNotPressed(u8),    // ExA1
    LoadVxFromDelay(u8),        // Fx07
    WaitForKey(u8),             // Fx0A
    SetDelayFromVx(u8),         // Fx15
    SetSoundFromVx(u8),         // Fx18
    AddIndexVx(u8),             // Fx1E
    LoadFontAddress(u8),        // Fx29
    StoreBCD(u8),               // Fx33
    StoreRegisters(u8),         // Fx55
    LoadRegisters(u8),          // Fx65
}

impl TryFrom<u16> for Instruction {
    type Error = CPUError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let nibbles = (
            ((value & 0xF000) >> 12) as u8,
            ((value & 0x0F00) >> 8) as u8,
            ((value & 0x00F0) >> 4) as u8,
            (value & 0x000F) as u8,
        );

        let nnn = value & 0x0FFF;
        let nn = (value & 0x00FF) as u8;
        let (_, x, y, n) = nibbles;

        match nibbles {
            (0x0, 0x0, 0xE, 0x0) => Ok(Self::ClearScreen),
            (0x0, 0x0, 0xE, 0xE) => Ok(Self::Return),
            (0x1, _, _, _) => Ok(Self::Jump(nnn)),
            (0x2, _, _, _) => Ok(Self::Call(nnn)),
            (0x3, _, _, _) => Ok(Self::SkipIfEqual(x, nn)),
            (0x4, _, _, _) => Ok(Self::SkipIfNotEqual(x, nn)),
            (0x5, _, _, _) => Ok(Self::SkipIfEqualVy(x, y)),
            (0x6, _, _, _) => Ok(Self::LoadVx(x, nn)),
            (0x7, _, _, _) => Ok(Self::AddVx(x, nn)),
            (0x8, _, _, 0x0) => Ok(Self::LoadVxVy(x, y)),
            (0x8, _, _, 0x1) => Ok(Self::Or(x, y)),
            (0x8, _, _, 0x2) => Ok(Self::And(x, y)),
            (0x8, _, _, 0x3) => Ok(Self::Xor(x, y)),
            (0x8, _, _, 0x4) => Ok(Self::AddVxVy(x, y)),
            (0x8, _, _, 0x5) => Ok(Self::SubVxVy(x, y)),
            (0x8, _, _, 0x6) => Ok(Self::ShiftRight(x)),
            (0x8, _, _, 0x7) => Ok(Self::SubN(x, y)),
            (0x8, _, _, 0xE) => Ok(Self::ShiftLeft(x)),
            (0x9, _, _, _) => Ok(Self::SkipIfNotEqualVy(x, y)),
            (0xA, _, _, _) => Ok(Self::LoadIndex(nnn)),
            (0xB, _, _, _) => Ok(Self::JumpPlusV0(nnn)),
            (0xC, _, _, _) => Ok(Self::Random(x, nn)),
            (0xD, _, _, _) => Ok(Self::Draw(x, y, n)),
            (0xE, _, 0x9, 0xE) => Ok(Self::SkipIfKeyPressed(x)),
            (0xE, _, 0xA, 0x1) => Ok(Self::SkipIfKeyNotPressed(x)),
            (0xF, _, 0x0, 0x7) => Ok(Self::LoadVxFromDelay(x)),
            (0xF, _, 0x0, 0xA) => Ok(Self::WaitForKey(x)),
            (0xF, _, 0x1, 0x5) => Ok(Self::SetDelayFromVx(x)),
            (0xF, _, 0x1, 0x8) => Ok(Self::SetSoundFromVx(x)),
            (0xF, _, 0x1, 0xE) => Ok(Self::AddIndexVx(x)),
            (0xF, _, 0x2, 0x9) => Ok(Self::LoadFontAddress(x)),
            (0xF, _, 0x3, 0x3) => Ok(Self::StoreBCD(x)),
            (0xF, _, 0x5, 0x5) => Ok(Self::StoreRegisters(x)),
            (0xF, _, 0x6, 0x5) => Ok(Self::LoadRegisters(x)),
            _ => Err(CPUError::InvalidOpcode(value)),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP {:#05X}", addr),
            Self::Call(addr) => write!(f, "CALL {:#05X}", addr),
            Self::SkipIfEqual(x, nn) => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Self::SkipIfNotEqual(x, nn) => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            Self::SkipIfEqualVy(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            Self::LoadVx(x, nn) => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Self::AddVx(x, nn) => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Self::LoadVxVy(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Self::Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            Self::And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Self::Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            Self::AddVxVy(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Self::SubVxVy(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Self::ShiftRight(x) => write!(f, "SHR V{:X}", x),
            Self::SubN(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Self::ShiftLeft(x) => write!(f, "SHL V{:X}", x),
            Self::SkipIfNotEqualVy(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            Self::LoadIndex(addr) => write!(f, "LD I, {:#05X}", addr),
            Self::JumpPlusV0(addr) => write!(f, "JP V0, {:#05X}", addr),
            Self::Random(x, nn) => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Self::Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Self::SkipIfKeyPressed(x) => write!(f, "SKP V{:X}", x),
            Self::SkipIfKeyNotPressed(x) => write!(f, "SKNP V{:X}", x),
            Self::LoadVxFromDelay(x) => write!(f, "LD V{:X}, DT", x),
            Self::WaitForKey(x) => write!(f, "LD V{:X}, K", x),
            Self::SetDelayFromVx(x) => write!(f, "LD DT, V{:X}", x),
            Self::SetSoundFromVx(x) => write!(f, "LD ST, V{:X}", x),
            Self::AddIndexVx(x) => write!(f, "ADD I, V{:X}", x),
            Self::LoadFontAddress(x) => write!(f, "LD F, V{:X}", x),
            Self::StoreBCD(x) => write!(f, "LD B, V{:X}", x),
            Self::StoreRegisters(x) => write!(f, "LD [I], V{:X}", x),
            Self::LoadRegisters(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_invalid_opcode() {
        let res = Instruction::try_from(0xFFFF as u16);
        assert_eq!(res.unwrap_err(), CPUError::InvalidOpcode(0xFFFF));
    }

    #[test]
    fn test_try_from_rejects_unknown_sub_operations() {
        for opcode in [0x0123, 0x00E1, 0x8008, 0x800F, 0xE19F, 0xF100] {
            assert_eq!(
                Instruction::try_from(opcode),
                Err(CPUError::InvalidOpcode(opcode)),
                "{:#06X} should not decode",
                opcode
            );
        }
    }

    #[test]
    fn test_try_from_valid_opcodes() {
        assert_eq!(Instruction::try_from(0x00E0), Ok(Instruction::ClearScreen));
        assert_eq!(Instruction::try_from(0x00EE), Ok(Instruction::Return));
        assert_eq!(Instruction::try_from(0x1123), Ok(Instruction::Jump(0x123)));
        assert_eq!(Instruction::try_from(0x2ABC), Ok(Instruction::Call(0xABC)));
        assert_eq!(
            Instruction::try_from(0x3A42),
            Ok(Instruction::SkipIfEqual(0xA, 0x42))
        );
        assert_eq!(
            Instruction::try_from(0x4A42),
            Ok(Instruction::SkipIfNotEqual(0xA, 0x42))
        );
        assert_eq!(
            Instruction::try_from(0x5AB0),
            Ok(Instruction::SkipIfEqualVy(0xA, 0xB))
        );
        assert_eq!(Instruction::try_from(0x6A8F), Ok(Instruction::LoadVx(0xA, 0x8F)));
        assert_eq!(Instruction::try_from(0x7101), Ok(Instruction::AddVx(0x1, 0x01)));
        assert_eq!(Instruction::try_from(0x8120), Ok(Instruction::LoadVxVy(1, 2)));
        assert_eq!(Instruction::try_from(0x8121), Ok(Instruction::Or(1, 2)));
        assert_eq!(Instruction::try_from(0x8122), Ok(Instruction::And(1, 2)));
        assert_eq!(Instruction::try_from(0x8123), Ok(Instruction::Xor(1, 2)));
        assert_eq!(Instruction::try_from(0x8124), Ok(Instruction::AddVxVy(1, 2)));
        assert_eq!(Instruction::try_from(0x8125), Ok(Instruction::SubVxVy(1, 2)));
        assert_eq!(Instruction::try_from(0x8126), Ok(Instruction::ShiftRight(1)));
        assert_eq!(Instruction::try_from(0x8127), Ok(Instruction::SubN(1, 2)));
        assert_eq!(Instruction::try_from(0x812E), Ok(Instruction::ShiftLeft(1)));
        assert_eq!(
            Instruction::try_from(0x9120),
            Ok(Instruction::SkipIfNotEqualVy(1, 2))
        );
        assert_eq!(Instruction::try_from(0xA2F0), Ok(Instruction::LoadIndex(0x2F0)));
        assert_eq!(Instruction::try_from(0xB300), Ok(Instruction::JumpPlusV0(0x300)));
        assert_eq!(Instruction::try_from(0xC30F), Ok(Instruction::Random(3, 0x0F)));
        assert_eq!(Instruction::try_from(0xD125), Ok(Instruction::Draw(1, 2, 5)));
        assert_eq!(Instruction::try_from(0xE39E), Ok(Instruction::SkipIfKeyPressed(3)));
        assert_eq!(
            Instruction::try_from(0xE3A1),
            Ok(Instruction::SkipIfKeyNotPressed(3))
        );
        assert_eq!(Instruction::try_from(0xF407), Ok(Instruction::LoadVxFromDelay(4)));
        assert_eq!(Instruction::try_from(0xF40A), Ok(Instruction::WaitForKey(4)));
        assert_eq!(Instruction::try_from(0xF415), Ok(Instruction::SetDelayFromVx(4)));
        assert_eq!(Instruction::try_from(0xF418), Ok(Instruction::SetSoundFromVx(4)));
        assert_eq!(Instruction::try_from(0xF41E), Ok(Instruction::AddIndexVx(4)));
        assert_eq!(Instruction::try_from(0xF429), Ok(Instruction::LoadFontAddress(4)));
        assert_eq!(Instruction::try_from(0xF433), Ok(Instruction::StoreBCD(4)));
        assert_eq!(Instruction::try_from(0xF455), Ok(Instruction::StoreRegisters(4)));
        assert_eq!(Instruction::try_from(0xF465), Ok(Instruction::LoadRegisters(4)));
    }

    #[test]
    fn test_try_from_register_compares_ignore_low_nibble() {
        assert_eq!(
            Instruction::try_from(0x5121),
            Ok(Instruction::SkipIfEqualVy(1, 2))
        );
        assert_eq!(
            Instruction::try_from(0x9AB1),
            Ok(Instruction::SkipIfNotEqualVy(0xA, 0xB))
        );
    }

    #[test]
    fn test_display_mnemonics() {
        assert_eq!(Instruction::ClearScreen.to_string(), "CLS");
        assert_eq!(Instruction::Jump(0x321).to_string(), "JP 0x321");
        assert_eq!(Instruction::LoadVx(0xA, 0x8F).to_string(), "LD VA, 0x8F");
        assert_eq!(Instruction::Draw(1, 2, 5).to_string(), "DRW V1, V2, 5");
    }
}
