use core::fmt;
use std::error;
use std::error::Error as ErrorTrait;
use std::io;

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    RuntimeError(CPUError),
    SystemError(String),
}

impl Error {
    /// Process exit status for this error. Each class of fatal fault gets its
    /// own status so callers can tell them apart.
    pub fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::IOError(_) => exitcode::NOINPUT,
            Self::SystemError(_) => exitcode::OSERR,
            Self::RuntimeError(err) => match err {
                CPUError::InvalidAddress(_) => exitcode::SOFTWARE,
                CPUError::InvalidOpcode(_)
                | CPUError::UnknownInstruction(_, _)
                | CPUError::InvalidKey(_) => exitcode::DATAERR,
                CPUError::InvalidDumpRange(_, _) => exitcode::USAGE,
                CPUError::StackOverflow(_) | CPUError::StackUnderflow(_) => exitcode::PROTOCOL,
                CPUError::MemoryOverflow
                | CPUError::MemoryOutOfBounds(_)
                | CPUError::ProtectedWrite(_) => exitcode::IOERR,
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
            _ => match self.source() {
                Some(err) => write!(f, "{}", err),
                None => write!(f, "{:?}", self),
            },
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::IOError(ref e) => Some(e),
            Self::RuntimeError(ref e) => Some(e),
            Self::SystemError(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError(err)
    }
}

impl From<CPUError> for Error {
    fn from(err: CPUError) -> Error {
        Error::RuntimeError(err)
    }
}

impl From<sdl2::video::WindowBuildError> for Error {
    fn from(err: sdl2::video::WindowBuildError) -> Error {
        Error::SystemError(err.to_string())
    }
}

impl From<sdl2::IntegerOrSdlError> for Error {
    fn from(err: sdl2::IntegerOrSdlError) -> Error {
        Error::SystemError(err.to_string())
    }
}

impl From<sdl2::render::TextureValueError> for Error {
    fn from(err: sdl2::render::TextureValueError) -> Error {
        Error::SystemError(err.to_string())
    }
}

impl From<sdl2::render::UpdateTextureError> for Error {
    fn from(err: sdl2::render::UpdateTextureError) -> Error {
        Error::SystemError(err.to_string())
    }
}

#[derive(Debug, PartialEq)]
pub enum CPUError {
    MemoryOverflow,
    InvalidOpcode(u16),
    UnknownInstruction(u16, u16),
    InvalidAddress(u16),
    MemoryOutOfBounds(usize),
    ProtectedWrite(usize),
    StackOverflow(u16),
    StackUnderflow(u16),
    InvalidDumpRange(usize, usize),
    InvalidKey(usize),
}

impl fmt::Display for CPUError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MemoryOverflow => write!(f, "Memory overflow"),
            Self::InvalidOpcode(op) => write!(f, "Invalid opcode: {:#06X}", op),
            Self::UnknownInstruction(op, addr) => {
                write!(f, "Unknown instruction {:#06X} at {:#05X}", op, addr)
            }
            Self::InvalidAddress(addr) => {
                write!(f, "Program counter out of bounds: {:#06X}", addr)
            }
            Self::MemoryOutOfBounds(addr) => {
                write!(f, "Memory access out of bounds: {:#06X}", addr)
            }
            Self::ProtectedWrite(addr) => {
                write!(f, "Write to reserved memory: {:#05X}", addr)
            }
            Self::StackOverflow(addr) => write!(f, "Stack overflow at {:#05X}", addr),
            Self::StackUnderflow(addr) => write!(f, "Stack underflow at {:#05X}", addr),
            Self::InvalidDumpRange(start, stop) => write!(
                f,
                "Memory dump out of bounds: {:#06X}..{:#06X}",
                start, stop
            ),
            Self::InvalidKey(key) => write!(f, "Invalid key index: {}", key),
        }
    }
}

impl error::Error for CPUError {}
