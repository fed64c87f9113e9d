//! T-code wire types: axes, per-axis instructions and multi-axis frames.
//!
//! A frame serializes to one text line, e.g. `L0999I300 R150I300 R0499I300\n`.

use core::fmt;

/// One independently actuated degree of freedom of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisId {
    Stroke,
    Surge,
    Sway,
    Twist,
    Roll,
    Pitch,
    Valve,
}

impl AxisId {
    pub const ALL: [AxisId; 7] = [
        AxisId::Stroke,
        AxisId::Surge,
        AxisId::Sway,
        AxisId::Twist,
        AxisId::Roll,
        AxisId::Pitch,
        AxisId::Valve,
    ];

    /// Wire-protocol code for the axis.
    pub const fn code(self) -> &'static str {
        match self {
            AxisId::Stroke => "L0",
            AxisId::Surge => "L1",
            AxisId::Sway => "L2",
            AxisId::Twist => "R0",
            AxisId::Roll => "R1",
            AxisId::Pitch => "R2",
            AxisId::Valve => "A0",
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Move one axis to an absolute value over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub axis: AxisId,
    pub value: i32,
    pub duration_ms: u32,
}

impl Instruction {
    pub const fn new(axis: AxisId, value: i32, duration_ms: u32) -> Self {
        Self {
            axis,
            value,
            duration_ms,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}I{}", self.axis.code(), self.value, self.duration_ms)
    }
}

/// All instructions of one logical time step (a "TcodeLine").
///
/// Every axis is commanded to arrive together, so the frame lasts as long as
/// its slowest instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    instructions: Vec<Instruction>,
}

impl Frame {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        debug_assert!(!instructions.is_empty(), "frame must carry instructions");
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn duration_ms(&self) -> u32 {
        self.instructions
            .iter()
            .map(|i| i.duration_ms)
            .max()
            .unwrap_or(0)
    }

    /// Value commanded for `axis`, if the frame touches it.
    pub fn value_of(&self, axis: AxisId) -> Option<i32> {
        self.instructions
            .iter()
            .find(|i| i.axis == axis)
            .map(|i| i.value)
    }

    /// Wire bytes: the line plus its terminating newline.
    pub fn encode(&self) -> Vec<u8> {
        let mut line = self.to_string();
        line.push('\n');
        line.into_bytes()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, ins) in self.instructions.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{ins}")?;
        }
        Ok(())
    }
}
