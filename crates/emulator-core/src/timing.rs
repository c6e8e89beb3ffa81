/// Instruction forms that have fixed cycle costs in the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleCostKind {
    /// `BRK`.
    Break,
    /// `NOP`.
    Nop,
    /// `CLC`.
    ClearCarry,
    /// `TAX`, `XTA`.
    Transfer,
    /// `LDA`, `LDX`, `LDY` with an immediate operand.
    LoadImmediate,
    /// Immediate add/sub/logic/compare class.
    Alu,
    /// `LSA`, `LSX`.
    MemoryLoad,
    /// `STA`, `STX`.
    MemoryStore,
    /// `CMPC`.
    MemoryCompare,
    /// `MUL`.
    Mul,
    /// `MULM` (read-modify-write).
    MulMemory,
    /// `CTA`.
    ConsoleIn,
    /// `OTT`.
    ConsoleOut,
    /// Conditional branch when the condition is false.
    BranchNotTaken,
    /// Conditional branch when the condition is true.
    BranchTaken,
    /// `JMP`.
    Jump,
}

/// Single source-of-truth cycle-cost table.
pub const CYCLE_COST_TABLE: &[(CycleCostKind, u16)] = &[
    (CycleCostKind::Break, 7),
    (CycleCostKind::Nop, 2),
    (CycleCostKind::ClearCarry, 1),
    (CycleCostKind::Transfer, 2),
    (CycleCostKind::LoadImmediate, 2),
    (CycleCostKind::Alu, 2),
    (CycleCostKind::MemoryLoad, 4),
    (CycleCostKind::MemoryStore, 4),
    (CycleCostKind::MemoryCompare, 4),
    (CycleCostKind::Mul, 4),
    (CycleCostKind::MulMemory, 6),
    (CycleCostKind::ConsoleIn, 2),
    (CycleCostKind::ConsoleOut, 4),
    (CycleCostKind::BranchNotTaken, 2),
    (CycleCostKind::BranchTaken, 3),
    (CycleCostKind::Jump, 3),
];

/// Looks up the cycle cost for a cycle-cost kind.
#[must_use]
pub fn cycle_cost(kind: CycleCostKind) -> Option<u16> {
    CYCLE_COST_TABLE
        .iter()
        .find_map(|(entry_kind, cycles)| (*entry_kind == kind).then_some(*cycles))
}
