//! 16-bit arithmetic primitives with carry and overflow reporting.

/// Result word plus the status bits an ALU operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    /// Wrapped 16-bit result.
    pub value: u16,
    /// Carry out for additions, no-borrow for subtractions.
    pub carry: bool,
    /// Signed overflow.
    pub overflow: bool,
}

/// `lhs + rhs + carry_in`, wrapping at 16 bits.
#[must_use]
pub fn add_with_carry(lhs: u16, rhs: u16, carry_in: bool) -> AluResult {
    let (partial, carry_a) = lhs.overflowing_add(rhs);
    let (value, carry_b) = partial.overflowing_add(u16::from(carry_in));
    AluResult {
        value,
        carry: carry_a || carry_b,
        overflow: (lhs ^ value) & (rhs ^ value) & 0x8000 != 0,
    }
}

/// `lhs - rhs - (1 - carry_in)`, wrapping at 16 bits.
///
/// `carry` is set when no borrow was needed.
#[must_use]
pub fn sub_with_borrow(lhs: u16, rhs: u16, carry_in: bool) -> AluResult {
    let (partial, borrow_a) = lhs.overflowing_sub(rhs);
    let (value, borrow_b) = partial.overflowing_sub(u16::from(!carry_in));
    AluResult {
        value,
        carry: !(borrow_a || borrow_b),
        overflow: (lhs ^ rhs) & (lhs ^ value) & 0x8000 != 0,
    }
}

/// `register - operand` for compares: the difference and the no-borrow bit.
#[must_use]
pub const fn compare(register: u16, operand: u16) -> (u16, bool) {
    let (difference, borrow) = register.overflowing_sub(operand);
    (difference, !borrow)
}
