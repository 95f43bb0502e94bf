//! Journal line validation.
//!
//! Rules, checked in order:
//! 1. At least two lines
//! 2. Every line names an account
//! 3. No negative amounts, at most two decimal places, below [`AMOUNT_LIMIT`]
//! 4. Exactly one side of each line is positive
//! 5. Total debit equals total credit

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{JournalLineInput, JournalTotals, ValidatedLine};

/// Maximum fractional digits a stored amount may carry.
const MAX_SCALE: u32 = 2;

/// Exclusive upper bound of a line amount. Stored amounts are `NUMERIC(20, 2)`.
// 10^18 split into 32-bit words (`Decimal::new` is not `const`).
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Validates a single line. `line` is 1-based.
pub fn validate_line(line: usize, input: &JournalLineInput) -> Result<ValidatedLine, LedgerError> {
    let coa_code = input.coa_code.trim();
    if coa_code.is_empty() {
        return Err(LedgerError::MissingAccountCode { line });
    }

    if input.debit < Decimal::ZERO || input.credit < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount { line });
    }

    if input.debit.normalize().scale() > MAX_SCALE || input.credit.normalize().scale() > MAX_SCALE
    {
        return Err(LedgerError::TooPrecise { line });
    }

    if input.debit >= AMOUNT_LIMIT || input.credit >= AMOUNT_LIMIT {
        return Err(LedgerError::AmountTooLarge { line });
    }

    match (input.debit.is_zero(), input.credit.is_zero()) {
        (true, true) => return Err(LedgerError::ZeroAmount { line }),
        (false, false) => return Err(LedgerError::BothSides { line }),
        _ => {}
    }

    Ok(ValidatedLine {
        line_no: i32::try_from(line).unwrap_or(i32::MAX),
        coa_code: coa_code.to_string(),
        debit: input.debit.abs(),
        credit: input.credit.abs(),
        description: input
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Validates all lines and returns them with their totals.
pub fn validate_lines(
    lines: &[JournalLineInput],
) -> Result<(Vec<ValidatedLine>, JournalTotals), LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines(lines.len()));
    }

    let validated = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| validate_line(idx + 1, line))
        .collect::<Result<Vec<_>, _>>()?;

    let totals = validated
        .iter()
        .try_fold(JournalTotals::default(), |acc, line| {
            acc.checked_add(line.debit, line.credit)
        })
        .ok_or(LedgerError::TotalOverflow)?;
    if !totals.is_balanced() {
        return Err(LedgerError::Unbalanced {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok((validated, totals))
}
