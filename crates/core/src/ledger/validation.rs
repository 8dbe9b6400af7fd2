//! Business rule validation for journal lines.

use rust_decimal::Decimal;

use super::entry::{JournalLineInput, JournalTotals};
use super::error::LedgerError;

/// Validates the lines of a journal entry and returns their totals.
///
/// Each line must carry exactly one positive side, and the entry as a whole
/// must balance. Nothing is corrected: the first violation is returned.
///
/// # Errors
///
/// Returns an error if a line is malformed or the entry is unbalanced.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<JournalTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    for line in lines {
        validate_line(line)?;
    }

    let totals = JournalTotals::of(lines);
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}

fn validate_line(line: &JournalLineInput) -> Result<(), LedgerError> {
    if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }
    match (line.debit.is_zero(), line.credit.is_zero()) {
        (true, true) => Err(LedgerError::ZeroAmount),
        (false, false) => Err(LedgerError::DoubleSidedLine),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            JournalLineInput::debit(1, dec!(100.00)),
            JournalLineInput::credit(2, dec!(100.00)),
        ];
        let totals = validate_lines(&lines).unwrap();
        assert_eq!(totals.total_debit, dec!(100.00));
    }

    #[test]
    fn test_unbalanced_lines() {
        let lines = vec![
            JournalLineInput::debit(1, dec!(100.00)),
            JournalLineInput::credit(2, dec!(50.00)),
        ];
        assert_eq!(
            validate_lines(&lines),
            Err(LedgerError::UnbalancedEntry {
                debit: dec!(100.00),
                credit: dec!(50.00),
            })
        );
    }

    #[test]
    fn test_single_line() {
        let lines = vec![JournalLineInput::debit(1, dec!(100.00))];
        assert_eq!(validate_lines(&lines), Err(LedgerError::InsufficientLines));
    }

    #[test]
    fn test_double_sided_line() {
        let mut both = JournalLineInput::debit(1, dec!(10));
        both.credit = dec!(10);
        let lines = vec![both, JournalLineInput::credit(2, dec!(0.01))];
        assert_eq!(validate_lines(&lines), Err(LedgerError::DoubleSidedLine));
    }

    #[test]
    fn test_one_sided_entry_is_unbalanced() {
        let lines = vec![
            JournalLineInput::debit(1, dec!(10)),
            JournalLineInput::debit(2, dec!(5)),
        ];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }
}
