//! The two grouped aggregations the dashboard answers questions with.
//!
//! Both are pure functions of a [`Dataset`] and are recomputed on every
//! render.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::{dataset::Dataset, error::AggregateError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueRow {
    pub payment_type: String,
    pub total_value: Decimal,
}

/// Total `payment_value` per payment type, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevenueByType {
    rows: Vec<RevenueRow>,
}

impl RevenueByType {
    pub fn rows(&self) -> &[RevenueRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AverageRow {
    pub payment_installments: i64,
    /// `None` when every `payment_value` in the group was missing.
    pub average_value: Option<Decimal>,
}

/// Mean `payment_value` per installment count, ascending by count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AverageByInstallments {
    rows: Vec<AverageRow>,
}

impl AverageByInstallments {
    pub fn rows(&self) -> &[AverageRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Sums `payment_value` per `payment_type` and sorts the groups by total,
/// descending. Equal totals keep the order in which their types first
/// appeared in the dataset.
///
/// Rows without a type are left out; missing values add nothing to their
/// group, so a group whose values are all missing totals zero.
pub fn revenue_by_type(dataset: &Dataset) -> Result<RevenueByType, AggregateError> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<RevenueRow> = Vec::new();

    for record in dataset.records() {
        let Some(payment_type) = record.payment_type.as_deref() else {
            continue;
        };
        let idx = *positions.entry(payment_type).or_insert_with(|| {
            rows.push(RevenueRow {
                payment_type: payment_type.to_string(),
                total_value: Decimal::ZERO,
            });
            rows.len() - 1
        });
        if let Some(value) = record.payment_value {
            let row = &mut rows[idx];
            row.total_value = row
                .total_value
                .checked_add(value)
                .ok_or_else(|| AggregateError::Overflow {
                    group: payment_type.to_string(),
                })?;
        }
    }

    // stable: ties stay in encounter order
    rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    Ok(RevenueByType { rows })
}

/// Arithmetic mean of `payment_value` per `payment_installments`, ordered by
/// ascending installment count. Rows without an installment count are left
/// out and missing values are skipped.
pub fn average_by_installments(
    dataset: &Dataset,
) -> Result<AverageByInstallments, AggregateError> {
    let mut groups: BTreeMap<i64, (Decimal, u64)> = BTreeMap::new();
    for record in dataset.records() {
        let Some(installments) = record.payment_installments else {
            continue;
        };
        let (sum, count) = groups.entry(installments).or_insert((Decimal::ZERO, 0));
        if let Some(value) = record.payment_value {
            *sum = sum
                .checked_add(value)
                .ok_or_else(|| AggregateError::Overflow {
                    group: installments.to_string(),
                })?;
            *count += 1;
        }
    }

    let rows = groups
        .into_iter()
        .map(|(payment_installments, (sum, count))| AverageRow {
            payment_installments,
            average_value: (count > 0).then(|| sum / Decimal::from(count)),
        })
        .collect();
    Ok(AverageByInstallments { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PaymentRecord;

    #[test]
    fn equal_totals_keep_encounter_order() {
        let dataset: Dataset = [
            PaymentRecord::new("voucher", 1, Decimal::from(20)),
            PaymentRecord::new("debit_card", 1, Decimal::from(20)),
            PaymentRecord::new("boleto", 1, Decimal::from(30)),
        ]
        .into_iter()
        .collect();
        let revenue = revenue_by_type(&dataset).expect("aggregate");
        let order = revenue
            .rows()
            .iter()
            .map(|row| row.payment_type.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["boleto", "voucher", "debit_card"]);
    }

    #[test]
    fn average_keeps_exact_decimal_precision() {
        let dataset: Dataset = [
            PaymentRecord::new("credit_card", 2, Decimal::new(1001, 2)),
            PaymentRecord::new("credit_card", 2, Decimal::new(2002, 2)),
        ]
        .into_iter()
        .collect();
        let averages = average_by_installments(&dataset).expect("aggregate");
        assert_eq!(averages.rows()[0].average_value, Some(Decimal::new(15015, 3)));
    }

    #[test]
    fn overflowing_sums_are_errors() {
        let dataset: Dataset = [
            PaymentRecord::new("credit_card", 1, Decimal::MAX),
            PaymentRecord::new("credit_card", 1, Decimal::MAX),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            revenue_by_type(&dataset),
            Err(AggregateError::Overflow {
                group: "credit_card".to_string()
            })
        );
        assert_eq!(
            average_by_installments(&dataset),
            Err(AggregateError::Overflow {
                group: "1".to_string()
            })
        );
    }

    #[test]
    fn missing_cells_are_skipped() {
        let dataset: Dataset = [
            PaymentRecord::new("boleto", 2, Decimal::from(10)),
            PaymentRecord {
                payment_type: None,
                payment_installments: Some(2),
                payment_value: Some(Decimal::from(40)),
            },
            PaymentRecord {
                payment_type: Some("boleto".to_string()),
                payment_installments: None,
                payment_value: Some(Decimal::from(5)),
            },
            PaymentRecord {
                payment_type: Some("voucher".to_string()),
                payment_installments: Some(3),
                payment_value: None,
            },
        ]
        .into_iter()
        .collect();

        let revenue = revenue_by_type(&dataset).expect("aggregate");
        assert_eq!(
            revenue.rows(),
            &[
                RevenueRow {
                    payment_type: "boleto".to_string(),
                    total_value: Decimal::from(15),
                },
                RevenueRow {
                    payment_type: "voucher".to_string(),
                    total_value: Decimal::ZERO,
                },
            ]
        );

        let averages = average_by_installments(&dataset).expect("aggregate");
        assert_eq!(
            averages.rows(),
            &[
                AverageRow {
                    payment_installments: 2,
                    average_value: Some(Decimal::from(25)),
                },
                AverageRow {
                    payment_installments: 3,
                    average_value: None,
                },
            ]
        );
    }
}
