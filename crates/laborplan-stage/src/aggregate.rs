//! Raw aggregates folded from allocation records
//!
//! One pass over an immutable record list builds every per-staff and
//! per-project mapping the staging engine needs. Nothing here depends on the
//! calendar; percentages are computed in staging.

use std::collections::BTreeMap;

use laborplan_core::{
    AllocationRecord, Design, FundingProbability, ProjectId, ScheduleEntry, StaffName,
    MONTHS_PER_YEAR,
};

/// Per-staff and per-project sums of one extraction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawAggregates {
    /// Window hours summed month by month over every record, zero-sum ones included
    pub staff_totals: BTreeMap<StaffName, Vec<i64>>,
    /// Records with probability <= 0.5
    pub staff_low: BTreeMap<StaffName, Vec<i64>>,
    /// Records with probability > 0.5
    pub staff_high: BTreeMap<StaffName, Vec<i64>>,
    /// High-probability hours by month position; every staff member seen has a row
    pub rollup: BTreeMap<StaffName, [i64; MONTHS_PER_YEAR]>,
    /// Nonzero records per staff member, in record order
    pub individuals: BTreeMap<StaffName, Vec<ScheduleEntry>>,
    /// First title seen per project id
    pub project_titles: BTreeMap<ProjectId, String>,
    /// Every probability attached to a project id, one per record
    pub project_probabilities: BTreeMap<ProjectId, Vec<FundingProbability>>,
}

fn add_into(acc: &mut Vec<i64>, hours: &[i64]) {
    if acc.len() < hours.len() {
        acc.resize(hours.len(), 0);
    }
    for (total, h) in acc.iter_mut().zip(hours) {
        *total += h;
    }
}

impl RawAggregates {
    /// Fold records extracted under `design`
    pub fn from_records(records: &[AllocationRecord], design: Design) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            acc.absorb(record, design);
            acc
        })
    }

    fn absorb(&mut self, record: &AllocationRecord, design: Design) {
        let staff = &record.staff;
        let first_slot = design.month_range().start;

        let rollup = self.rollup.entry(staff.clone()).or_insert([0; MONTHS_PER_YEAR]);
        if record.is_high_probability() {
            for (offset, hours) in record.hours.iter().enumerate() {
                if let Some(slot) = rollup.get_mut(first_slot + offset) {
                    *slot += hours;
                }
            }
        }

        match self.project_titles.get(&record.project_id) {
            None => {
                self.project_titles
                    .insert(record.project_id.clone(), record.title.clone());
            }
            Some(existing) if *existing != record.title => {
                tracing::warn!(
                    project = %record.project_id,
                    kept = %existing,
                    ignored = %record.title,
                    "conflicting project titles; keeping the first"
                );
            }
            Some(_) => {}
        }

        add_into(self.staff_totals.entry(staff.clone()).or_default(), &record.hours);
        self.project_probabilities
            .entry(record.project_id.clone())
            .or_default()
            .push(record.probability);

        let subset = if record.is_high_probability() {
            &mut self.staff_high
        } else {
            &mut self.staff_low
        };
        add_into(subset.entry(staff.clone()).or_default(), &record.hours);

        if record.has_hours() {
            self.individuals
                .entry(staff.clone())
                .or_default()
                .push(ScheduleEntry {
                    project_id: record.project_id.clone(),
                    manager: record.manager.clone(),
                    hours: record.hours.clone(),
                    title: record.title.clone(),
                    probability: record.probability,
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(staff: &str, id: &str, title: &str, probability: f64, hours: Vec<i64>) -> AllocationRecord {
        AllocationRecord {
            staff: staff.into(),
            project_id: id.into(),
            title: title.into(),
            manager: "Boss, Pat".into(),
            probability: FundingProbability::from_raw(probability).unwrap(),
            hours,
        }
    }

    #[test]
    fn splits_low_and_high_at_half() {
        let records = vec![
            record("Doe, Jane", "1", "A", 0.5, vec![10, 10, 10]),
            record("Doe, Jane", "2", "B", 0.51, vec![1, 2, 3]),
        ];
        let raw = RawAggregates::from_records(&records, Design::Quarter2);

        assert_eq!(raw.staff_totals["Doe, Jane"], vec![11, 12, 13]);
        assert_eq!(raw.staff_low["Doe, Jane"], vec![10, 10, 10]);
        assert_eq!(raw.staff_high["Doe, Jane"], vec![1, 2, 3]);
    }

    #[test]
    fn rollup_is_position_aligned() {
        let records = vec![
            record("Doe, Jane", "1", "A", 1.0, vec![1, 2, 3, 4, 5, 6]),
            record("Doe, Jane", "2", "B", 0.2, vec![50; 6]),
        ];
        let raw = RawAggregates::from_records(&records, Design::Quarter3To4);

        assert_eq!(raw.rollup["Doe, Jane"], [0, 0, 0, 1, 2, 3, 4, 5, 6, 0, 0, 0]);
    }

    #[test]
    fn rollup_row_for_low_only_staff() {
        let records = vec![record("Lee, Al", "1", "A", 0.3, vec![8; 12])];
        let raw = RawAggregates::from_records(&records, Design::FullYear);
        assert_eq!(raw.rollup["Lee, Al"], [0; 12]);
    }

    #[test]
    fn zero_sum_records_skip_individual_view() {
        let records = vec![
            record("Doe, Jane", "1", "A", 1.0, vec![0; 12]),
            record("Doe, Jane", "2", "B", 1.0, vec![4; 12]),
        ];
        let raw = RawAggregates::from_records(&records, Design::FullYear);

        assert_eq!(raw.individuals["Doe, Jane"].len(), 1);
        assert_eq!(raw.individuals["Doe, Jane"][0].project_id, "2");
        assert!(raw.staff_totals.contains_key("Doe, Jane"));
        assert_eq!(raw.project_probabilities["1"].len(), 1);
    }

    #[test]
    fn first_title_wins() {
        let records = vec![
            record("Doe, Jane", "7", "Ocean Model", 1.0, vec![1; 12]),
            record("Smith, Ann", "7", "Ocean Model v2", 0.4, vec![1; 12]),
        ];
        let raw = RawAggregates::from_records(&records, Design::FullYear);

        assert_eq!(raw.project_titles["7"], "Ocean Model");
        let history: Vec<f64> = raw.project_probabilities["7"]
            .iter()
            .map(|p| p.as_f64())
            .collect();
        assert_eq!(history, vec![1.0, 0.4]);
    }

    #[test]
    fn empty_records() {
        let raw = RawAggregates::from_records(&[], Design::FullYear);
        assert_eq!(raw, RawAggregates::default());
    }
}
