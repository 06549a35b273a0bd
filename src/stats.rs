use serde::Serialize;

use crate::grouping::StopAggregate;

/// Per-label totals over a grouping result.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LabelStats {
    pub label: String,
    pub records: usize,
    pub stops_touched: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct GroupingStats {
    pub stops: usize,
    pub total_records: usize,
    pub labels: Vec<LabelStats>,
}

impl GroupingStats {
    /// Totals `aggregates` for each of `labels`, the labels of the grouped input.
    ///
    /// A label with no records anywhere still gets a zeroed entry.
    pub fn from_aggregates(labels: &[String], aggregates: &[StopAggregate]) -> Self {
        let mut s = GroupingStats {
            stops: aggregates.len(),
            total_records: 0,
            labels: labels
                .iter()
                .map(|label| LabelStats {
                    label: label.clone(),
                    ..Default::default()
                })
                .collect(),
        };

        for agg in aggregates {
            for entry in s.labels.iter_mut() {
                let records = agg.records(&entry.label).map_or(0, <[_]>::len);
                entry.records += records;
                if records > 0 {
                    entry.stops_touched += 1;
                }
            }
            s.total_records += agg.record_count();
        }

        s
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn label(&self, label: &str) -> Option<&LabelStats> {
        self.labels.iter().find(|l| l.label == label)
    }

    /// Share of stops that have at least one record for `label`.
    pub fn coverage_pct(&self, label: &str) -> f64 {
        self.label(label)
            .map(|l| Self::pct(l.stops_touched, self.stops))
            .unwrap_or(0.0)
    }
}
