//! Ordering of grouped results.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownSortColumn;
use crate::types::QueryGroup;

/// Column a group collection can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Count,
    AvgTime,
    AvgExamined,
    AvgSent,
    Type,
    Db,
    Table,
}

impl SortColumn {
    /// All columns in sort-modal order.
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Count,
        SortColumn::AvgTime,
        SortColumn::AvgExamined,
        SortColumn::AvgSent,
        SortColumn::Type,
        SortColumn::Db,
        SortColumn::Table,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Count => "Count",
            SortColumn::AvgTime => "Avg Time",
            SortColumn::AvgExamined => "Avg Examined",
            SortColumn::AvgSent => "Avg Sent",
            SortColumn::Type => "Type",
            SortColumn::Db => "DB",
            SortColumn::Table => "Table",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortColumn {
    type Err = UnknownSortColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "count" => Ok(SortColumn::Count),
            "time" | "avg_time" => Ok(SortColumn::AvgTime),
            "examined" | "avg_examined" => Ok(SortColumn::AvgExamined),
            "sent" | "avg_sent" => Ok(SortColumn::AvgSent),
            "type" => Ok(SortColumn::Type),
            "db" | "database" => Ok(SortColumn::Db),
            "table" => Ok(SortColumn::Table),
            _ => Err(UnknownSortColumn(s.to_string())),
        }
    }
}

/// Direction applied on top of a column's natural order.
///
/// `Descending` keeps the natural order of [`compare_groups`]; `Ascending`
/// reverses all of it, tie-break included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub const ALL: [SortDirection; 2] = [SortDirection::Ascending, SortDirection::Descending];

    pub fn index(self) -> usize {
        match self {
            SortDirection::Ascending => 0,
            SortDirection::Descending => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

/// Column plus direction; defines a total order over groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn compare(&self, a: &QueryGroup, b: &QueryGroup) -> Ordering {
        let natural = compare_groups(a, b, self.column);
        match self.direction {
            SortDirection::Descending => natural,
            SortDirection::Ascending => natural.reverse(),
        }
    }
}

/// Natural order of a column.
///
/// Numeric columns put the largest first; Count breaks ties on average time.
/// Text columns are lexicographic.
pub fn compare_groups(a: &QueryGroup, b: &QueryGroup, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Count => b
            .count()
            .cmp(&a.count())
            .then_with(|| b.avg_query_time().total_cmp(&a.avg_query_time())),
        SortColumn::AvgTime => b.avg_query_time().total_cmp(&a.avg_query_time()),
        SortColumn::AvgExamined => b.avg_rows_examined().total_cmp(&a.avg_rows_examined()),
        SortColumn::AvgSent => b.avg_rows_sent().total_cmp(&a.avg_rows_sent()),
        SortColumn::Type => a.query_type().cmp(b.query_type()),
        SortColumn::Db => a.database().cmp(b.database()),
        SortColumn::Table => a.table().cmp(b.table()),
    }
}

/// Reorder a view of indices into `groups`. Group contents are untouched.
pub fn sort_view(groups: &[QueryGroup], view: &mut [usize], spec: SortSpec) {
    view.sort_by(|&a, &b| spec.compare(&groups[a], &groups[b]));
}

/// A fresh sorted view over all groups.
pub fn sorted_indices(groups: &[QueryGroup], spec: SortSpec) -> Vec<usize> {
    let mut view: Vec<usize> = (0..groups.len()).collect();
    sort_view(groups, &mut view, spec);
    view
}
