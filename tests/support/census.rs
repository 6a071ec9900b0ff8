use std::path::{Path, PathBuf};

/// The census fields that vary across fixture rows; the rest are fixed.
#[derive(Debug, Clone)]
pub struct CensusRow {
    pub age: u32,
    pub workclass: &'static str,
    pub fnlwgt: u32,
    pub education: &'static str,
    pub hours_per_week: u32,
    pub native_country: &'static str,
    pub income: &'static str,
}

impl CensusRow {
    pub fn new(age: u32, workclass: &'static str, income: &'static str) -> Self {
        Self {
            age,
            workclass,
            fnlwgt: 189_778,
            education: "HS-grad",
            hours_per_week: 40,
            native_country: "United-States",
            income,
        }
    }

    fn to_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, 9, Never-married, Craft-repair, Not-in-family, White, Male, 0, 0, {}, {}, {}",
            self.age,
            self.workclass,
            self.fnlwgt,
            self.education,
            self.hours_per_week,
            self.native_country,
            self.income
        )
    }
}

/// Forty rows where income is `>50K` exactly when age exceeds 45.
pub fn age_separable_rows() -> Vec<CensusRow> {
    const WORKCLASSES: [&str; 3] = ["Private", "Self-emp-not-inc", "Local-gov"];
    const EDUCATION: [&str; 4] = ["HS-grad", "Bachelors", "Some-college", "Masters"];
    (0..40u32)
        .map(|i| {
            let age = 20 + i;
            let income = if age > 45 { ">50K" } else { "<=50K" };
            let mut row = CensusRow::new(age, WORKCLASSES[i as usize % 3], income);
            row.fnlwgt = 100_000 + (i * 7_919) % 1_000;
            row.education = EDUCATION[i as usize % 4];
            row.hours_per_week = 30 + (i * 13) % 30;
            row
        })
        .collect()
}

/// Write rows in the census file layout, optionally behind a comment line.
pub fn write_census(dir: &Path, name: &str, comment: Option<&str>, rows: &[CensusRow]) -> PathBuf {
    let path = dir.join(name);
    let mut text = String::new();
    if let Some(comment) = comment {
        text.push_str(comment);
        text.push('\n');
    }
    for row in rows {
        text.push_str(&row.to_line());
        text.push('\n');
    }
    text.push('\n');
    std::fs::write(&path, text).expect("write census fixture");
    path
}
