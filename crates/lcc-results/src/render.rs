//! Console rendering of check:data results.

use colored::Colorize;
use tabled::{Table, Tabled};

use crate::results::RunResult;
use crate::stats::Stats;
use crate::verdict::TestSuite;

#[derive(Tabled)]
struct TestRow {
    #[tabled(rename = "check:data Tests")]
    name: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "check:data Stats")]
    name: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl TestSuite {
    pub fn render_table(&self) -> String {
        let rows = self.rows().map(|(name, description, verdict)| TestRow {
            name,
            description,
            status: verdict.label(),
        });
        Table::new(rows).to_string()
    }
}

impl Stats {
    pub fn render_table(&self) -> String {
        let rows = self.rows().map(|(name, description, value)| StatRow {
            name,
            description,
            value,
        });
        Table::new(rows).to_string()
    }
}

impl RunResult {
    /// Error banner (red), success banner (green), then the tests and stats
    /// tables when present.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(err) = &self.error {
            out.push('\n');
            out.push_str(&format!("Error: {err}").red().to_string());
            out.push('\n');
        }

        if let Some(ec) = &self.end_condition {
            out.push('\n');
            out.push_str(
                &format!("Success: {} [{}]", ec.kind, ec.detail)
                    .green()
                    .to_string(),
            );
            out.push('\n');
        }

        out.push('\n');
        if let Some(tests) = &self.tests {
            out.push_str(&tests.render_table());
            out.push_str("\n\n");
        }
        if let Some(stats) = &self.stats {
            out.push_str(&stats.render_table());
            out.push_str("\n\n");
        }

        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}
