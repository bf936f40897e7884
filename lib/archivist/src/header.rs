use crate::period::ResolvedPeriod;

pub const DEFAULT_PROGRAM_NAME: &str = "Euphonic Sessions with Kyau & Albert";

/// Renders the three-line title block at the top of each playlist file.
#[derive(Debug, Clone)]
pub struct HeaderRenderer {
    program_name: String,
}

impl HeaderRenderer {
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
        }
    }

    pub fn render(&self, period: &ResolvedPeriod, permalink_url: &str) -> String {
        let edition = match period.subject_year() {
            Some(year) => format!("Best Of {year}"),
            None => format!("{} {} Edition", period.month_name(), period.year),
        };
        format!("{}\n{}\n{}", self.program_name, edition, permalink_url)
    }
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM_NAME)
    }
}
