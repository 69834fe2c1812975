use log::{error, info};

use crate::config::ScrapeConfig;
use crate::core::course_parser::parse_course_document;
use crate::core::faculty_parser::parse_faculty_page;
use crate::core::pdf_text::extract_pdf_text;
use crate::error::scrape::ScrapeError;
use crate::http::fetcher::{Fetch, HttpFetcher};
use crate::model::course::CourseRecord;
use crate::model::professor::ProfessorRecord;
use crate::utils::output::save_json;

/// Outcome of one faculty listing page.
#[derive(Debug)]
pub struct PageReport {
    pub url: String,
    pub professors: usize,
    pub error: Option<ScrapeError>,
}

#[derive(Debug, Default)]
pub struct FacultyReport {
    pub professors: Vec<ProfessorRecord>,
    pub pages: Vec<PageReport>,
}

impl FacultyReport {
    pub fn succeeded(&self) -> usize {
        self.pages.iter().filter(|p| p.error.is_none()).count()
    }

    pub fn failed(&self) -> usize {
        self.pages.len() - self.succeeded()
    }
}

pub struct Campus<F: Fetch = HttpFetcher> {
    fetcher: F,
    config: ScrapeConfig,
}

impl Campus<HttpFetcher> {
    pub fn from_config(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        Ok(Campus::new(HttpFetcher::new()?, config))
    }
}

impl<F: Fetch> Campus<F> {
    pub fn new(fetcher: F, config: ScrapeConfig) -> Self {
        Campus { fetcher, config }
    }

    pub async fn scrape_faculty_page(&self, url: &str) -> Result<Vec<ProfessorRecord>, ScrapeError> {
        let html = self.fetcher.fetch_text(url).await?;
        Ok(parse_faculty_page(&html, url, &self.config.departments))
    }

    /// Scrapes every configured listing page in order. A page that fails is
    /// reported and contributes nothing; the rest carry on.
    pub async fn scrape_faculty(&self) -> FacultyReport {
        let mut report = FacultyReport::default();

        for url in &self.config.faculty_urls {
            match self.scrape_faculty_page(url).await {
                Ok(professors) => {
                    info!("Successfully scraped {} professors from {}", professors.len(), url);
                    report.pages.push(PageReport {
                        url: url.clone(),
                        professors: professors.len(),
                        error: None,
                    });
                    report.professors.extend(professors);
                }
                Err(err) => {
                    error!("Error scraping {}: {}", url, err);
                    report.pages.push(PageReport {
                        url: url.clone(),
                        professors: 0,
                        error: Some(err),
                    });
                }
            }
        }

        info!(
            "Total professors scraped: {} ({} pages ok, {} failed)",
            report.professors.len(),
            report.succeeded(),
            report.failed()
        );
        report
    }

    /// Course lists per department from already extracted document text.
    pub fn courses_from_text(&self, text: &str) -> Result<Vec<Vec<CourseRecord>>, ScrapeError> {
        let departments = parse_course_document(text, &self.config.discipline_delimiter)?;
        for courses in &departments {
            if let Some(first) = courses.first() {
                info!("{}: {} courses", first.department, courses.len());
            }
        }
        info!(
            "Parsed {} courses across {} departments",
            departments.iter().map(Vec::len).sum::<usize>(),
            departments.len()
        );
        Ok(departments)
    }

    /// Downloads the programme PDF and parses every department's courses.
    pub async fn fetch_courses(&self) -> Result<Vec<Vec<CourseRecord>>, ScrapeError> {
        let bytes = self.fetcher.fetch_bytes(&self.config.course_pdf_url).await?;
        info!("Downloaded {} bytes from {}", bytes.len(), self.config.course_pdf_url);
        let text = extract_pdf_text(&bytes)?;
        self.courses_from_text(&text)
    }

    pub fn save_faculty(&self, professors: &[ProfessorRecord]) -> Result<(), ScrapeError> {
        save_json(professors, &self.config.faculty_output)?;
        info!("Saved {} professors to {}", professors.len(), self.config.faculty_output.display());
        Ok(())
    }

    pub fn save_courses(&self, departments: &[Vec<CourseRecord>]) -> Result<(), ScrapeError> {
        save_json(departments, &self.config.courses_output)?;
        info!("Parsing complete. Output saved to {}", self.config.courses_output.display());
        Ok(())
    }
}
