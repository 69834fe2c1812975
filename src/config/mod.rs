use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::scrape::{ErrorKind, ScrapeError};

pub const COURSE_PDF_URL: &str = "https://www.iitbhilai.ac.in/index.php?pid=new_schedule_programs";
pub const DISCIPLINE_DELIMITER: &str = "Courses offered in the Discipline of ";

const FACULTY_URLS: [&str; 11] = [
    "https://www.iitbhilai.ac.in/index.php?pid=dept_cse_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_ee_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_me_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_ece_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_msme_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_phy_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_bsbme_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_chem_people",
    "https://www.iitbhilai.ac.in/index.php?pid=disc_MT_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_liberal_people",
    "https://www.iitbhilai.ac.in/index.php?pid=dept_math_people",
];

const DEPARTMENT_NAMES: [(&str, &str); 11] = [
    ("cse", "Department of Computer Science and Engineering"),
    ("ee", "Department of Electrical Engineering"),
    ("me", "Department of Mechanical Engineering"),
    ("ece", "Department of Electronics and Communication Engineering"),
    ("msme", "Department of Materials Science and Metallurgical Engineering"),
    ("phy", "Department of Physics"),
    ("bsbme", "Department of Biosciences and Biomedical Engineering"),
    ("chem", "Department of Chemistry"),
    ("MT", "Department of Mechatronics"),
    ("la", "Department of Liberal Arts"),
    ("math", "Department of Mathematics"),
];

/// Department/discipline code to full name. Codes compare case-insensitively.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct DepartmentLookup {
    names: BTreeMap<String, String>,
}

impl DepartmentLookup {
    pub fn new<K, V, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let names = entries
            .into_iter()
            .map(|(code, name)| (code.as_ref().to_lowercase(), name.into()))
            .collect();
        DepartmentLookup { names }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(&code.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for DepartmentLookup {
    fn default() -> Self {
        DepartmentLookup::new(DEPARTMENT_NAMES)
    }
}

impl From<BTreeMap<String, String>> for DepartmentLookup {
    fn from(map: BTreeMap<String, String>) -> Self {
        DepartmentLookup::new(map)
    }
}

impl From<DepartmentLookup> for BTreeMap<String, String> {
    fn from(lookup: DepartmentLookup) -> Self {
        lookup.names
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScrapeConfig {
    pub course_pdf_url: String,
    pub discipline_delimiter: String,
    pub faculty_urls: Vec<String>,
    pub departments: DepartmentLookup,
    pub courses_output: PathBuf,
    pub faculty_output: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            course_pdf_url: COURSE_PDF_URL.to_string(),
            discipline_delimiter: DISCIPLINE_DELIMITER.to_string(),
            faculty_urls: FACULTY_URLS.iter().map(|url| url.to_string()).collect(),
            departments: DepartmentLookup::default(),
            courses_output: PathBuf::from("../public/generated/result.json"),
            faculty_output: PathBuf::from("../public/generated/professors.json"),
        }
    }
}

impl ScrapeConfig {
    /// Reads a JSON config; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ScrapeError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| ScrapeError::wrap(ErrorKind::Config, err))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScrapeError> {
        let config: ScrapeConfig =
            serde_json::from_str(raw).map_err(|err| ScrapeError::wrap(ErrorKind::Config, err))?;
        if config.discipline_delimiter.trim().is_empty() {
            return Err(ScrapeError::new(
                ErrorKind::Config,
                "discipline_delimiter must not be blank",
            ));
        }
        Ok(config)
    }
}
