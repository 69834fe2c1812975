use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use scraper::{Html, Selector};

use crate::config::DepartmentLookup;
use crate::utils::text::clean_text;

static BREADCRUMB_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("ul.breadcrumb a[href*=\"dept_\"]").expect("breadcrumb selector")
});
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector"));
static TITLE_DEPARTMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)department of ([^|]+)").expect("title regex"));
static URL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(dept|disc)_([A-Za-z0-9]+)").expect("url code regex"));

/// What a resolver gets to look at for one listing page.
pub struct PageContext<'a> {
    pub document: &'a Html,
    pub url: &'a str,
    pub lookup: &'a DepartmentLookup,
}

pub type Resolver = fn(&PageContext<'_>) -> Option<String>;

/// Tried in order; the first non-empty answer wins.
pub const RESOLVERS: [(&str, Resolver); 3] = [
    ("breadcrumb", from_breadcrumb),
    ("title", from_title),
    ("url", from_url_code),
];

pub fn resolve_department(ctx: &PageContext<'_>) -> Option<String> {
    RESOLVERS.iter().find_map(|(name, resolver)| {
        let department = resolver(ctx).filter(|d| !d.is_empty())?;
        debug!("department for {} resolved by {}: {}", ctx.url, name, department);
        Some(department)
    })
}

/// Last breadcrumb link pointing at a department page.
pub fn from_breadcrumb(ctx: &PageContext<'_>) -> Option<String> {
    ctx.document
        .select(&BREADCRUMB_LINKS)
        .last()
        .map(|link| clean_text(&link.text().collect::<String>()))
}

/// `<title>... Department of X | ...</title>` gives `X`.
pub fn from_title(ctx: &PageContext<'_>) -> Option<String> {
    let title = ctx
        .document
        .select(&TITLE)
        .next()?
        .text()
        .collect::<String>();
    if !title.to_lowercase().contains("department") {
        return None;
    }
    let caps = TITLE_DEPARTMENT.captures(&title)?;
    Some(clean_text(&caps[1]))
}

/// `dept_<code>` / `disc_<code>` in the page URL, looked up in the table.
pub fn from_url_code(ctx: &PageContext<'_>) -> Option<String> {
    let caps = URL_CODE.captures(ctx.url)?;
    let code = &caps[2];
    let name = match ctx.lookup.get(code) {
        Some(name) => name.to_string(),
        None if &caps[1] == "disc" => format!("Discipline of {code}"),
        None => format!("Department of {code}"),
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSE_URL: &str = "https://www.iitbhilai.ac.in/index.php?pid=dept_cse_people";

    fn resolve(html: &str, url: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let lookup = DepartmentLookup::default();
        resolve_department(&PageContext {
            document: &document,
            url,
            lookup: &lookup,
        })
    }

    #[test]
    fn breadcrumb_takes_last_department_link() {
        let html = r#"<ul class="breadcrumb">
            <li><a href="index.php">Home</a></li>
            <li><a href="index.php?pid=dept_home">Departments</a></li>
            <li><a href="index.php?pid=dept_ee">  Electrical
                Engineering </a></li>
            <li>People</li>
        </ul><title>Department of Something Else | IIT</title>"#;
        assert_eq!(resolve(html, CSE_URL).as_deref(), Some("Electrical Engineering"));
    }

    #[test]
    fn title_is_used_without_breadcrumb() {
        let html = "<html><head><title>People | Department of Physics | IIT Bhilai</title></head></html>";
        assert_eq!(resolve(html, CSE_URL).as_deref(), Some("Physics"));
    }

    #[test]
    fn url_code_maps_through_lookup() {
        let html = "<html><head><title>IIT Bhilai</title></head></html>";
        assert_eq!(
            resolve(html, CSE_URL).as_deref(),
            Some("Department of Computer Science and Engineering")
        );
    }

    #[test]
    fn title_mentioning_department_without_name_falls_through_to_url() {
        let html = "<title>Our departments</title>";
        assert_eq!(
            resolve(html, "https://x.edu/index.php?pid=disc_MT_people").as_deref(),
            Some("Department of Mechatronics")
        );
    }

    #[test]
    fn unknown_codes_are_synthesized() {
        assert_eq!(
            resolve("<p></p>", "https://x.edu/index.php?pid=dept_liberal_people").as_deref(),
            Some("Department of liberal")
        );
        assert_eq!(
            resolve("<p></p>", "https://x.edu/index.php?pid=disc_AI_people").as_deref(),
            Some("Discipline of AI")
        );
    }

    #[test]
    fn nothing_matches() {
        assert_eq!(resolve("<p></p>", "https://x.edu/people.html"), None);
    }

    #[test]
    fn empty_breadcrumb_text_is_skipped() {
        let html = r#"<ul class="breadcrumb"><li><a href="?pid=dept_x"> </a></li></ul>"#;
        assert_eq!(
            resolve(html, CSE_URL).as_deref(),
            Some("Department of Computer Science and Engineering")
        );
    }
}
