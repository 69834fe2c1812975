use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::config::DepartmentLookup;
use crate::core::department::{resolve_department, PageContext};
use crate::model::professor::ProfessorRecord;
use crate::utils::text::clean_text;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static ROWS: LazyLock<Selector> =
    LazyLock::new(|| selector("div.row > div.col-md-12.col-sm-12.col-xs-12"));
static DETAILS: LazyLock<Selector> = LazyLock::new(|| selector("div.col-md-8.col-sm-10.col-xs-10"));
static NAME: LazyLock<Selector> = LazyLock::new(|| selector("h7"));
static EDUCATION_POST: LazyLock<Selector> = LazyLock::new(|| selector("h8"));
static EMAIL: LazyLock<Selector> = LazyLock::new(|| selector("a.click"));
static INTERESTS: LazyLock<Selector> = LazyLock::new(|| selector("div.col-md-6 p"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static AVATAR: LazyLock<Selector> = LazyLock::new(|| selector("div.box > div.icon > div.image"));

static READ_MORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Read\s+More").expect("read more regex"));
static BACKGROUND_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\((.*?)\)").expect("background url regex"));

const READ_MORE_TEXT: &str = "Read More";
const AT_PLACEHOLDER: &str = "[at]";

/// Parses one department listing page into professor records.
///
/// Every row yields at most one record. Rows without a details container or
/// without a name are skipped.
pub fn parse_faculty_page(html: &str, page_url: &str, lookup: &DepartmentLookup) -> Vec<ProfessorRecord> {
    let document = Html::parse_document(html);

    let department = resolve_department(&PageContext {
        document: &document,
        url: page_url,
        lookup,
    })
    .map(|d| clean_text(&d))
    .unwrap_or_default();
    if department.is_empty() {
        warn!("could not determine the department for {}", page_url);
    }

    let base = base_url(page_url);

    document
        .select(&ROWS)
        .filter_map(|row| parse_professor(row, base.as_ref(), &department))
        .collect()
}

/// The page URL cut before `index.php`, which relative links resolve against.
pub fn base_url(page_url: &str) -> Option<Url> {
    let base = page_url.split("index.php").next().unwrap_or(page_url);
    Url::parse(base)
        .inspect_err(|err| warn!("cannot use {} as a base url: {}", base, err))
        .ok()
}

fn absolute_url(base: Option<&Url>, href: &str) -> String {
    match base.map(|b| b.join(href)) {
        Some(Ok(url)) => url.to_string(),
        _ => href.to_string(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

fn parse_professor(row: ElementRef<'_>, base: Option<&Url>, department: &str) -> Option<ProfessorRecord> {
    let Some(details) = row.select(&DETAILS).next() else {
        debug!("skipping row without a details container");
        return None;
    };

    let name = details
        .select(&NAME)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty());
    let Some(name) = name else {
        debug!("skipping row without a name");
        return None;
    };

    let (education, post) = education_and_post(details);

    let email = details
        .select(&EMAIL)
        .next()
        .map(element_text)
        .and_then(|text| deobfuscate_email(&text));

    let research_interests = details
        .select(&INTERESTS)
        .next()
        .map(research_interests)
        .unwrap_or_default();

    let website = details
        .select(&LINKS)
        .find(|link| element_text(*link) == READ_MORE_TEXT)
        .and_then(|link| link.value().attr("href"))
        .map(|href| absolute_url(base, href.trim()))
        .unwrap_or_default();

    let avatar_url = row
        .select(&AVATAR)
        .next()
        .and_then(|image| image.value().attr("style"))
        .and_then(background_image)
        .map(|path| absolute_url(base, &path))
        .unwrap_or_default();

    Some(ProfessorRecord {
        name,
        education,
        post,
        email,
        research_interests,
        website,
        avatar_url,
        department: department.to_string(),
    })
}

/// Text before and after the first `<br>` inside `element`, if it has one.
/// Later breaks inside the second part become spaces.
pub fn split_on_first_break(element: ElementRef<'_>) -> Option<(String, String)> {
    let mut before = String::new();
    let mut after = String::new();
    let mut seen_break = false;

    for node in element.descendants() {
        match node.value() {
            Node::Text(text) if seen_break => after.push_str(text),
            Node::Text(text) => before.push_str(text),
            Node::Element(el) if el.name() == "br" => {
                if seen_break {
                    after.push(' ');
                }
                seen_break = true;
            }
            _ => {}
        }
    }

    seen_break.then(|| (clean_text(&before), clean_text(&after)))
}

/// Education and post: a heading holding both around a `<br>` wins,
/// otherwise the first two headings are taken in order.
fn education_and_post(details: ElementRef<'_>) -> (String, String) {
    let headings: Vec<ElementRef<'_>> = details.select(&EDUCATION_POST).collect();

    if let Some(pair) = headings.iter().find_map(|h| split_on_first_break(*h)) {
        return pair;
    }

    let nth = |i: usize| headings.get(i).map(|h| element_text(*h)).unwrap_or_default();
    (nth(0), nth(1))
}

/// Restores `[at]` to `@`. Blank input gives `None`.
pub fn deobfuscate_email(text: &str) -> Option<String> {
    let text = clean_text(text);
    if text.is_empty() {
        return None;
    }
    let email = text.replace(AT_PLACEHOLDER, "@");
    if !email.contains('@') {
        warn!("email '{}' uses an unknown obfuscation, kept as is", email);
    }
    Some(email)
}

/// Comma separated topics; `<br>` counts as a comma and the trailing
/// "Read More" is dropped.
pub fn research_interests(paragraph: ElementRef<'_>) -> Vec<String> {
    let mut raw = String::new();
    for node in paragraph.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push_str(", "),
            _ => {}
        }
    }

    let text = clean_text(&raw);
    let text = READ_MORE.replace_all(&text, "");
    text.split(',')
        .map(clean_text)
        .filter(|topic| !topic.is_empty())
        .collect()
}

/// Pulls the path out of `background-image: url(...)` with surrounding
/// quotes, dots and slashes removed.
pub fn background_image(style: &str) -> Option<String> {
    let caps = BACKGROUND_URL.captures(style)?;
    let path = caps[1].trim().trim_matches(|c: char| matches!(c, '\'' | '"' | '.' | '/'));
    (!path.is_empty()).then(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSE_URL: &str = "https://www.iitbhilai.ac.in/index.php?pid=dept_cse_people";

    fn row(details: &str, avatar: &str) -> String {
        format!(
            r#"<div class="row"><div class="col-md-12 col-sm-12 col-xs-12">
                <div class="box"><div class="icon">{avatar}</div></div>
                <div class="col-md-8 col-sm-10 col-xs-10">{details}</div>
            </div></div>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><head><title>IIT Bhilai</title></head><body>{}</body></html>",
            rows.concat()
        )
    }

    fn parse(html: &str) -> Vec<ProfessorRecord> {
        parse_faculty_page(html, CSE_URL, &DepartmentLookup::default())
    }

    fn first_match<'a>(document: &'a Html, css: &str) -> ElementRef<'a> {
        document.select(&selector(css)).next().unwrap()
    }

    #[test]
    fn full_professor_row() {
        let details = r#"
            <h7>Dr.&nbsp;Jane   Doe</h7>
            <h8>M.Tech, PhD<br>Assistant Professor</h8>
            <a class="click">jane[at]iitbhilai.ac.in</a>
            <div class="col-md-6"><p>Machine Learning,<br>Computer Vision, Read More</p></div>
            <a href="index.php?pid=faculty_jane">Read More</a>"#;
        let avatar = r#"<div class="image" style="background-image: url('./images/faculty/jane.jpg');"></div>"#;

        let professors = parse(&page(&[row(details, avatar)]));
        assert_eq!(
            professors,
            vec![ProfessorRecord {
                name: "Dr. Jane Doe".into(),
                education: "M.Tech, PhD".into(),
                post: "Assistant Professor".into(),
                email: Some("jane@iitbhilai.ac.in".into()),
                research_interests: vec!["Machine Learning".into(), "Computer Vision".into()],
                website: "https://www.iitbhilai.ac.in/index.php?pid=faculty_jane".into(),
                avatar_url: "https://www.iitbhilai.ac.in/images/faculty/jane.jpg".into(),
                department: "Department of Computer Science and Engineering".into(),
            }]
        );
    }

    #[test]
    fn education_post_fall_back_to_separate_headings() {
        let details = "<h7>A. Kumar</h7><h8>PhD (IISc)</h8><h8>Associate Professor</h8>";
        let professors = parse(&page(&[row(details, "")]));
        assert_eq!(professors[0].education, "PhD (IISc)");
        assert_eq!(professors[0].post, "Associate Professor");
    }

    #[test]
    fn combined_heading_wins_even_if_not_first() {
        let details = "<h7>B. Singh</h7><h8>Joined 2019</h8><h8>PhD<br/>Professor<br>Head</h8>";
        let professors = parse(&page(&[row(details, "")]));
        assert_eq!(professors[0].education, "PhD");
        assert_eq!(professors[0].post, "Professor Head");
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let professors = parse(&page(&[row("<h7>C. Rao</h7>", "")]));
        assert_eq!(
            professors[0],
            ProfessorRecord {
                name: "C. Rao".into(),
                department: "Department of Computer Science and Engineering".into(),
                ..Default::default()
            }
        );
        assert!(professors[0].research_interests.is_empty());
    }

    #[test]
    fn rows_without_name_or_details_are_skipped() {
        let no_name = row("<h8>PhD</h8>", "");
        let blank_name = row("<h7>  </h7>", "");
        let no_details = r#"<div class="row"><div class="col-md-12 col-sm-12 col-xs-12"><h7>Ghost</h7></div></div>"#.to_string();
        let good = row("<h7>D. Menon</h7>", "");

        let professors = parse(&page(&[no_name, blank_name, no_details, good]));
        assert_eq!(professors.len(), 1);
        assert_eq!(professors[0].name, "D. Menon");
    }

    #[test]
    fn first_read_more_link_wins() {
        let details = r#"<h7>E. Das</h7>
            <a href="/people/e-das">Read More</a>
            <a href="/people/other">Read More</a>"#;
        let professors = parse(&page(&[row(details, "")]));
        assert_eq!(professors[0].website, "https://www.iitbhilai.ac.in/people/e-das");
    }

    #[test]
    fn absolute_links_are_kept() {
        let details = r#"<h7>F. Iyer</h7><a href="https://sites.example.org/fiyer">Read More</a>"#;
        let professors = parse(&page(&[row(details, "")]));
        assert_eq!(professors[0].website, "https://sites.example.org/fiyer");
    }

    #[test]
    fn department_is_empty_when_unresolvable() {
        let html = page(&[row("<h7>G. Nair</h7>", "")]);
        let professors =
            parse_faculty_page(&html, "https://example.org/people.html", &DepartmentLookup::default());
        assert_eq!(professors[0].department, "");
    }

    #[test]
    fn split_on_first_break_example() {
        let document = Html::parse_fragment("<h8>M.Tech, PhD<br>Assistant Professor</h8>");
        let h8 = first_match(&document, "h8");
        assert_eq!(
            split_on_first_break(h8),
            Some(("M.Tech, PhD".to_string(), "Assistant Professor".to_string()))
        );
    }

    #[test]
    fn split_on_first_break_without_break() {
        let document = Html::parse_fragment("<h8>M.Tech, PhD</h8>");
        assert_eq!(split_on_first_break(first_match(&document, "h8")), None);
    }

    #[test]
    fn email_placeholder_is_restored() {
        assert_eq!(
            deobfuscate_email("john[at]iitbhilai.ac.in").as_deref(),
            Some("john@iitbhilai.ac.in")
        );
        assert_eq!(deobfuscate_email("  "), None);
        assert_eq!(deobfuscate_email("john(at)iitbhilai").as_deref(), Some("john(at)iitbhilai"));
    }

    #[test]
    fn interests_drop_empty_pieces() {
        let document = Html::parse_fragment(
            "<div class=\"col-md-6\"><p>VLSI,, <br><br> Embedded&nbsp;Systems , Read   More</p></div>",
        );
        let p = first_match(&document, "p");
        assert_eq!(research_interests(p), vec!["VLSI".to_string(), "Embedded Systems".to_string()]);
    }

    #[test]
    fn background_image_variants() {
        assert_eq!(
            background_image("background-image:url(\"../img/a.png\")").as_deref(),
            Some("img/a.png")
        );
        assert_eq!(background_image("background: url(img/b.jpg) no-repeat").as_deref(), Some("img/b.jpg"));
        assert_eq!(background_image("color: red"), None);
    }

    #[test]
    fn base_url_drops_script_segment() {
        assert_eq!(base_url(CSE_URL).unwrap().as_str(), "https://www.iitbhilai.ac.in/");
        assert_eq!(
            base_url("https://example.org/faculty/").unwrap().as_str(),
            "https://example.org/faculty/"
        );
    }
}
