use std::path::Path;

use anyhow::{anyhow, bail};
use campus_catalog::config::ScrapeConfig;
use campus_catalog::core::campus::Campus;
use log::{error, info};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Courses,
    Faculty,
    All,
}

fn parse_args() -> anyhow::Result<(Mode, Option<String>)> {
    let mut args = std::env::args().skip(1);
    let mode = match args.next().as_deref() {
        None | Some("all") => Mode::All,
        Some("courses") => Mode::Courses,
        Some("faculty") => Mode::Faculty,
        Some(other) => bail!("unknown mode '{}', expected courses, faculty or all", other),
    };
    Ok((mode, args.next()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (mode, config_path) = parse_args()?;
    let config = match config_path {
        Some(path) => ScrapeConfig::from_file(Path::new(&path)).map_err(|e| anyhow!(e))?,
        None => ScrapeConfig::default(),
    };
    let campus = Campus::from_config(config).map_err(|e| anyhow!(e))?;

    if mode != Mode::Courses {
        let report = campus.scrape_faculty().await;
        campus.save_faculty(&report.professors).map_err(|e| anyhow!(e))?;
        for page in report.pages.iter().filter(|p| p.error.is_some()) {
            error!("no professors from {}", page.url);
        }
    }

    if mode != Mode::Faculty {
        let departments = campus.fetch_courses().await.map_err(|e| anyhow!(e))?;
        campus.save_courses(&departments).map_err(|e| anyhow!(e))?;
    }

    info!("done");
    Ok(())
}
